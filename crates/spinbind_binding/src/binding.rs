//! Binding controller
//!
//! [`SpinBinding`] owns one engine at a time and keeps it in agreement with
//! the configuration the caller supplies on every render.
//!
//! # Update order
//!
//! ```text
//! update(config)
//!   ├─ resolve authority, swap callbacks
//!   ├─ structural key changed? ── yes ──► deactivate + activate
//!   │                              no
//!   ├─ host attributes   (disabled, read-only, name, id)
//!   ├─ settings bridge   (min, max, step, decimals, prefix, suffix)
//!   └─ value reconciler  (push / re-base / nothing)
//! ```
//!
//! Settings are forwarded before the value so a push is clamped against the
//! new bounds, not the previous ones.

use std::fmt;
use std::rc::Rc;

use spinbind_core::number::format_number;
use spinbind_core::{EngineFactory, HostElement};

use crate::authority::Authority;
use crate::config::BindingConfig;
use crate::error::{BindingError, Result};
use crate::form::{self, FormEntry};
use crate::handle::SpinHandle;
use crate::lifecycle::{self, StructuralKey};
use crate::reconciler;
use crate::settings;
use crate::state::BindingShared;

/// Controller binding one declarative configuration to one spinner engine
pub struct SpinBinding<F: EngineFactory> {
    factory: F,
    config: BindingConfig,
    key: StructuralKey,
    shared: Rc<BindingShared>,
}

impl<F: EngineFactory> SpinBinding<F> {
    /// Create an unmounted binding
    pub fn new(factory: F, config: BindingConfig) -> Self {
        let authority = reconciler::resolve(&config.props, None);
        let shared = BindingShared::new(authority, config.callbacks.clone());
        Self {
            factory,
            key: StructuralKey::of(&config),
            config,
            shared,
        }
    }

    /// Construct the engine on `host`
    pub fn mount(&mut self, host: Rc<dyn HostElement>) -> Result<()> {
        if self.shared.is_live() {
            return Err(BindingError::AlreadyMounted);
        }
        lifecycle::activate(&self.shared, &self.factory, &self.config, host)
    }

    /// Apply the configuration of a new render
    ///
    /// While unmounted only the authority and callbacks are updated; the
    /// rest takes effect on the next mount.
    pub fn update(&mut self, config: BindingConfig) -> Result<()> {
        let previous = self.shared.authority.get();
        let authority = reconciler::resolve(&config.props, Some(previous));
        self.shared.authority.set(authority);
        self.shared.callbacks.replace(config.callbacks.clone());

        let old = std::mem::replace(&mut self.config, config);
        let key = StructuralKey::of(&self.config);
        let structural = key != self.key;
        self.key = key;

        if !self.shared.is_live() {
            return Ok(());
        }

        if structural {
            let Some(host) = self.shared.host() else {
                return Ok(());
            };
            tracing::debug!("structural change, remounting");
            lifecycle::deactivate(&self.shared);
            return lifecycle::activate(&self.shared, &self.factory, &self.config, host);
        }

        settings::apply_attributes(&self.shared, &old.props, &self.config.props);
        settings::forward(&self.shared, &old.props, &self.config.props);
        reconciler::reconcile(&self.shared, previous);
        Ok(())
    }

    /// Tear down the engine; the binding can be mounted again afterwards
    pub fn unmount(&mut self) {
        lifecycle::deactivate(&self.shared);
    }

    pub fn is_mounted(&self) -> bool {
        self.shared.is_live()
    }

    /// Imperative handle; stays valid (and inert) after unmount
    pub fn handle(&self) -> SpinHandle {
        SpinHandle::new(self.shared.clone())
    }

    pub fn authority(&self) -> Authority {
        self.shared.authority.get()
    }

    /// The authoritative value
    pub fn current_value(&self) -> f64 {
        self.authority().value()
    }

    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Form fields for submission; empty when the binding has no `name`
    pub fn form_entries(&self) -> Vec<FormEntry> {
        let authoritative = self.current_value();
        let raw = self
            .shared
            .host()
            .map(|host| host.raw_value())
            .unwrap_or_else(|| format_number(authoritative));
        form::entries(self.config.props.name.as_deref(), raw, authoritative)
    }
}

impl<F: EngineFactory> Drop for SpinBinding<F> {
    fn drop(&mut self) {
        lifecycle::deactivate(&self.shared);
    }
}

impl<F: EngineFactory> fmt::Debug for SpinBinding<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpinBinding")
            .field("mounted", &self.is_mounted())
            .field("authority", &self.authority())
            .field("key", &self.key)
            .finish()
    }
}
