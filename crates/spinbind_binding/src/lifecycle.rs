//! Engine lifecycle
//!
//! An engine exists only between activation and deactivation, and a binding
//! never holds two. Re-creation happens only when the [`StructuralKey`]
//! changes; every other configuration change is applied to the live engine.
//!
//! ```text
//! activate:   write raw value -> apply attributes -> construct -> subscribe -> settle
//! deactivate: unsubscribe -> destroy -> clear handle
//! ```

use std::rc::Rc;

use serde_json::{Map, Value};
use spinbind_core::number::format_number;
use spinbind_core::{DomainEventSet, EngineFactory, EngineOptions, HostElement, Renderer};

use crate::config::{BindingConfig, SpinProps};
use crate::error::Result;
use crate::event_bridge;
use crate::reconciler;
use crate::state::BindingShared;

/// The parts of a configuration that can only take effect on a new engine
#[derive(Clone, Debug, PartialEq)]
pub struct StructuralKey {
    pub renderer: Renderer,
    pub options: Map<String, Value>,
    pub events: DomainEventSet,
}

impl StructuralKey {
    pub fn of(config: &BindingConfig) -> Self {
        Self {
            renderer: config.props.renderer,
            options: config.props.options.clone(),
            events: config.callbacks.declared(),
        }
    }
}

/// Options the engine is constructed with
pub fn initial_options(props: &SpinProps) -> EngineOptions {
    EngineOptions::derive(props.renderer, &props.settings(), &props.options)
}

/// Construct an engine on `host` and wire it to `shared`
///
/// On failure nothing is retained: no handle, no listeners.
pub(crate) fn activate<F>(
    shared: &Rc<BindingShared>,
    factory: &F,
    config: &BindingConfig,
    host: Rc<dyn HostElement>,
) -> Result<()>
where
    F: EngineFactory + ?Sized,
{
    let authority = shared.authority.get();
    host.set_raw_value(&format_number(authority.value()));

    let attributes = config.props.attributes();
    if !attributes.is_empty() {
        host.apply_attributes(&attributes);
    }

    let engine = factory
        .construct(host.clone(), initial_options(&config.props))
        .map_err(|err| {
            tracing::warn!("engine construction failed: {}", err);
            err
        })?;

    shared.host.replace(Some(host.clone()));
    shared.engine.replace(Some(engine));
    let subscription = event_bridge::subscribe(shared, &host, config.callbacks.declared());
    shared.subscription.replace(Some(subscription));

    tracing::debug!(
        "mounted {} engine with {}",
        config.props.renderer,
        authority
    );
    reconciler::settle(shared);
    Ok(())
}

/// Tear down the live engine, if any
///
/// Returns whether an engine was live.
pub(crate) fn deactivate(shared: &BindingShared) -> bool {
    let subscription = shared.subscription.borrow_mut().take();
    if let Some(subscription) = subscription {
        let events = subscription.events();
        let removed = subscription.cancel();
        tracing::trace!("removed {} listeners ({:?})", removed, events);
    }

    let Some(engine) = shared.engine() else {
        return false;
    };
    engine.destroy();
    shared.engine.replace(None);
    shared.host.replace(None);
    tracing::debug!("engine destroyed");
    true
}
