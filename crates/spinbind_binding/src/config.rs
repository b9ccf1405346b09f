//! Binding configuration
//!
//! A [`BindingConfig`] is what the caller hands the binding on every render.
//! It splits into plain data ([`SpinProps`], serializable so a widget can be
//! described in TOML or JSON) and closures ([`Callbacks`]).
//!
//! ```
//! use spinbind_binding::{BindingConfig, SpinProps};
//!
//! let props = SpinProps::from_toml_str(r#"
//!     defaultValue = 5
//!     max = 10
//!     suffix = "%"
//!     renderer = "bootstrap5"
//! "#).unwrap();
//!
//! let config = BindingConfig::from_props(props).on_change(|value, meta| {
//!     println!("{value} ({meta})");
//! });
//! assert!(config.props.value.is_none());
//! ```

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use spinbind_core::{DomainEvent, DomainEventSet, HostAttributes, Renderer, SettingsPatch};

use crate::authority::{ChangeMeta, Ownership};
use crate::error::Result;

/// Value callback: the new value and where it came from
pub type ChangeCallback = Rc<dyn Fn(f64, ChangeMeta)>;

/// Domain-event callback
pub type DomainCallback = Rc<dyn Fn()>;

// ============================================================================
// Props
// ============================================================================

/// Data half of a binding configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpinProps {
    /// Caller-owned value; present means controlled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Seed for the binding-owned value (0 when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub renderer: Renderer,
    /// Pass-through engine options; keys here win over the fields above
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

impl SpinProps {
    /// Parse props from a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Parse props from a JSON document
    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn ownership(&self) -> Ownership {
        if self.value.is_some() {
            Ownership::Controlled
        } else {
            Ownership::Uncontrolled
        }
    }

    /// The settings the engine understands, in the engine's field names
    pub fn settings(&self) -> SettingsPatch {
        SettingsPatch {
            min: self.min,
            max: self.max,
            step: self.step,
            decimals: self.decimals,
            prefix: self.prefix.clone(),
            postfix: self.suffix.clone(),
        }
    }

    /// Form attributes for the host element
    pub fn attributes(&self) -> HostAttributes {
        HostAttributes {
            name: self.name.clone(),
            id: self.id.clone(),
            disabled: self.disabled,
            read_only: self.read_only,
        }
    }
}

// ============================================================================
// Callbacks
// ============================================================================

/// Closure half of a binding configuration
#[derive(Clone, Default)]
pub struct Callbacks {
    on_change: Option<ChangeCallback>,
    on_focus: Option<DomainCallback>,
    on_blur: Option<DomainCallback>,
    domain: [Option<DomainCallback>; DomainEvent::COUNT],
}

impl Callbacks {
    pub fn on_change(&self) -> Option<ChangeCallback> {
        self.on_change.clone()
    }

    pub fn set_on_change(&mut self, callback: Option<ChangeCallback>) {
        self.on_change = callback;
    }

    /// Called when the host element gains focus
    pub fn on_focus(&self) -> Option<DomainCallback> {
        self.on_focus.clone()
    }

    pub fn set_on_focus(&mut self, callback: Option<DomainCallback>) {
        self.on_focus = callback;
    }

    /// Called when the host element loses focus
    pub fn on_blur(&self) -> Option<DomainCallback> {
        self.on_blur.clone()
    }

    pub fn set_on_blur(&mut self, callback: Option<DomainCallback>) {
        self.on_blur = callback;
    }

    /// The callback registered for `event`
    pub fn domain(&self, event: DomainEvent) -> Option<DomainCallback> {
        self.domain[event.index()].clone()
    }

    pub fn set_domain(&mut self, event: DomainEvent, callback: Option<DomainCallback>) {
        self.domain[event.index()] = callback;
    }

    /// Events that have a callback
    pub fn declared(&self) -> DomainEventSet {
        DomainEvent::ALL
            .into_iter()
            .filter(|event| self.domain[event.index()].is_some())
            .collect()
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_change", &self.on_change.is_some())
            .field("on_focus", &self.on_focus.is_some())
            .field("on_blur", &self.on_blur.is_some())
            .field("domain", &self.declared())
            .finish()
    }
}

// ============================================================================
// Config
// ============================================================================

/// Everything the caller supplies for one render
#[derive(Clone, Debug, Default)]
pub struct BindingConfig {
    pub props: SpinProps,
    pub callbacks: Callbacks,
}

impl BindingConfig {
    /// Create an uncontrolled configuration with the vanilla renderer
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_props(props: SpinProps) -> Self {
        Self {
            props,
            callbacks: Callbacks::default(),
        }
    }

    pub fn vanilla() -> Self {
        Self::new().renderer(Renderer::Vanilla)
    }

    pub fn bootstrap3() -> Self {
        Self::new().renderer(Renderer::Bootstrap3)
    }

    pub fn bootstrap4() -> Self {
        Self::new().renderer(Renderer::Bootstrap4)
    }

    pub fn bootstrap5() -> Self {
        Self::new().renderer(Renderer::Bootstrap5)
    }

    pub fn tailwind() -> Self {
        Self::new().renderer(Renderer::Tailwind)
    }

    /// Make the binding controlled with `value`
    pub fn value(mut self, value: f64) -> Self {
        self.props.value = Some(value);
        self
    }

    /// Drop the caller-owned value, making the binding uncontrolled
    pub fn uncontrolled(mut self) -> Self {
        self.props.value = None;
        self
    }

    pub fn default_value(mut self, value: f64) -> Self {
        self.props.default_value = Some(value);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.props.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.props.max = Some(max);
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.props.step = Some(step);
        self
    }

    pub fn decimals(mut self, decimals: u32) -> Self {
        self.props.decimals = Some(decimals);
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.props.prefix = Some(prefix.into());
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.props.suffix = Some(suffix.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.props.disabled = Some(disabled);
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.props.read_only = Some(read_only);
        self
    }

    /// Form field name; also enables the `{name}_display` mirror
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.props.name = Some(name.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.props.id = Some(id.into());
        self
    }

    pub fn renderer(mut self, renderer: Renderer) -> Self {
        self.props.renderer = renderer;
        self
    }

    /// Add one pass-through engine option
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.options.insert(key.into(), value.into());
        self
    }

    /// Replace the whole pass-through bag
    pub fn options(mut self, options: Map<String, Value>) -> Self {
        self.props.options = options;
        self
    }

    pub fn on_change(mut self, callback: impl Fn(f64, ChangeMeta) + 'static) -> Self {
        self.callbacks.set_on_change(Some(Rc::new(callback)));
        self
    }

    pub fn on_focus(mut self, callback: impl Fn() + 'static) -> Self {
        self.callbacks.set_on_focus(Some(Rc::new(callback)));
        self
    }

    pub fn on_blur(mut self, callback: impl Fn() + 'static) -> Self {
        self.callbacks.set_on_blur(Some(Rc::new(callback)));
        self
    }

    /// Register a callback for a domain event
    pub fn on(mut self, event: DomainEvent, callback: impl Fn() + 'static) -> Self {
        self.callbacks.set_domain(event, Some(Rc::new(callback)));
        self
    }

    pub fn on_min(self, callback: impl Fn() + 'static) -> Self {
        self.on(DomainEvent::Min, callback)
    }

    pub fn on_max(self, callback: impl Fn() + 'static) -> Self {
        self.on(DomainEvent::Max, callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_props_from_toml() {
        let props = SpinProps::from_toml_str(
            r#"
            value = 42
            min = 0
            max = 100
            suffix = "kg"
            readOnly = true
            renderer = "tailwind"

            [options]
            boostat = 5
            "#,
        )
        .unwrap();

        assert_eq!(props.value, Some(42.0));
        assert_eq!(props.ownership(), Ownership::Controlled);
        assert_eq!(props.read_only, Some(true));
        assert_eq!(props.renderer, Renderer::Tailwind);
        assert_eq!(props.options.get("boostat"), Some(&json!(5)));
        assert_eq!(props.settings().postfix.as_deref(), Some("kg"));
    }

    #[test]
    fn test_props_from_json() {
        let props = SpinProps::from_json_str(r#"{"defaultValue": 25, "decimals": 2}"#).unwrap();
        assert_eq!(props.default_value, Some(25.0));
        assert_eq!(props.decimals, Some(2));
        assert_eq!(props.ownership(), Ownership::Uncontrolled);
        assert_eq!(props.renderer, Renderer::Vanilla);
    }

    #[test]
    fn test_bad_config_is_reported() {
        let err = SpinProps::from_json_str(r#"{"renderer": "material"}"#).unwrap_err();
        assert!(matches!(err, crate::BindingError::Config(_)));
        assert!(SpinProps::from_toml_str("min = [").is_err());
    }

    #[test]
    fn test_settings_omit_absent_fields() {
        let props = BindingConfig::new().max(10.0).prefix("$").props;
        let settings = props.settings();
        assert_eq!(settings.max, Some(10.0));
        assert_eq!(settings.prefix.as_deref(), Some("$"));
        assert!(settings.min.is_none());
        assert!(settings.postfix.is_none());
    }

    #[test]
    fn test_declared_domain_events() {
        let config = BindingConfig::bootstrap4()
            .on_max(|| {})
            .on(DomainEvent::SpeedChange, || {});
        assert_eq!(config.props.renderer, Renderer::Bootstrap4);
        assert_eq!(
            config.callbacks.declared(),
            DomainEventSet::MAX | DomainEventSet::SPEED_CHANGE
        );
        assert!(config.callbacks.domain(DomainEvent::Min).is_none());
    }
}
