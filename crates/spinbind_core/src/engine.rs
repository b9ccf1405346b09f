//! Spinner engine contract
//!
//! The engine is the external, imperative widget that implements stepping,
//! spin acceleration, clamping and formatting. It is constructed against a
//! host element and then driven through a small fixed API.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            Binding controller            │
//! │  construct / set_value / up_once / ...   │
//! └────────────────┬────────────────────────┘
//!                  │
//!                  ▼
//! ┌─────────────────────────────────────────┐
//! │          dyn SpinEngine                  │
//! │  - reads/writes host raw value           │
//! │  - dispatches `change` + `on.*` events   │
//! └────────────────┬────────────────────────┘
//!                  │
//!                  ▼
//! ┌─────────────────────────────────────────┐
//! │          dyn HostElement                 │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Engine methods take `&self`: an engine dispatches events synchronously
//! while it runs, and listeners may read it back, so implementations keep
//! their state behind interior mutability.

use std::rc::Rc;

use crate::error::Result;
use crate::host::HostElement;
use crate::options::{EngineOptions, SettingsPatch};

/// A live spinner engine attached to one host element
pub trait SpinEngine {
    /// The engine's current numeric value (NaN if the host text is not a number)
    fn get_value(&self) -> f64;

    /// Set the value, applying the engine's own constraints and formatting
    fn set_value(&self, value: f64);

    /// Step up once
    fn up_once(&self);

    /// Step down once
    fn down_once(&self);

    /// Merge non-structural settings into the live engine
    fn update_settings(&self, patch: &SettingsPatch);

    /// Detach from the host and release resources
    ///
    /// After `destroy` every other method is a no-op.
    fn destroy(&self);
}

/// Constructs engines against host elements
pub trait EngineFactory {
    /// Create an engine attached to `host`
    fn construct(
        &self,
        host: Rc<dyn HostElement>,
        options: EngineOptions,
    ) -> Result<Rc<dyn SpinEngine>>;
}

impl<F> EngineFactory for F
where
    F: Fn(Rc<dyn HostElement>, EngineOptions) -> Result<Rc<dyn SpinEngine>>,
{
    fn construct(
        &self,
        host: Rc<dyn HostElement>,
        options: EngineOptions,
    ) -> Result<Rc<dyn SpinEngine>> {
        self(host, options)
    }
}
