//! Imperative handle
//!
//! A [`SpinHandle`] is the narrow surface external callers get instead of the
//! binding itself. It forwards to the host and engine, and never writes the
//! caller's state: a controlled caller sees the effect of `set_value` through
//! its `on_change` callback like any other change.
//!
//! Every method is a silent no-op while the binding has no live engine.

use std::fmt;
use std::rc::Rc;

use spinbind_core::SpinEngine;

use crate::authority::{ChangeAction, ChangeMeta};
use crate::state::{BindingShared, Origin};

/// Cloneable imperative handle to a binding
#[derive(Clone)]
pub struct SpinHandle {
    shared: Rc<BindingShared>,
}

impl SpinHandle {
    pub(crate) fn new(shared: Rc<BindingShared>) -> Self {
        Self { shared }
    }

    /// Whether the binding currently has a live engine
    pub fn is_live(&self) -> bool {
        self.shared.is_live()
    }

    pub fn focus(&self) {
        match self.shared.host() {
            Some(host) => host.focus(),
            None => tracing::trace!("focus on unmounted binding"),
        }
    }

    pub fn blur(&self) {
        match self.shared.host() {
            Some(host) => host.blur(),
            None => tracing::trace!("blur on unmounted binding"),
        }
    }

    /// Step up once
    pub fn increment(&self) {
        self.forward(ChangeAction::Increment, |engine| engine.up_once());
    }

    /// Step down once
    pub fn decrement(&self) {
        self.forward(ChangeAction::Decrement, |engine| engine.down_once());
    }

    /// The engine's live value, or the last authoritative value without one
    pub fn get_value(&self) -> f64 {
        self.shared
            .engine()
            .map(|engine| engine.get_value())
            .filter(|value| value.is_finite())
            .unwrap_or_else(|| self.shared.authority.get().value())
    }

    /// Ask the engine to show `value`
    pub fn set_value(&self, value: f64) {
        self.forward(ChangeAction::SetValue, |engine| engine.set_value(value));
    }

    fn forward(&self, action: ChangeAction, f: impl FnOnce(&dyn SpinEngine)) {
        let origin = Origin::Tagged(ChangeMeta::api(action));
        if !self.shared.with_engine(origin, f) {
            tracing::trace!("{:?} on unmounted binding", action);
        }
    }
}

impl fmt::Debug for SpinHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpinHandle")
            .field("live", &self.is_live())
            .field("authority", &self.shared.authority.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::Authority;
    use crate::config::Callbacks;

    #[test]
    fn test_unmounted_handle_is_inert() {
        let shared = BindingShared::new(Authority::Internal(12.0), Callbacks::default());
        let handle = SpinHandle::new(shared);

        handle.focus();
        handle.increment();
        handle.set_value(3.0);

        assert!(!handle.is_live());
        assert_eq!(handle.get_value(), 12.0);
    }
}
