//! State shared between a binding, its listeners, and its handles

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spinbind_core::{HostElement, SpinEngine};

use crate::authority::{Authority, ChangeMeta};
use crate::config::Callbacks;
use crate::event_bridge::Subscription;

/// Attribution for the next engine `change` notification
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Origin {
    /// Not caused by the binding: reported as user input
    User,
    /// Caused by a reconciliation push: not reported
    Silent,
    /// Caused by a handle call: reported with this metadata
    Tagged(ChangeMeta),
}

pub(crate) struct BindingShared {
    pub(crate) host: RefCell<Option<Rc<dyn HostElement>>>,
    pub(crate) engine: RefCell<Option<Rc<dyn SpinEngine>>>,
    pub(crate) subscription: RefCell<Option<Subscription>>,
    pub(crate) authority: Cell<Authority>,
    pub(crate) callbacks: RefCell<Callbacks>,
    pub(crate) origin: Cell<Origin>,
}

impl BindingShared {
    pub(crate) fn new(authority: Authority, callbacks: Callbacks) -> Rc<Self> {
        Rc::new(Self {
            host: RefCell::new(None),
            engine: RefCell::new(None),
            subscription: RefCell::new(None),
            authority: Cell::new(authority),
            callbacks: RefCell::new(callbacks),
            origin: Cell::new(Origin::User),
        })
    }

    /// The live engine; clones the `Rc` so no borrow is held across engine calls
    pub(crate) fn engine(&self) -> Option<Rc<dyn SpinEngine>> {
        self.engine.borrow().clone()
    }

    pub(crate) fn host(&self) -> Option<Rc<dyn HostElement>> {
        self.host.borrow().clone()
    }

    pub(crate) fn is_live(&self) -> bool {
        self.engine.borrow().is_some()
    }

    /// Run `f` against the live engine with change notifications attributed to `origin`
    ///
    /// Returns `false` without calling `f` when no engine is live.
    pub(crate) fn with_engine(&self, origin: Origin, f: impl FnOnce(&dyn SpinEngine)) -> bool {
        let Some(engine) = self.engine() else {
            return false;
        };
        let previous = self.origin.replace(origin);
        f(engine.as_ref());
        self.origin.set(previous);
        true
    }

    /// Report a value to the caller's `on_change`
    pub(crate) fn report(&self, value: f64, meta: ChangeMeta) {
        let callback = self.callbacks.borrow().on_change();
        if let Some(callback) = callback {
            callback(value, meta);
        }
    }
}
