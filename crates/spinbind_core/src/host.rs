//! Host element abstraction
//!
//! The host is the input-like element a spinner engine attaches to. It owns
//! the raw text value, focus, form attributes, and a listener table keyed by
//! event name. Engines dispatch both the generic `change` notification and
//! their domain events through [`HostElement::dispatch`].
//!
//! Hosts are single-threaded UI objects, so listeners are `Rc` closures.

use std::rc::Rc;

use slotmap::new_key_type;

new_key_type! {
    /// Identifies one registered host listener
    pub struct ListenerId;
}

/// Callback invoked when an event is dispatched on a host element
pub type HostListener = Rc<dyn Fn()>;

/// Form-level attributes applied to the host element
///
/// `None` leaves the corresponding attribute untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostAttributes {
    /// Form field name
    pub name: Option<String>,
    /// Element id
    pub id: Option<String>,
    /// Whether the element is disabled
    pub disabled: Option<bool>,
    /// Whether the element is read-only
    pub read_only: Option<bool>,
}

impl HostAttributes {
    /// Whether no attribute is set
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.id.is_none() && self.disabled.is_none() && self.read_only.is_none()
    }
}

/// An input-like element that a spinner engine can attach to
pub trait HostElement {
    /// Current raw text value
    fn raw_value(&self) -> String;

    /// Replace the raw text value without dispatching any event
    fn set_raw_value(&self, value: &str);

    /// Move keyboard focus to the element
    ///
    /// Dispatches [`FOCUS_EVENT`](crate::events::FOCUS_EVENT) if the element
    /// did not already have focus.
    fn focus(&self);

    /// Remove keyboard focus from the element
    ///
    /// Dispatches [`BLUR_EVENT`](crate::events::BLUR_EVENT) if the element
    /// had focus.
    fn blur(&self);

    /// Apply form attributes (name, id, disabled, read-only)
    fn apply_attributes(&self, attributes: &HostAttributes);

    /// Register a listener for `event`
    fn add_listener(&self, event: &str, listener: HostListener) -> ListenerId;

    /// Remove a previously registered listener
    ///
    /// Returns `false` if the listener was not registered.
    fn remove_listener(&self, id: ListenerId) -> bool;

    /// Dispatch `event` to every listener registered for it
    ///
    /// Returns the number of listeners invoked.
    fn dispatch(&self, event: &str) -> usize;
}
