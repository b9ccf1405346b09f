//! Event bridge
//!
//! Subscribes the `change`, `focus` and `blur` listeners plus one listener
//! per declared domain event when the engine is constructed, and removes
//! exactly that set on teardown. The set of domain events is frozen for the
//! lifetime of one engine; the callbacks themselves are looked up at
//! dispatch time, so replacing a closure on re-render takes effect
//! immediately.
//!
//! Listeners hold a `Weak` reference to the binding state. The host owns
//! the listeners and the binding owns the host, so a strong reference here
//! would form a cycle.

use std::rc::{Rc, Weak};

use smallvec::SmallVec;
use spinbind_core::{
    parse_number, DomainEvent, DomainEventSet, HostElement, ListenerId, BLUR_EVENT, CHANGE_EVENT,
    FOCUS_EVENT,
};

use crate::authority::{Authority, ChangeMeta};
use crate::state::{BindingShared, Origin};

/// Listeners registered on a host for one engine lifetime
pub(crate) struct Subscription {
    host: Rc<dyn HostElement>,
    ids: SmallVec<[ListenerId; 6]>,
    events: DomainEventSet,
}

impl Subscription {
    /// Domain events covered by this subscription
    pub(crate) fn events(&self) -> DomainEventSet {
        self.events
    }

    /// Remove every listener; returns how many were still registered
    pub(crate) fn cancel(self) -> usize {
        self.ids
            .iter()
            .filter(|id| self.host.remove_listener(**id))
            .count()
    }
}

/// Register the host listeners and one listener per event in `events`
pub(crate) fn subscribe(
    shared: &Rc<BindingShared>,
    host: &Rc<dyn HostElement>,
    events: DomainEventSet,
) -> Subscription {
    let mut ids = SmallVec::new();

    let weak = Rc::downgrade(shared);
    ids.push(host.add_listener(
        CHANGE_EVENT,
        Rc::new(move || with_shared(&weak, handle_change)),
    ));

    let weak = Rc::downgrade(shared);
    ids.push(host.add_listener(
        FOCUS_EVENT,
        Rc::new(move || with_shared(&weak, |shared| handle_focus(shared, true))),
    ));
    let weak = Rc::downgrade(shared);
    ids.push(host.add_listener(
        BLUR_EVENT,
        Rc::new(move || with_shared(&weak, |shared| handle_focus(shared, false))),
    ));

    for event in events.events() {
        let weak = Rc::downgrade(shared);
        ids.push(host.add_listener(
            event.name(),
            Rc::new(move || with_shared(&weak, |shared| handle_domain(shared, event))),
        ));
    }

    tracing::trace!("subscribed {} listeners", ids.len());
    Subscription {
        host: host.clone(),
        ids,
        events,
    }
}

fn with_shared(weak: &Weak<BindingShared>, f: impl FnOnce(&BindingShared)) {
    if let Some(shared) = weak.upgrade() {
        f(&shared);
    }
}

/// Read the host's raw value and report it
pub(crate) fn handle_change(shared: &BindingShared) {
    let Some(host) = shared.host() else {
        return;
    };
    let raw = host.raw_value();
    let Some(value) = parse_number(&raw) else {
        tracing::debug!("ignoring non-numeric input {:?}", raw);
        return;
    };

    if let Authority::Internal(_) = shared.authority.get() {
        shared.authority.set(Authority::Internal(value));
    }

    let meta = match shared.origin.get() {
        Origin::Silent => return,
        Origin::User => ChangeMeta::user_input(),
        Origin::Tagged(meta) => meta,
    };
    shared.report(value, meta);
}

fn handle_focus(shared: &BindingShared, focused: bool) {
    let callback = if focused {
        shared.callbacks.borrow().on_focus()
    } else {
        shared.callbacks.borrow().on_blur()
    };
    if let Some(callback) = callback {
        callback();
    }
}

fn handle_domain(shared: &BindingShared, event: DomainEvent) {
    let callback = shared.callbacks.borrow().domain(event);
    if let Some(callback) = callback {
        callback();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use spinbind_core::memory::MemoryHost;

    use crate::authority::ChangeAction;
    use crate::config::BindingConfig;

    fn recorder(authority: Authority) -> (Rc<BindingShared>, Rc<RefCell<Vec<(f64, ChangeMeta)>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let config = BindingConfig::new().on_change(move |value, meta| sink.borrow_mut().push((value, meta)));
        (BindingShared::new(authority, config.callbacks), seen)
    }

    fn attach(shared: &Rc<BindingShared>, host: Rc<MemoryHost>) -> Rc<dyn HostElement> {
        let host: Rc<dyn HostElement> = host;
        shared.host.replace(Some(host.clone()));
        host
    }

    #[test]
    fn test_change_updates_internal_value() {
        let (shared, seen) = recorder(Authority::Internal(25.0));
        let memory = MemoryHost::new();
        let host = attach(&shared, memory.clone());
        let _subscription = subscribe(&shared, &host, DomainEventSet::empty());

        memory.type_text("30");
        assert_eq!(shared.authority.get(), Authority::Internal(30.0));
        assert_eq!(*seen.borrow(), vec![(30.0, ChangeMeta::user_input())]);
    }

    #[test]
    fn test_change_keeps_external_value() {
        let (shared, seen) = recorder(Authority::External(42.0));
        let memory = MemoryHost::new();
        let host = attach(&shared, memory.clone());
        let _subscription = subscribe(&shared, &host, DomainEventSet::empty());

        memory.type_text("43");
        assert_eq!(shared.authority.get(), Authority::External(42.0));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_non_numeric_input_is_dropped() {
        let (shared, seen) = recorder(Authority::Internal(5.0));
        let memory = MemoryHost::new();
        let host = attach(&shared, memory.clone());
        let _subscription = subscribe(&shared, &host, DomainEventSet::empty());

        memory.type_text("abc");
        memory.type_text("Infinity");
        assert!(seen.borrow().is_empty());
        assert_eq!(shared.authority.get(), Authority::Internal(5.0));
    }

    #[test]
    fn test_origin_tags_and_silences() {
        let (shared, seen) = recorder(Authority::Internal(0.0));
        let memory = MemoryHost::new();
        let host = attach(&shared, memory.clone());
        let _subscription = subscribe(&shared, &host, DomainEventSet::empty());

        shared.origin.set(Origin::Silent);
        memory.type_text("1");
        shared.origin.set(Origin::Tagged(ChangeMeta::api(ChangeAction::Increment)));
        memory.type_text("2");

        assert_eq!(
            *seen.borrow(),
            vec![(2.0, ChangeMeta::api(ChangeAction::Increment))]
        );
        assert_eq!(shared.authority.get(), Authority::Internal(2.0));
    }

    #[test]
    fn test_cancel_removes_exact_set() {
        let hits = Rc::new(RefCell::new(0));
        let counter = hits.clone();
        let config = BindingConfig::new().on_max(move || *counter.borrow_mut() += 1);
        let shared = BindingShared::new(Authority::Internal(0.0), config.callbacks.clone());
        let memory = MemoryHost::new();
        let host = attach(&shared, memory.clone());

        let unrelated = memory.add_listener("on.max", Rc::new(|| {}));
        let subscription = subscribe(&shared, &host, config.callbacks.declared());
        assert_eq!(subscription.events(), DomainEventSet::MAX);
        assert_eq!(memory.listener_count(), 5);

        memory.dispatch("on.max");
        assert_eq!(*hits.borrow(), 1);

        assert_eq!(subscription.cancel(), 4);
        memory.dispatch("on.max");
        assert_eq!(*hits.borrow(), 1);
        assert!(memory.remove_listener(unrelated));
    }

    #[test]
    fn test_focus_and_blur_reach_current_callbacks() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let focus_sink = seen.clone();
        let blur_sink = seen.clone();
        let config = BindingConfig::new()
            .on_focus(move || focus_sink.borrow_mut().push("focus"))
            .on_blur(move || blur_sink.borrow_mut().push("blur"));
        let shared = BindingShared::new(Authority::Internal(0.0), config.callbacks);
        let memory = MemoryHost::new();
        let host = attach(&shared, memory.clone());
        let _subscription = subscribe(&shared, &host, DomainEventSet::empty());

        memory.focus();
        memory.blur();
        assert_eq!(*seen.borrow(), vec!["focus", "blur"]);

        shared.callbacks.replace(BindingConfig::new().callbacks);
        memory.focus();
        assert_eq!(seen.borrow().len(), 2);
    }
}
