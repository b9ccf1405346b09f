//! In-memory host element and reference engine
//!
//! [`MemoryHost`] is a headless input element with a listener table, and
//! [`MemoryEngine`] a small reference spinner that steps, clamps, rounds to
//! `decimals`, and dispatches `change` plus the `on.*` domain events on its
//! host. Every engine call is recorded in a shared [`CallLog`], which makes
//! the pair useful for tests, simulators, and platforms without a native
//! widget.
//!
//! # Example
//!
//! ```
//! use spinbind_core::memory::{MemoryFactory, MemoryHost};
//! use spinbind_core::{EngineFactory, EngineOptions, HostElement, SpinEngine};
//!
//! let factory = MemoryFactory::new();
//! let host = MemoryHost::with_value("41");
//! let engine = factory.construct(host.clone(), EngineOptions::default()).unwrap();
//!
//! engine.up_once();
//! assert_eq!(host.raw_value(), "42");
//! assert_eq!(factory.log().construct_count(), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::engine::{EngineFactory, SpinEngine};
use crate::error::{EngineError, Result};
use crate::events::{DomainEvent, BLUR_EVENT, CHANGE_EVENT, FOCUS_EVENT};
use crate::host::{HostAttributes, HostElement, HostListener, ListenerId};
use crate::number::{format_fixed, parse_number, round_to};
use crate::options::{EngineOptions, Renderer, SettingsPatch};

/// Steps after which a held spin reports acceleration
pub const SPEED_CHANGE_TICKS: u32 = 10;

// ============================================================================
// Host
// ============================================================================

struct Registered {
    event: String,
    listener: HostListener,
}

/// Headless input element
#[derive(Default)]
pub struct MemoryHost {
    value: RefCell<String>,
    attributes: RefCell<HostAttributes>,
    focused: Cell<bool>,
    listeners: RefCell<SlotMap<ListenerId, Registered>>,
    by_event: RefCell<FxHashMap<String, SmallVec<[ListenerId; 2]>>>,
}

impl MemoryHost {
    /// Create an empty host
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Create a host holding `raw` as its text value
    pub fn with_value(raw: &str) -> Rc<Self> {
        let host = Self::default();
        host.value.replace(raw.to_string());
        Rc::new(host)
    }

    /// Simulate a committed user edit: replace the text, then dispatch `change`
    pub fn type_text(&self, text: &str) -> usize {
        self.set_raw_value(text);
        self.dispatch(CHANGE_EVENT)
    }

    /// Whether the element currently has focus
    pub fn is_focused(&self) -> bool {
        self.focused.get()
    }

    /// Attributes applied so far
    pub fn attributes(&self) -> HostAttributes {
        self.attributes.borrow().clone()
    }

    /// Total number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Number of listeners registered for `event`
    pub fn listeners_for(&self, event: &str) -> usize {
        self.by_event.borrow().get(event).map_or(0, |ids| ids.len())
    }
}

impl HostElement for MemoryHost {
    fn raw_value(&self) -> String {
        self.value.borrow().clone()
    }

    fn set_raw_value(&self, value: &str) {
        self.value.replace(value.to_string());
    }

    fn focus(&self) {
        if !self.focused.replace(true) {
            self.dispatch(FOCUS_EVENT);
        }
    }

    fn blur(&self) {
        if self.focused.replace(false) {
            self.dispatch(BLUR_EVENT);
        }
    }

    fn apply_attributes(&self, attributes: &HostAttributes) {
        let mut current = self.attributes.borrow_mut();
        if attributes.name.is_some() {
            current.name.clone_from(&attributes.name);
        }
        if attributes.id.is_some() {
            current.id.clone_from(&attributes.id);
        }
        if attributes.disabled.is_some() {
            current.disabled = attributes.disabled;
        }
        if attributes.read_only.is_some() {
            current.read_only = attributes.read_only;
        }
    }

    fn add_listener(&self, event: &str, listener: HostListener) -> ListenerId {
        let id = self.listeners.borrow_mut().insert(Registered {
            event: event.to_string(),
            listener,
        });
        self.by_event
            .borrow_mut()
            .entry(event.to_string())
            .or_default()
            .push(id);
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let Some(registered) = self.listeners.borrow_mut().remove(id) else {
            return false;
        };
        if let Some(ids) = self.by_event.borrow_mut().get_mut(&registered.event) {
            ids.retain(|existing| *existing != id);
        }
        true
    }

    fn dispatch(&self, event: &str) -> usize {
        // Collect first: listeners may add or remove listeners while running
        let listeners: SmallVec<[HostListener; 4]> = {
            let by_event = self.by_event.borrow();
            let registry = self.listeners.borrow();
            by_event
                .get(event)
                .map(|ids| {
                    ids.iter()
                        .filter_map(|id| registry.get(*id))
                        .map(|registered| registered.listener.clone())
                        .collect()
                })
                .unwrap_or_default()
        };

        for listener in &listeners {
            listener();
        }
        listeners.len()
    }
}

// ============================================================================
// Call log
// ============================================================================

/// One recorded engine call
#[derive(Clone, Debug, PartialEq)]
pub enum EngineCall {
    Construct(Renderer),
    SetValue(f64),
    UpOnce,
    DownOnce,
    UpdateSettings(SettingsPatch),
    Destroy,
}

/// Shared, cloneable record of engine calls
#[derive(Clone, Default)]
pub struct CallLog {
    calls: Rc<RefCell<Vec<EngineCall>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: EngineCall) {
        self.calls.borrow_mut().push(call);
    }

    /// Snapshot of every recorded call
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.borrow().clone()
    }

    /// Count the calls matching `predicate`
    pub fn count(&self, predicate: impl Fn(&EngineCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| predicate(call)).count()
    }

    pub fn construct_count(&self) -> usize {
        self.count(|call| matches!(call, EngineCall::Construct(_)))
    }

    pub fn set_value_count(&self) -> usize {
        self.count(|call| matches!(call, EngineCall::SetValue(_)))
    }

    pub fn update_settings_count(&self) -> usize {
        self.count(|call| matches!(call, EngineCall::UpdateSettings(_)))
    }

    pub fn destroy_count(&self) -> usize {
        self.count(|call| matches!(call, EngineCall::Destroy))
    }

    /// The most recent settings patch, if any
    pub fn last_settings(&self) -> Option<SettingsPatch> {
        self.calls.borrow().iter().rev().find_map(|call| match call {
            EngineCall::UpdateSettings(patch) => Some(patch.clone()),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Reference spinner engine
pub struct MemoryEngine {
    host: Rc<dyn HostElement>,
    renderer: Renderer,
    settings: RefCell<SettingsPatch>,
    destroyed: Cell<bool>,
    log: CallLog,
}

impl MemoryEngine {
    /// Attach to `host`, normalizing its current text to the configured constraints
    pub fn attach(host: Rc<dyn HostElement>, options: &EngineOptions, log: CallLog) -> Rc<Self> {
        let renderer = options.renderer().unwrap_or_default();
        log.push(EngineCall::Construct(renderer));

        let engine = Rc::new(Self {
            host,
            renderer,
            settings: RefCell::new(options.settings()),
            destroyed: Cell::new(false),
            log,
        });

        if let Some(value) = parse_number(&engine.host.raw_value()) {
            let constrained = engine.constrain(value);
            engine.host.set_raw_value(&engine.format(constrained));
        }
        engine
    }

    pub fn renderer(&self) -> Renderer {
        self.renderer
    }

    /// Effective settings after every applied patch
    pub fn settings(&self) -> SettingsPatch {
        self.settings.borrow().clone()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    /// Simulate holding the up button for `ticks` steps
    pub fn spin_up(&self, ticks: u32) {
        self.spin(ticks, true);
    }

    /// Simulate holding the down button for `ticks` steps
    pub fn spin_down(&self, ticks: u32) {
        self.spin(ticks, false);
    }

    fn spin(&self, ticks: u32, up: bool) {
        if self.destroyed.get() {
            return;
        }
        let (start, stop) = if up {
            (DomainEvent::StartUpSpin, DomainEvent::StopUpSpin)
        } else {
            (DomainEvent::StartDownSpin, DomainEvent::StopDownSpin)
        };

        self.emit(DomainEvent::StartSpin);
        self.emit(start);
        for tick in 1..=ticks {
            if up {
                self.step_by(1.0);
            } else {
                self.step_by(-1.0);
            }
            if tick == SPEED_CHANGE_TICKS {
                self.emit(DomainEvent::SpeedChange);
            }
        }
        self.emit(stop);
        self.emit(DomainEvent::StopSpin);
    }

    fn emit(&self, event: DomainEvent) {
        self.host.dispatch(event.name());
    }

    fn step(&self) -> f64 {
        self.settings.borrow().step.unwrap_or(1.0)
    }

    fn decimals(&self) -> u32 {
        self.settings.borrow().decimals.unwrap_or(0)
    }

    fn format(&self, value: f64) -> String {
        format_fixed(value, self.decimals())
    }

    fn constrain(&self, value: f64) -> f64 {
        let settings = self.settings.borrow();
        let mut result = value;
        if let Some(min) = settings.min {
            result = result.max(min);
        }
        if let Some(max) = settings.max {
            result = result.min(max);
        }
        round_to(result, settings.decimals.unwrap_or(0))
    }

    /// Write `value`, dispatching `change` if the numeric value moved
    fn write(&self, value: f64) -> bool {
        let previous = self.get_value();
        self.host.set_raw_value(&self.format(value));
        let changed = previous.is_nan() || previous != value;
        if changed {
            self.host.dispatch(CHANGE_EVENT);
        }
        changed
    }

    fn step_by(&self, direction: f64) {
        let (min, max) = {
            let settings = self.settings.borrow();
            (settings.min, settings.max)
        };
        let current = self.get_value();
        let base = if current.is_nan() { min.unwrap_or(0.0) } else { current };

        let boundary = if direction > 0.0 { max } else { min };
        let boundary_event = if direction > 0.0 {
            DomainEvent::Max
        } else {
            DomainEvent::Min
        };

        if boundary == Some(base) {
            self.emit(boundary_event);
            return;
        }

        let next = self.constrain(base + direction * self.step());
        self.write(next);
        if boundary == Some(next) {
            self.emit(boundary_event);
        }
    }
}

impl SpinEngine for MemoryEngine {
    fn get_value(&self) -> f64 {
        parse_number(&self.host.raw_value()).unwrap_or(f64::NAN)
    }

    fn set_value(&self, value: f64) {
        if self.destroyed.get() {
            return;
        }
        self.log.push(EngineCall::SetValue(value));
        self.write(self.constrain(value));
    }

    fn up_once(&self) {
        if self.destroyed.get() {
            return;
        }
        self.log.push(EngineCall::UpOnce);
        self.step_by(1.0);
    }

    fn down_once(&self) {
        if self.destroyed.get() {
            return;
        }
        self.log.push(EngineCall::DownOnce);
        self.step_by(-1.0);
    }

    fn update_settings(&self, patch: &SettingsPatch) {
        if self.destroyed.get() {
            return;
        }
        self.log.push(EngineCall::UpdateSettings(patch.clone()));
        self.settings.borrow_mut().merge(patch);
    }

    fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        self.log.push(EngineCall::Destroy);
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Constructs [`MemoryEngine`]s that share one [`CallLog`]
#[derive(Clone, Default)]
pub struct MemoryFactory {
    log: CallLog,
    engines: Rc<RefCell<Vec<Rc<MemoryEngine>>>>,
    fail_next: Rc<RefCell<Option<EngineError>>>,
}

impl MemoryFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared call log
    pub fn log(&self) -> &CallLog {
        &self.log
    }

    /// The most recently constructed engine
    pub fn last_engine(&self) -> Option<Rc<MemoryEngine>> {
        self.engines.borrow().last().cloned()
    }

    /// Number of constructed engines not yet destroyed
    pub fn live_count(&self) -> usize {
        self.engines
            .borrow()
            .iter()
            .filter(|engine| !engine.is_destroyed())
            .count()
    }

    /// Make the next construction fail with `error`
    pub fn fail_next(&self, error: EngineError) {
        self.fail_next.replace(Some(error));
    }
}

impl EngineFactory for MemoryFactory {
    fn construct(
        &self,
        host: Rc<dyn HostElement>,
        options: EngineOptions,
    ) -> Result<Rc<dyn SpinEngine>> {
        if let Some(error) = self.fail_next.borrow_mut().take() {
            return Err(error);
        }
        let engine = MemoryEngine::attach(host, &options, self.log.clone());
        self.engines.borrow_mut().push(engine.clone());
        let engine: Rc<dyn SpinEngine> = engine;
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn options(settings: SettingsPatch) -> EngineOptions {
        EngineOptions::derive(Renderer::Vanilla, &settings, &serde_json::Map::new())
    }

    fn bounded(min: f64, max: f64) -> SettingsPatch {
        SettingsPatch {
            min: Some(min),
            max: Some(max),
            step: Some(1.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_host_dispatch_in_registration_order() {
        let host = MemoryHost::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = seen.clone();
        host.add_listener("change", Rc::new(move || first.borrow_mut().push(1)));
        let second = seen.clone();
        host.add_listener("change", Rc::new(move || second.borrow_mut().push(2)));

        assert_eq!(host.dispatch("change"), 2);
        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(host.dispatch("on.max"), 0);
    }

    #[test]
    fn test_host_remove_listener() {
        let host = MemoryHost::new();
        let id = host.add_listener("on.min", Rc::new(|| {}));
        assert_eq!(host.listeners_for("on.min"), 1);

        assert!(host.remove_listener(id));
        assert!(!host.remove_listener(id));
        assert_eq!(host.listeners_for("on.min"), 0);
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn test_host_attributes_merge() {
        let host = MemoryHost::new();
        host.apply_attributes(&HostAttributes {
            name: Some("qty".into()),
            disabled: Some(true),
            ..Default::default()
        });
        host.apply_attributes(&HostAttributes {
            disabled: Some(false),
            ..Default::default()
        });

        let attributes = host.attributes();
        assert_eq!(attributes.name.as_deref(), Some("qty"));
        assert_eq!(attributes.disabled, Some(false));
        assert_eq!(attributes.read_only, None);
    }

    #[test]
    fn test_host_focus_dispatches_on_transition() {
        let host = MemoryHost::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for event in [FOCUS_EVENT, BLUR_EVENT] {
            let sink = seen.clone();
            host.add_listener(event, Rc::new(move || sink.borrow_mut().push(event)));
        }

        host.blur();
        host.focus();
        host.focus();
        assert!(host.is_focused());
        host.blur();

        assert_eq!(*seen.borrow(), vec!["focus", "blur"]);
        assert!(!host.is_focused());
    }

    #[test]
    fn test_engine_steps_and_clamps() {
        let factory = MemoryFactory::new();
        let host = MemoryHost::with_value("99");
        let engine = factory.construct(host.clone(), options(bounded(0.0, 100.0))).unwrap();

        engine.up_once();
        assert_eq!(engine.get_value(), 100.0);
        engine.up_once();
        assert_eq!(engine.get_value(), 100.0);

        engine.set_value(-20.0);
        assert_eq!(host.raw_value(), "0");
    }

    #[test]
    fn test_engine_normalizes_initial_value() {
        let factory = MemoryFactory::new();
        let host = MemoryHost::with_value("150");
        factory.construct(host.clone(), options(bounded(0.0, 100.0))).unwrap();
        assert_eq!(host.raw_value(), "100");
    }

    #[test]
    fn test_engine_dispatches_change_only_when_value_moves() {
        let factory = MemoryFactory::new();
        let host = MemoryHost::with_value("5");
        let engine = factory.construct(host.clone(), options(SettingsPatch::default())).unwrap();

        let changes = Rc::new(Cell::new(0));
        let counter = changes.clone();
        host.add_listener(CHANGE_EVENT, Rc::new(move || counter.set(counter.get() + 1)));

        engine.set_value(5.0);
        assert_eq!(changes.get(), 0);
        engine.set_value(6.0);
        assert_eq!(changes.get(), 1);
        assert_eq!(factory.log().set_value_count(), 2);
    }

    #[test]
    fn test_engine_emits_boundary_events() {
        let factory = MemoryFactory::new();
        let host = MemoryHost::with_value("1");
        let engine = factory.construct(host.clone(), options(bounded(0.0, 2.0))).unwrap();

        let hits = Rc::new(RefCell::new(Vec::new()));
        for event in [DomainEvent::Min, DomainEvent::Max] {
            let hits = hits.clone();
            host.add_listener(event.name(), Rc::new(move || hits.borrow_mut().push(event)));
        }

        engine.up_once();
        engine.down_once();
        engine.down_once();
        assert_eq!(*hits.borrow(), vec![DomainEvent::Max, DomainEvent::Min]);
    }

    #[test]
    fn test_engine_spin_sequence() {
        let factory = MemoryFactory::new();
        let host = MemoryHost::with_value("0");
        factory.construct(host.clone(), options(SettingsPatch::default())).unwrap();
        let engine = factory.last_engine().unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        for event in DomainEvent::ALL {
            let seen = seen.clone();
            host.add_listener(event.name(), Rc::new(move || seen.borrow_mut().push(event)));
        }

        engine.spin_up(SPEED_CHANGE_TICKS);
        assert_eq!(engine.get_value(), SPEED_CHANGE_TICKS as f64);
        assert_eq!(
            *seen.borrow(),
            vec![
                DomainEvent::StartSpin,
                DomainEvent::StartUpSpin,
                DomainEvent::SpeedChange,
                DomainEvent::StopUpSpin,
                DomainEvent::StopSpin,
            ]
        );
    }

    #[test]
    fn test_engine_decimals_formatting() {
        let factory = MemoryFactory::new();
        let host = MemoryHost::with_value("10.5");
        let settings = SettingsPatch {
            step: Some(0.1),
            decimals: Some(2),
            ..Default::default()
        };
        let engine = factory.construct(host.clone(), options(settings)).unwrap();
        assert_eq!(host.raw_value(), "10.50");

        engine.up_once();
        assert_eq!(host.raw_value(), "10.60");
        assert_eq!(engine.get_value(), 10.6);
    }

    #[test]
    fn test_destroyed_engine_ignores_calls() {
        let factory = MemoryFactory::new();
        let host = MemoryHost::with_value("3");
        let engine = factory.construct(host.clone(), options(SettingsPatch::default())).unwrap();

        engine.destroy();
        engine.destroy();
        engine.up_once();
        engine.set_value(9.0);

        assert_eq!(host.raw_value(), "3");
        assert_eq!(factory.log().destroy_count(), 1);
        assert_eq!(factory.live_count(), 0);
    }

    #[test]
    fn test_factory_failure_is_one_shot() {
        let factory = MemoryFactory::new();
        factory.fail_next(EngineError::InvalidHost("detached".into()));

        let host = MemoryHost::new();
        assert!(factory.construct(host.clone(), EngineOptions::default()).is_err());
        assert!(factory.construct(host, EngineOptions::default()).is_ok());
        assert_eq!(factory.log().construct_count(), 1);
    }
}
