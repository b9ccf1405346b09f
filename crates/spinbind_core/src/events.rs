//! Domain events emitted by a spinner engine
//!
//! Besides the generic host [`CHANGE_EVENT`], an engine reports boundary hits,
//! spin start/stop and acceleration through dot-namespaced domain events. The
//! names are part of the engine contract and must match exactly.

use bitflags::bitflags;

/// Generic value-change notification dispatched on the host element
pub const CHANGE_EVENT: &str = "change";

/// Dispatched on the host element when it gains focus
pub const FOCUS_EVENT: &str = "focus";

/// Dispatched on the host element when it loses focus
pub const BLUR_EVENT: &str = "blur";

/// A domain event emitted by the engine on its host element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DomainEvent {
    /// Value reached the configured minimum
    Min,
    /// Value reached the configured maximum
    Max,
    /// A spin (held button or key) started, either direction
    StartSpin,
    /// A spin stopped, either direction
    StopSpin,
    /// An upward spin started
    StartUpSpin,
    /// A downward spin started
    StartDownSpin,
    /// An upward spin stopped
    StopUpSpin,
    /// A downward spin stopped
    StopDownSpin,
    /// Spin acceleration changed the step rate
    SpeedChange,
}

impl DomainEvent {
    /// Number of domain events
    pub const COUNT: usize = 9;

    /// Every domain event, in declaration order
    pub const ALL: [DomainEvent; Self::COUNT] = [
        DomainEvent::Min,
        DomainEvent::Max,
        DomainEvent::StartSpin,
        DomainEvent::StopSpin,
        DomainEvent::StartUpSpin,
        DomainEvent::StartDownSpin,
        DomainEvent::StopUpSpin,
        DomainEvent::StopDownSpin,
        DomainEvent::SpeedChange,
    ];

    /// The exact event name dispatched on the host element
    pub fn name(self) -> &'static str {
        match self {
            DomainEvent::Min => "on.min",
            DomainEvent::Max => "on.max",
            DomainEvent::StartSpin => "on.startspin",
            DomainEvent::StopSpin => "on.stopspin",
            DomainEvent::StartUpSpin => "on.startupspin",
            DomainEvent::StartDownSpin => "on.startdownspin",
            DomainEvent::StopUpSpin => "on.stopupspin",
            DomainEvent::StopDownSpin => "on.stopdownspin",
            DomainEvent::SpeedChange => "on.speedchange",
        }
    }

    /// Look up a domain event by its event name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.name() == name)
    }

    /// Position of this event in [`DomainEvent::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The single-event set for this event
    pub fn flag(self) -> DomainEventSet {
        DomainEventSet::from_bits_truncate(1u16 << self.index())
    }
}

impl std::fmt::Display for DomainEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// A set of domain events, used to record which events have listeners
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct DomainEventSet: u16 {
        const MIN = 1 << 0;
        const MAX = 1 << 1;
        const START_SPIN = 1 << 2;
        const STOP_SPIN = 1 << 3;
        const START_UP_SPIN = 1 << 4;
        const START_DOWN_SPIN = 1 << 5;
        const STOP_UP_SPIN = 1 << 6;
        const STOP_DOWN_SPIN = 1 << 7;
        const SPEED_CHANGE = 1 << 8;

        // Common combinations
        const BOUNDS = Self::MIN.bits() | Self::MAX.bits();
        const SPIN = Self::START_SPIN.bits() | Self::STOP_SPIN.bits() |
                     Self::START_UP_SPIN.bits() | Self::START_DOWN_SPIN.bits() |
                     Self::STOP_UP_SPIN.bits() | Self::STOP_DOWN_SPIN.bits();
    }
}

impl DomainEventSet {
    /// Whether the set contains `event`
    pub fn has(self, event: DomainEvent) -> bool {
        self.contains(event.flag())
    }

    /// Iterate the events in this set, in declaration order
    pub fn events(self) -> impl Iterator<Item = DomainEvent> {
        DomainEvent::ALL
            .into_iter()
            .filter(move |event| self.has(*event))
    }
}

impl FromIterator<DomainEvent> for DomainEventSet {
    fn from_iter<I: IntoIterator<Item = DomainEvent>>(iter: I) -> Self {
        iter.into_iter()
            .fold(DomainEventSet::empty(), |set, event| set | event.flag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_exact() {
        let names: Vec<&str> = DomainEvent::ALL.iter().map(|e| e.name()).collect();
        assert_eq!(
            names,
            vec![
                "on.min",
                "on.max",
                "on.startspin",
                "on.stopspin",
                "on.startupspin",
                "on.startdownspin",
                "on.stopupspin",
                "on.stopdownspin",
                "on.speedchange",
            ]
        );
    }

    #[test]
    fn test_from_name() {
        assert_eq!(DomainEvent::from_name("on.max"), Some(DomainEvent::Max));
        assert_eq!(
            DomainEvent::from_name("on.speedchange"),
            Some(DomainEvent::SpeedChange)
        );
        assert_eq!(DomainEvent::from_name("change"), None);
        assert_eq!(DomainEvent::from_name("touchspin.on.min"), None);
    }

    #[test]
    fn test_flags_match_named_constants() {
        assert_eq!(DomainEvent::Min.flag(), DomainEventSet::MIN);
        assert_eq!(DomainEvent::StopDownSpin.flag(), DomainEventSet::STOP_DOWN_SPIN);
        assert_eq!(DomainEvent::SpeedChange.flag(), DomainEventSet::SPEED_CHANGE);
    }

    #[test]
    fn test_set_iteration_order() {
        let set: DomainEventSet = [DomainEvent::SpeedChange, DomainEvent::Min]
            .into_iter()
            .collect();
        let events: Vec<DomainEvent> = set.events().collect();
        assert_eq!(events, vec![DomainEvent::Min, DomainEvent::SpeedChange]);
        assert!(DomainEventSet::BOUNDS.has(DomainEvent::Max));
        assert!(!DomainEventSet::BOUNDS.has(DomainEvent::StartSpin));
    }
}
