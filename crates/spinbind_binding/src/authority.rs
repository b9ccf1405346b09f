//! Value ownership and change metadata
//!
//! A binding is either *controlled* (the caller owns the value and the
//! binding mirrors it) or *uncontrolled* (the binding owns the value). The
//! two are never tracked as independent fields: [`Authority`] carries the
//! side and the value together, and is re-resolved on every update.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which side owns the value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ownership {
    Controlled,
    Uncontrolled,
}

/// The side that currently determines the displayed value, with that value
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Authority {
    /// Caller-owned value
    External(f64),
    /// Binding-owned value
    Internal(f64),
}

impl Authority {
    /// The authoritative value
    pub fn value(self) -> f64 {
        match self {
            Authority::External(value) | Authority::Internal(value) => value,
        }
    }

    pub fn ownership(self) -> Ownership {
        match self {
            Authority::External(_) => Ownership::Controlled,
            Authority::Internal(_) => Ownership::Uncontrolled,
        }
    }

    pub fn is_controlled(self) -> bool {
        matches!(self, Authority::External(_))
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Authority::External(value) => write!(f, "external({})", value),
            Authority::Internal(value) => write!(f, "internal({})", value),
        }
    }
}

// ============================================================================
// Change metadata
// ============================================================================

/// Where a reported value change came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeSource {
    /// Engine-driven: typing, buttons, keyboard stepping
    User,
    /// The caller's configuration (an engine correction of a pushed value)
    Prop,
    /// An imperative handle call
    Api,
}

/// What produced a reported value change
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeAction {
    Input,
    Increment,
    Decrement,
    SetValue,
}

/// Metadata passed alongside every reported value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeMeta {
    pub source: ChangeSource,
    pub action: ChangeAction,
}

impl ChangeMeta {
    pub const fn new(source: ChangeSource, action: ChangeAction) -> Self {
        Self { source, action }
    }

    /// Engine-driven change
    pub const fn user_input() -> Self {
        Self::new(ChangeSource::User, ChangeAction::Input)
    }

    /// Imperative handle call
    pub const fn api(action: ChangeAction) -> Self {
        Self::new(ChangeSource::Api, action)
    }

    /// Engine correction of a caller-supplied value
    pub const fn prop_correction() -> Self {
        Self::new(ChangeSource::Prop, ChangeAction::SetValue)
    }
}

impl fmt::Display for ChangeMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{:?}", self.source, self.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authority_accessors() {
        assert_eq!(Authority::External(4.0).value(), 4.0);
        assert_eq!(Authority::Internal(7.5).value(), 7.5);
        assert!(Authority::External(0.0).is_controlled());
        assert_eq!(Authority::Internal(0.0).ownership(), Ownership::Uncontrolled);
    }

    #[test]
    fn test_meta_serializes_like_callback_payload() {
        let meta = ChangeMeta::api(ChangeAction::SetValue);
        assert_eq!(
            serde_json::to_value(meta).unwrap(),
            serde_json::json!({"source": "api", "action": "setValue"})
        );
        assert_eq!(ChangeMeta::user_input().to_string(), "User/Input");
    }
}
