//! Value reconciliation
//!
//! Decides on every update whose value is authoritative and pushes
//! corrections into the engine in one direction only:
//!
//! - Controlled: push the caller's value when it changed since the last
//!   update and the engine disagrees. An unchanged caller value never
//!   overwrites what the engine shows.
//! - Uncontrolled: never push from configuration. Engine events update the
//!   internal value instead.
//! - Mode switch: re-base the engine onto the new authority without
//!   reporting the resulting `change`.
//!
//! Every push is followed by [`settle`]: if the engine adjusted the pushed
//! value (clamping, rounding), a controlled caller is told the value the
//! engine actually shows and an uncontrolled binding adopts it.

use spinbind_core::number::format_number;

use crate::authority::{Authority, ChangeMeta};
use crate::config::SpinProps;
use crate::state::{BindingShared, Origin};

/// Resolve the authority for `props`
///
/// `previous` is the authority before this update, `None` on first use.
/// Leaving controlled mode falls back to the new `default_value`, never to
/// the stale caller value. Staying uncontrolled keeps the tracked value.
pub fn resolve(props: &SpinProps, previous: Option<Authority>) -> Authority {
    match (props.value, previous) {
        (Some(value), _) => Authority::External(value),
        (None, Some(Authority::Internal(value))) => Authority::Internal(value),
        (None, Some(Authority::External(_)) | None) => {
            Authority::Internal(props.default_value.unwrap_or(0.0))
        }
    }
}

/// What the reconciler writes into the engine
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Push {
    /// Leave the engine alone
    Keep,
    /// Controlled value changed and the engine disagrees
    Correct(f64),
    /// Ownership mode switched and the engine disagrees
    Rebase(f64),
}

/// Decide the push for moving from `previous` to `current` while the engine shows `live`
pub fn plan(previous: Authority, current: Authority, live: f64) -> Push {
    let mode_switched = previous.ownership() != current.ownership();
    match current {
        Authority::External(value) if previous == Authority::External(value) => Push::Keep,
        Authority::External(value) if live != value => {
            if mode_switched {
                Push::Rebase(value)
            } else {
                Push::Correct(value)
            }
        }
        Authority::Internal(value) if mode_switched && live != value => Push::Rebase(value),
        _ => Push::Keep,
    }
}

/// Bring the live engine in line with the current authority
pub(crate) fn reconcile(shared: &BindingShared, previous: Authority) {
    let current = shared.authority.get();
    let Some(engine) = shared.engine() else {
        tracing::trace!("no live engine, skipping reconciliation");
        return;
    };

    let value = match plan(previous, current, engine.get_value()) {
        Push::Keep => return,
        Push::Correct(value) => {
            tracing::debug!("pushing controlled value {}", format_number(value));
            value
        }
        Push::Rebase(value) => {
            tracing::debug!("re-basing {} -> {}", previous, current);
            value
        }
    };

    shared.with_engine(Origin::Silent, |engine| engine.set_value(value));
    settle(shared);
}

/// Reconcile the authority with what the engine actually shows
pub(crate) fn settle(shared: &BindingShared) {
    let Some(engine) = shared.engine() else {
        return;
    };
    let live = engine.get_value();
    if !live.is_finite() {
        return;
    }

    match shared.authority.get() {
        Authority::External(value) if live != value => {
            tracing::debug!(
                "engine adjusted {} to {}",
                format_number(value),
                format_number(live)
            );
            shared.report(live, ChangeMeta::prop_correction());
        }
        Authority::Internal(value) if live != value => {
            shared.authority.set(Authority::Internal(live));
        }
        _ => {}
    }
}
