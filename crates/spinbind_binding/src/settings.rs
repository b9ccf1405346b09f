//! Settings bridge
//!
//! Forwards min/max/step/decimals/prefix/suffix changes to the live engine
//! without remounting it. Only fields present in the new configuration are
//! sent, so a field dropped from the configuration keeps its last engine
//! value instead of being reset.

use spinbind_core::{HostAttributes, SettingsPatch};

use crate::config::SpinProps;
use crate::state::BindingShared;

/// The patch to forward when moving from `old` to `new`, if any
pub fn diff(old: &SpinProps, new: &SpinProps) -> Option<SettingsPatch> {
    let before = old.settings();
    let after = new.settings();
    if before == after || after.is_empty() {
        return None;
    }
    Some(after)
}

/// Forward changed settings to the live engine
///
/// Returns whether a patch was sent.
pub(crate) fn forward(shared: &BindingShared, old: &SpinProps, new: &SpinProps) -> bool {
    let Some(patch) = diff(old, new) else {
        return false;
    };
    let Some(engine) = shared.engine() else {
        tracing::trace!("no live engine, dropping settings update");
        return false;
    };
    tracing::debug!("forwarding settings {:?}", patch);
    engine.update_settings(&patch);
    true
}

/// Re-apply host attributes when any of them changed
pub(crate) fn apply_attributes(shared: &BindingShared, old: &SpinProps, new: &SpinProps) -> bool {
    let attributes: HostAttributes = new.attributes();
    if attributes == old.attributes() || attributes.is_empty() {
        return false;
    }
    let Some(host) = shared.host() else {
        return false;
    };
    host.apply_attributes(&attributes);
    true
}
