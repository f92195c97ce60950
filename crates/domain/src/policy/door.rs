//! Door safety — an open door is force-closed after a bounded duration.

use std::time::Duration;

use crate::facility::FacilityState;
use crate::time::Timestamp;

/// How long the door may stay open before it is closed automatically.
pub const DEFAULT_OPEN_TIMEOUT: Duration = Duration::from_secs(10);

/// `true` when the door has been open for strictly longer than `timeout`.
/// Independent of the operating mode.
#[must_use]
pub fn auto_close_due(state: &FacilityState, now: Timestamp, timeout: Duration) -> bool {
    if !state.door_open() {
        return false;
    }
    let Some(opened_at) = state.door_opened_at() else {
        return false;
    };
    // a negative span (clock stepped back) converts to an error: not due
    (now - opened_at)
        .to_std()
        .is_ok_and(|open_for| open_for > timeout)
}
