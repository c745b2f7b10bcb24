//! Status transition rules for vulnerability records.
//!
//! The transition graph is deliberately flat: an analyst may move a record
//! between any two recognized statuses and no status is terminal. A record
//! marked `Patched` can be reopened, and a `False Positive` can be
//! reclassified. The functions here keep that rule in one place so the
//! store applies it uniformly.

use crate::model::Status;

/// Statuses a record in `from` may transition to.
///
/// Every recognized status is reachable from every other, including
/// itself (re-asserting the current status is a valid, observable write).
#[inline]
#[must_use]
pub fn allowed_transitions(from: Status) -> &'static [Status] {
    let _ = from;
    &Status::ALL
}

/// Whether a record may move from `from` to `to`. Total over recognized
/// statuses.
#[inline]
#[must_use]
pub fn can_transition(from: Status, to: Status) -> bool {
    allowed_transitions(from).contains(&to)
}
