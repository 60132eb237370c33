//! Guard evaluation
//!
//! A guard has two layers. [`GuardSource`] is the raw phase-exit predicate
//! (a scheduled time passed, contacts ended, contacts resumed).
//! [`detect_guard_condition`] decides whether a raw hit on this tick is a
//! *new* detection worth arming, filtering out repeats and signals that
//! arrive too soon after the last phase change.

use serde::Serialize;

use super::state::{MachineState, TickInput};

/// Raw phase-exit predicate for one transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuardSource {
    /// Fires once the tick time is strictly past `after` (seconds).
    ScheduledTime {
        /// Scheduled exit time in seconds
        after: f64,
    },
    /// Fires when no contacts are active (takeoff).
    ContactsEnded,
    /// Fires when any contact is active (touchdown).
    ContactsResumed,
}

impl GuardSource {
    /// Evaluates the raw predicate against this tick's input.
    #[must_use]
    pub fn raw_condition(&self, input: &TickInput) -> bool {
        match self {
            Self::ScheduledTime { after } => input.time > *after,
            Self::ContactsEnded => input.active_contacts == 0,
            Self::ContactsResumed => input.active_contacts != 0,
        }
    }

    /// Returns whether this guard reads the contact signal.
    #[must_use]
    pub const fn uses_contacts(&self) -> bool {
        matches!(self, Self::ContactsEnded | Self::ContactsResumed)
    }
}

impl std::fmt::Display for GuardSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScheduledTime { after } => write!(f, "scheduled time {after}s passed"),
            Self::ContactsEnded => f.write_str("contacts ended"),
            Self::ContactsResumed => f.write_str("contacts resumed"),
        }
    }
}

/// Decides whether this tick is a valid new detection of an exit condition.
///
/// True only when all hold:
/// - `raw_condition` is true;
/// - no detection is already armed (re-arming would restart the delay
///   countdown forever under a flickering signal);
/// - more than `buffer_time` has passed since the last phase change, so
///   stale messages queued before the change are discarded.
///
/// Pure predicate; arming is the caller's job.
#[must_use]
pub fn detect_guard_condition(
    raw_condition: bool,
    current_time: f64,
    state: &MachineState,
    buffer_time: f64,
) -> bool {
    raw_condition
        && !state.detection_armed()
        && (current_time - state.last_transition_time()) > buffer_time
}
