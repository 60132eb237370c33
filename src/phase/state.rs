//! Phase state representation
//!
//! The closed set of jump phases, the per-tick input the engine consumes,
//! and the mutable machine state owned by [`PhaseEngine`](super::PhaseEngine).

use serde::{Deserialize, Serialize};

use crate::error::PhaseError;

use super::debounce::DebounceBuffer;
use super::guard::GuardSource;

/// Phase of the jumping maneuver.
///
/// Phases are totally ordered (`Balance < Crouch < Flight < Land`) and the
/// engine only ever moves forward through them, except when a timeline
/// reset sends it back to the configured initial phase.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Phase {
    /// Standing balance before the maneuver starts
    #[default]
    Balance = 0,
    /// Loading the legs before takeoff
    Crouch = 1,
    /// Airborne
    Flight = 2,
    /// Touchdown and recovery; terminal
    Land = 3,
}

impl Phase {
    /// Every phase in maneuver order.
    pub const ALL: [Self; 4] = [Self::Balance, Self::Crouch, Self::Flight, Self::Land];

    /// Returns the scalar identifier published to downstream consumers.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Returns the lowercase phase name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Balance => "balance",
            Self::Crouch => "crouch",
            Self::Flight => "flight",
            Self::Land => "land",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<i64> for Phase {
    type Error = PhaseError;

    /// Converts a phase scalar back into a [`Phase`].
    ///
    /// Out-of-range values are never coerced.
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Balance),
            1 => Ok(Self::Crouch),
            2 => Ok(Self::Flight),
            3 => Ok(Self::Land),
            other => Err(PhaseError::InvalidPhaseValue(other)),
        }
    }
}

/// One control tick's worth of input, after contact resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Robot state timestamp in seconds
    pub time: f64,
    /// Number of active contacts reported for this tick
    pub active_contacts: usize,
}

impl TickInput {
    /// Creates a tick input.
    #[must_use]
    pub const fn new(time: f64, active_contacts: usize) -> Self {
        Self {
            time,
            active_contacts,
        }
    }
}

/// Record of a committed phase transition, handed to observers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseTransition {
    /// Phase we transitioned from
    pub from: Phase,
    /// Phase we transitioned to
    pub to: Phase,
    /// Tick time at which the transition committed
    pub time: f64,
    /// Tick time at which the exit condition was first detected
    pub first_detection_time: f64,
    /// Guard that fired
    pub trigger: GuardSource,
}

/// Record of a discontinuous timeline reset (time went backwards).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineReset {
    /// Tick time that triggered the reset
    pub time: f64,
    /// Latest tick time seen before the reset
    pub previous_time: f64,
    /// Phase that was active before the reset
    pub phase_before: Phase,
    /// Phase the machine was reset to
    pub phase_after: Phase,
}

/// Mutable machine state, written only by the engine's tick.
///
/// `last_tick_time` is the latest accepted tick timestamp and is what
/// backwards-time detection compares against. `last_transition_time` is
/// the time the current phase was entered; the guard's buffer window is
/// measured from it.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineState {
    pub(crate) current_phase: Phase,
    pub(crate) last_tick_time: f64,
    pub(crate) last_transition_time: f64,
    pub(crate) detection: DebounceBuffer,
}

impl MachineState {
    /// Creates the state every engine starts from: the initial phase, both
    /// clocks at zero, and no pending detection.
    #[must_use]
    pub const fn new(initial_phase: Phase) -> Self {
        Self {
            current_phase: initial_phase,
            last_tick_time: 0.0,
            last_transition_time: 0.0,
            detection: DebounceBuffer::new(),
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn current_phase(&self) -> Phase {
        self.current_phase
    }

    /// Returns the latest accepted tick time.
    #[must_use]
    pub const fn last_tick_time(&self) -> f64 {
        self.last_tick_time
    }

    /// Returns the time the current phase was entered (or the last reset).
    #[must_use]
    pub const fn last_transition_time(&self) -> f64 {
        self.last_transition_time
    }

    /// Returns when the pending detection was first seen, if one is armed.
    #[must_use]
    pub fn first_detection_time(&self) -> Option<f64> {
        self.detection.first_detection_time()
    }

    /// Returns whether a detection is armed and waiting on its delay.
    #[must_use]
    pub const fn detection_armed(&self) -> bool {
        self.detection.is_armed()
    }

    /// Forces the state back to `initial_phase` at `time`.
    pub(crate) fn reset_to(&mut self, initial_phase: Phase, time: f64) {
        self.current_phase = initial_phase;
        self.last_tick_time = time;
        self.last_transition_time = time;
        self.detection.clear();
    }

    /// Enters `phase` at `time`, dropping any pending detection.
    pub(crate) fn enter(&mut self, phase: Phase, time: f64) {
        self.current_phase = phase;
        self.last_transition_time = time;
        self.detection.clear();
    }
}
