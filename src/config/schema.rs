//! Configuration schema
//!
//! Serde types for the YAML controller configuration. Every section
//! rejects unknown keys so typos surface at load time instead of being
//! silently defaulted.

use serde::{Deserialize, Serialize};

use crate::error::PhaseError;
use crate::phase::contact::{ContactSource, DEFAULT_FORCE_THRESHOLD};
use crate::phase::engine::{DEFAULT_BUFFER_TIME, EngineConfig};
use crate::phase::state::Phase;

/// Default replay pacing rate in Hz.
pub const DEFAULT_PUBLISH_RATE: f64 = 1000.0;

/// Slowest accepted replay pacing rate in Hz (one tick every 1000 s).
pub const MIN_PUBLISH_RATE: f64 = 1.0e-3;

// ============================================================================
// Root
// ============================================================================

/// Root configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JumpConfig {
    /// Phase machine settings
    pub controller: ControllerSection,

    /// Contact feed settings
    #[serde(default)]
    pub contact: ContactSection,

    /// Replay driver settings
    #[serde(default)]
    pub driver: DriverSection,
}

impl JumpConfig {
    /// Converts the document into an engine configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`PhaseError`] if the initial phase is out of range or
    /// the transition time list does not hold exactly three entries.
    pub fn engine_config(&self) -> Result<EngineConfig, PhaseError> {
        let transition_times: [f64; 3] = self
            .controller
            .transition_times
            .as_slice()
            .try_into()
            .map_err(|_| PhaseError::NonMonotonicTimes(self.controller.transition_times.clone()))?;

        Ok(EngineConfig {
            contact_based: self.controller.contact_based,
            transition_times,
            transition_delay: self.controller.transition_delay,
            buffer_time: self.controller.buffer_time,
            initial_phase: self.controller.initial_phase.resolve()?,
            contact_source: self.contact.source(),
            cancel_on_condition_loss: self.controller.cancel_on_condition_loss,
        })
    }
}

// ============================================================================
// Controller
// ============================================================================

/// Phase machine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerSection {
    /// Drive the crouch and flight exits from contact sensing
    #[serde(default)]
    pub contact_based: bool,

    /// Balance, crouch and flight exit times in seconds
    pub transition_times: Vec<f64>,

    /// Seconds a detection stays armed before committing
    #[serde(default)]
    pub transition_delay: f64,

    /// Seconds after a phase change during which detections are ignored
    #[serde(default = "default_buffer_time")]
    pub buffer_time: f64,

    /// Phase at start and after a timeline reset
    #[serde(default)]
    pub initial_phase: PhaseValue,

    /// Drop an armed detection if its condition stops holding
    #[serde(default)]
    pub cancel_on_condition_loss: bool,
}

const fn default_buffer_time() -> f64 {
    DEFAULT_BUFFER_TIME
}

/// A phase given either by name (`flight`) or by scalar index (`2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PhaseValue {
    /// Scalar identifier, checked against `0..=3`
    Index(i64),
    /// Phase name
    Name(Phase),
}

impl Default for PhaseValue {
    fn default() -> Self {
        Self::Name(Phase::Balance)
    }
}

impl PhaseValue {
    /// Resolves to a [`Phase`].
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError::InvalidPhaseValue`] for an out-of-range index.
    pub fn resolve(self) -> Result<Phase, PhaseError> {
        match self {
            Self::Index(i) => Phase::try_from(i),
            Self::Name(phase) => Ok(phase),
        }
    }
}

// ============================================================================
// Contact
// ============================================================================

/// Which simulation backend feeds contact reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactSourceKind {
    /// Discrete contact pair counts
    #[serde(alias = "drake")]
    PointPairs,
    /// Continuous per-contact force magnitudes
    #[serde(alias = "mujoco")]
    ForceMagnitudes,
    /// No contact feed
    #[default]
    #[serde(alias = "gazebo")]
    None,
}

/// Contact feed settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactSection {
    /// Backend report format
    #[serde(default)]
    pub source: ContactSourceKind,

    /// Minimum absolute force counted as contact (force sources only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_threshold: Option<f64>,
}

impl ContactSection {
    /// Builds the runtime contact source.
    #[must_use]
    pub fn source(&self) -> ContactSource {
        match self.source {
            ContactSourceKind::PointPairs => ContactSource::PointPairs,
            ContactSourceKind::ForceMagnitudes => ContactSource::ForceMagnitudes {
                threshold: self.force_threshold.unwrap_or(DEFAULT_FORCE_THRESHOLD),
            },
            ContactSourceKind::None => ContactSource::None,
        }
    }
}

// ============================================================================
// Driver
// ============================================================================

/// Replay driver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriverSection {
    /// Tick rate in Hz when pacing in real time
    #[serde(default = "default_publish_rate")]
    pub publish_rate: f64,
}

impl Default for DriverSection {
    fn default() -> Self {
        Self {
            publish_rate: DEFAULT_PUBLISH_RATE,
        }
    }
}

const fn default_publish_rate() -> f64 {
    DEFAULT_PUBLISH_RATE
}
