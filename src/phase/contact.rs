//! Contact signal adapter
//!
//! Simulation backends report foot contact in different shapes. This
//! module resolves whichever shape the configured backend produces into a
//! single active-contact count.

use serde::{Deserialize, Serialize};

/// Force magnitude at or above which a contact sample counts as active.
///
/// Persistent-contact simulators never report exactly zero force, even
/// when the foot is visibly off the ground.
pub const DEFAULT_FORCE_THRESHOLD: f64 = 1e-6;

/// Raw per-tick contact report, as delivered by a simulation backend.
///
/// Serialized externally tagged, e.g. `{"point_pairs": 2}` or
/// `{"forces": [0.0, 31.2]}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactReport {
    /// Discrete count of contact point pairs
    PointPairs(u32),
    /// Per-contact force magnitudes
    Forces(Vec<f64>),
    /// No contact information for this tick
    #[default]
    Absent,
}

impl ContactReport {
    /// Returns the wire name of this report's shape.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PointPairs(_) => "point_pairs",
            Self::Forces(_) => "forces",
            Self::Absent => "absent",
        }
    }
}

/// The contact feed a controller is wired to.
///
/// Selected once when the engine is built; resolution never re-branches
/// on backend type per tick beyond this match.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ContactSource {
    /// Backend reports a discrete number of contact pairs
    PointPairs,
    /// Backend reports continuous per-contact force magnitudes
    ForceMagnitudes {
        /// Minimum absolute force that counts as contact
        threshold: f64,
    },
    /// No contact feed; every tick resolves to zero contacts
    #[default]
    None,
}

/// A contact report whose shape the configured source cannot read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatMismatch {
    /// Shape the source accepts
    pub expected: &'static str,
    /// Shape that was supplied
    pub found: &'static str,
}

impl ContactSource {
    /// Resolves a raw report into an active-contact count.
    ///
    /// # Errors
    ///
    /// Returns [`FormatMismatch`] when the report's shape does not match
    /// this source (including an absent report on a live contact feed).
    pub fn active_contacts(&self, report: &ContactReport) -> Result<usize, FormatMismatch> {
        match (self, report) {
            (Self::None, _) => Ok(0),
            (Self::PointPairs, ContactReport::PointPairs(pairs)) => Ok(*pairs as usize),
            (Self::ForceMagnitudes { threshold }, ContactReport::Forces(forces)) => {
                Ok(count_above_threshold(forces, *threshold))
            }
            (source, other) => Err(FormatMismatch {
                expected: source.report_kind(),
                found: other.kind(),
            }),
        }
    }

    /// Returns the report shape this source reads.
    #[must_use]
    pub const fn report_kind(&self) -> &'static str {
        match self {
            Self::PointPairs => "point_pairs",
            Self::ForceMagnitudes { .. } => "forces",
            Self::None => "absent",
        }
    }

    /// Returns whether this source can drive contact-based guards.
    #[must_use]
    pub const fn provides_contacts(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Counts force samples whose magnitude is at or above `threshold`.
///
/// `NaN` samples never count.
#[must_use]
pub fn count_above_threshold(forces: &[f64], threshold: f64) -> usize {
    forces.iter().filter(|f| f.abs() >= threshold).count()
}
