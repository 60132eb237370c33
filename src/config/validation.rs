//! Configuration validation
//!
//! Semantic checks on a deserialized [`JumpConfig`]. Validation collects
//! ALL issues instead of stopping at the first one, so a single run of
//! `jumpfsm validate` reports everything that needs fixing.

use crate::config::schema::{ContactSourceKind, JumpConfig, MIN_PUBLISH_RATE};
use crate::error::{Severity, ValidationIssue};
use crate::phase::state::Phase;

/// Names of the three scheduled exits, in order.
const EXIT_NAMES: [&str; 3] = ["balance", "crouch", "flight"];

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configuration validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a configuration and returns every issue found.
    pub fn validate(&mut self, config: &JumpConfig) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_transition_times(&config.controller.transition_times);
        self.validate_non_negative(
            "controller.transition_delay",
            config.controller.transition_delay,
        );
        self.validate_non_negative("controller.buffer_time", config.controller.buffer_time);
        self.validate_initial_phase(config);
        self.validate_contact(config);
        self.validate_driver(config);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Controller
    // ========================================================================

    fn validate_transition_times(&mut self, times: &[f64]) {
        if times.len() != EXIT_NAMES.len() {
            self.add_error(
                "controller.transition_times",
                &format!(
                    "Expected 3 transition times ({}), got {}",
                    EXIT_NAMES.join(", "),
                    times.len()
                ),
            );
            return;
        }

        for (i, t) in times.iter().enumerate() {
            if !t.is_finite() || *t < 0.0 {
                self.add_error(
                    &format!("controller.transition_times[{i}]"),
                    &format!("{} exit time must be finite and non-negative, got {t}", EXIT_NAMES[i]),
                );
            }
        }

        for (i, pair) in times.windows(2).enumerate() {
            if pair[0] >= pair[1] {
                self.add_error(
                    &format!("controller.transition_times[{}]", i + 1),
                    &format!(
                        "{} exit ({}) must come strictly after {} exit ({})",
                        EXIT_NAMES[i + 1],
                        pair[1],
                        EXIT_NAMES[i],
                        pair[0]
                    ),
                );
            }
        }
    }

    fn validate_non_negative(&mut self, path: &str, value: f64) {
        if !value.is_finite() || value < 0.0 {
            self.add_error(
                path,
                &format!("Must be a finite, non-negative number of seconds, got {value}"),
            );
        }
    }

    fn validate_initial_phase(&mut self, config: &JumpConfig) {
        match config.controller.initial_phase.resolve() {
            Ok(Phase::Land) => self.add_warning(
                "controller.initial_phase",
                "Initial phase 'land' is terminal; the controller will never transition",
            ),
            Ok(_) => {}
            Err(e) => self.add_error("controller.initial_phase", &e.to_string()),
        }
    }

    // ========================================================================
    // Contact
    // ========================================================================

    fn validate_contact(&mut self, config: &JumpConfig) {
        let contact = &config.contact;

        if config.controller.contact_based && contact.source == ContactSourceKind::None {
            self.add_error(
                "contact.source",
                "Contact-based transitions require a contact source \
                 (point_pairs/drake or force_magnitudes/mujoco)",
            );
        }

        if let Some(threshold) = contact.force_threshold {
            if contact.source == ContactSourceKind::ForceMagnitudes {
                if !threshold.is_finite() || threshold <= 0.0 {
                    self.add_error(
                        "contact.force_threshold",
                        &format!("Must be a finite, positive force, got {threshold}"),
                    );
                }
            } else {
                self.add_warning(
                    "contact.force_threshold",
                    "force_threshold only applies to the force_magnitudes source and is ignored",
                );
            }
        }
    }

    // ========================================================================
    // Driver
    // ========================================================================

    fn validate_driver(&mut self, config: &JumpConfig) {
        let rate = config.driver.publish_rate;
        if !rate.is_finite() || rate < MIN_PUBLISH_RATE {
            self.add_error(
                "driver.publish_rate",
                &format!("Must be a finite rate of at least {MIN_PUBLISH_RATE} Hz, got {rate}"),
            );
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}
