//! Error types for `jumpfsm`
//!
//! This module provides the error hierarchy used across configuration
//! loading, engine construction, and sample replay, together with the
//! process exit codes the CLI maps them to.
//!
//! Note that [`PhaseEngine::tick`](crate::phase::PhaseEngine::tick) never
//! returns an error: every failure mode here is raised either before the
//! engine exists or outside of it.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `jumpfsm` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Phase engine construction error (invalid table, unknown phase value)
    pub const PHASE_ERROR: i32 = 5;

    /// Malformed robot sample in the replay input
    pub const INPUT_ERROR: i32 = 6;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `jumpfsm` operations.
///
/// Aggregates all domain-specific errors and provides a unified
/// interface for exit code mapping.
#[derive(Debug, Error)]
pub enum JumpFsmError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Phase engine construction error
    #[error(transparent)]
    Phase(#[from] PhaseError),

    /// Replay input error
    #[error(transparent)]
    Input(#[from] InputError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl JumpFsmError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::Phase(_) => ExitCode::PHASE_ERROR,
            Self::Input(_) | Self::Json(_) => ExitCode::INPUT_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Configuration validation failed
    #[error("validation failed for {path}: {}", format_issues(.errors))]
    ValidationError {
        /// Path to the configuration file
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// Environment variable referenced in configuration is not set
    #[error("environment variable '{var}' not set (referenced at {location})")]
    EnvVarNotSet {
        /// Name of the environment variable
        var: String,
        /// Location in the configuration where it was referenced
        location: String,
    },
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found during configuration validation.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Path to the problematic field (e.g., "controller.transition_times[1]")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Error - validation failure that prevents configuration from being used
    Error,
    /// Warning - potential issue that does not prevent configuration loading
    Warning,
}

// ============================================================================
// Phase Engine Errors
// ============================================================================

/// Phase engine construction errors.
///
/// None of these can be produced once an engine has been built.
#[derive(Debug, Error)]
pub enum PhaseError {
    /// A phase scalar outside `0..=3`
    #[error("invalid phase value: {0} (expected 0..=3)")]
    InvalidPhaseValue(i64),

    /// Scheduled transition times are not strictly increasing
    #[error("transition times must be finite, non-negative and strictly increasing: {0:?}")]
    NonMonotonicTimes(Vec<f64>),

    /// A transition rule that does not move forward
    #[error("invalid phase transition: {from} -> {to}")]
    InvalidTransition {
        /// Source phase name
        from: String,
        /// Target phase name
        to: String,
    },

    /// Contact-driven guards were requested without a contact feed
    #[error("contact-based transitions require a contact source other than 'none'")]
    ContactSourceRequired,

    /// A delay, buffer, or threshold that is negative or not finite
    #[error("invalid duration for '{field}': {value}")]
    InvalidDuration {
        /// Name of the offending setting
        field: &'static str,
        /// The rejected value
        value: f64,
    },
}

// ============================================================================
// Replay Input Errors
// ============================================================================

/// Errors in the per-tick sample stream consumed by the replay driver.
#[derive(Debug, Error)]
pub enum InputError {
    /// The line is not a valid robot sample
    #[error("malformed sample on line {line}: {message}")]
    Malformed {
        /// 1-based line number
        line: usize,
        /// Parser message
        message: String,
    },

    /// The contact report does not match the configured contact source
    #[error("contact report on line {line} is '{found}', but the configured source expects '{expected}'")]
    ContactFormat {
        /// 1-based line number
        line: usize,
        /// Format the configured source accepts
        expected: &'static str,
        /// Format found in the sample
        found: &'static str,
    },

    /// Reading the input stream failed
    #[error("failed to read samples: {0}")]
    Read(String),
}
