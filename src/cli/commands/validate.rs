//! `validate` command handler
//!
//! Loads every file through the full configuration pipeline and reports
//! all issues, in human or JSON form. A file fails if it has errors, or
//! warnings under `--strict`.

use std::path::Path;

use serde::Serialize;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::loader::ConfigLoader;
use crate::error::{ConfigError, JumpFsmError, Severity, ValidationIssue};

/// Outcome for a single configuration file.
#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// Validate configuration files.
///
/// # Errors
///
/// Returns the first failing file's error after every file has been
/// reported.
pub fn run(args: &ValidateArgs) -> Result<(), JumpFsmError> {
    let mut first_failure = None;
    let mut reports = Vec::with_capacity(args.files.len());

    for path in &args.files {
        tracing::info!(file = %path.display(), "validating configuration");
        let (report, failure) = check_file(path, args.strict);
        if first_failure.is_none() {
            first_failure = failure;
        }
        reports.push(report);
    }

    match args.format {
        OutputFormat::Human => {
            for report in &reports {
                print!("{}", render_human(report));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
    }

    first_failure.map_or(Ok(()), |e| Err(e.into()))
}

fn check_file(path: &Path, strict: bool) -> (FileReport, Option<ConfigError>) {
    let file = path.display().to_string();

    match ConfigLoader::with_defaults().load(path) {
        Ok(result) => {
            let warnings: Vec<String> = result
                .warnings
                .iter()
                .map(|w| match &w.location {
                    Some(location) => format!("{} at {location}", w.message),
                    None => w.message.clone(),
                })
                .collect();

            let failure = (strict && !warnings.is_empty()).then(|| ConfigError::ValidationError {
                path: file.clone(),
                errors: result
                    .warnings
                    .iter()
                    .map(|w| ValidationIssue {
                        path: w.location.clone().unwrap_or_default(),
                        message: w.message.clone(),
                        severity: Severity::Warning,
                    })
                    .collect(),
            });

            let report = FileReport {
                file,
                valid: failure.is_none(),
                errors: Vec::new(),
                warnings,
            };
            (report, failure)
        }
        Err(err) => {
            let errors = match &err {
                ConfigError::ValidationError { errors, .. } => {
                    errors.iter().map(ToString::to_string).collect()
                }
                other => vec![other.to_string()],
            };
            let report = FileReport {
                file,
                valid: false,
                errors,
                warnings: Vec::new(),
            };
            (report, Some(err))
        }
    }
}

fn render_human(report: &FileReport) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let status = if report.valid { "ok" } else { "invalid" };
    let _ = writeln!(out, "{}: {status}", report.file);
    for error in &report.errors {
        let _ = writeln!(out, "  {error}");
    }
    for warning in &report.warnings {
        let _ = writeln!(out, "  warning: {warning}");
    }
    out
}
