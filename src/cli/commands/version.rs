//! Version information display
//!
//! Prints the package name and version in human or JSON format.

use serde::Serialize;

use crate::cli::args::{OutputFormat, VersionArgs};
use crate::error::JumpFsmError;

#[derive(Serialize)]
struct VersionInfo {
    name: &'static str,
    version: &'static str,
}

const INFO: VersionInfo = VersionInfo {
    name: env!("CARGO_PKG_NAME"),
    version: env!("CARGO_PKG_VERSION"),
};

/// Print version information.
///
/// # Errors
///
/// Returns a JSON error if serialization fails.
pub fn run(args: &VersionArgs) -> Result<(), JumpFsmError> {
    println!("{}", render(args.format)?);
    Ok(())
}

fn render(format: OutputFormat) -> Result<String, JumpFsmError> {
    Ok(match format {
        OutputFormat::Human => format!("{} {}", INFO.name, INFO.version),
        OutputFormat::Json => serde_json::to_string(&INFO)?,
    })
}
