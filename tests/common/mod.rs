//! Shared integration-test helpers: fixture paths, running the `jumpfsm`
//! binary, and driving an engine through a tick sequence.

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use jumpfsm::phase::{ContactSource, EngineConfig, Phase, PhaseEngine, TickInput};

/// Returns the path of a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Runs the `jumpfsm` binary to completion with the given arguments.
#[allow(clippy::missing_panics_doc)]
pub fn run_jumpfsm(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_jumpfsm"))
        .args(args)
        .env_remove("JUMPFSM_LOG_LEVEL")
        .env_remove("JUMPFSM_CONFIG")
        .stdin(Stdio::null())
        .output()
        .expect("failed to run jumpfsm")
}

/// Runs the `jumpfsm` binary, feeding `stdin` to it.
#[allow(clippy::missing_panics_doc)]
pub fn run_jumpfsm_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_jumpfsm"))
        .args(args)
        .env_remove("JUMPFSM_LOG_LEVEL")
        .env_remove("JUMPFSM_CONFIG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn jumpfsm");

    child
        .stdin
        .take()
        .expect("stdin not captured")
        .write_all(stdin.as_bytes())
        .expect("failed to write stdin");

    child.wait_with_output().expect("failed to wait for jumpfsm")
}

/// Parses every non-empty stdout line as JSON.
pub fn json_lines(bytes: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(bytes)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("stdout line is not JSON"))
        .collect()
}

/// Time-based configuration with the given schedule, delay, and buffer.
pub fn time_config(times: [f64; 3], delay: f64, buffer: f64) -> EngineConfig {
    EngineConfig {
        contact_based: false,
        transition_times: times,
        transition_delay: delay,
        buffer_time: buffer,
        ..EngineConfig::default()
    }
}

/// Contact-based configuration on a point-pair feed.
pub fn contact_config(delay: f64, buffer: f64) -> EngineConfig {
    EngineConfig {
        contact_based: true,
        transition_times: [1.0, 2.0, 3.0],
        transition_delay: delay,
        buffer_time: buffer,
        contact_source: ContactSource::PointPairs,
        ..EngineConfig::default()
    }
}

/// Ticks `engine` through `(time, contacts)` pairs and returns the phase
/// observed after each tick.
pub fn tick_all(engine: &mut PhaseEngine, ticks: &[(f64, usize)]) -> Vec<Phase> {
    ticks
        .iter()
        .map(|&(t, contacts)| {
            engine.tick(TickInput::new(t, contacts));
            engine.current_phase()
        })
        .collect()
}

/// Writes `yaml` to a temporary config file.
#[allow(clippy::missing_panics_doc)]
pub fn temp_config(yaml: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("failed to create temp file");
    file.write_all(yaml.as_bytes()).expect("failed to write config");
    file
}
