//! `run` command handler
//!
//! Loads the controller configuration, builds the engine with its
//! observers, and replays samples until end of input or cancellation.

use std::sync::Arc;

use chrono::Utc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;

use crate::cli::args::RunArgs;
use crate::config::loader::ConfigLoader;
use crate::driver::{ReplayDriver, ReplayOptions};
use crate::error::JumpFsmError;
use crate::observability::events::{Event, EventEmitter};
use crate::observability::metrics::MetricsObserver;
use crate::phase::PhaseEngine;

/// Replay robot samples through the phase controller.
///
/// # Errors
///
/// Returns a config error if the configuration cannot be loaded, a phase
/// error if the engine rejects it, an input error for a bad sample, or an
/// I/O error if a file cannot be opened.
pub async fn run(
    args: &RunArgs,
    quiet: bool,
    cancel: CancellationToken,
) -> Result<(), JumpFsmError> {
    if let Some(port) = args.metrics_port {
        crate::observability::init_metrics(Some(port))?;
        tracing::info!(port, "Prometheus metrics endpoint started");
    }

    tracing::info!(config = %args.config.display(), "loading configuration");
    let load_result = ConfigLoader::with_defaults().load(&args.config)?;
    for warning in &load_result.warnings {
        tracing::warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }
    let config = load_result.config;

    let mut engine = PhaseEngine::new(config.engine_config()?)?;

    let emitter = Arc::new(match (&args.events_file, quiet) {
        (Some(path), _) => EventEmitter::from_file(path)?,
        (None, false) => EventEmitter::stderr(),
        (None, true) => EventEmitter::noop(),
    });
    engine.add_observer(Box::new(Arc::clone(&emitter)));
    engine.add_observer(Box::new(MetricsObserver));

    let run_id = uuid::Uuid::new_v4().to_string();
    emitter.emit(Event::RunStarted {
        timestamp: Utc::now(),
        run_id: run_id.clone(),
        config: args.config.display().to_string(),
    });

    let input: Box<dyn AsyncRead + Unpin + Send> = match &args.input {
        Some(path) => Box::new(tokio::fs::File::open(path).await?),
        None => Box::new(tokio::io::stdin()),
    };
    let output: Box<dyn AsyncWrite + Unpin + Send> = match &args.output {
        Some(path) => Box::new(tokio::fs::File::create(path).await?),
        None => Box::new(tokio::io::stdout()),
    };

    let options = ReplayOptions {
        realtime: args.realtime,
        publish_rate: config.driver.publish_rate,
        ..ReplayOptions::default()
    };
    let mut driver = ReplayDriver::new(engine, options);
    let summary = driver.run(input, output, &cancel).await?;

    emitter.emit(Event::RunFinished {
        timestamp: Utc::now(),
        summary,
    });

    tracing::info!(
        %run_id,
        ticks = summary.ticks,
        transitions = summary.transitions,
        timeline_resets = summary.timeline_resets,
        final_phase = %summary.final_phase,
        "replay complete"
    );

    Ok(())
}
