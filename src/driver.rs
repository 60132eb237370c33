//! Replay driver
//!
//! Feeds recorded robot samples through a [`PhaseEngine`] one control tick
//! at a time and writes the committed phase after each tick. Input is
//! newline-delimited JSON, one sample per line:
//!
//! ```text
//! {"t": 1.02, "contacts": {"point_pairs": 4}}
//! {"t": 1.03, "contacts": {"forces": [0.0, 31.2]}}
//! {"t": 1.04}
//! ```
//!
//! Output is one `{"t": <time>, "phase": <0..3>}` line per sample.

use std::time::Duration;

use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::schema::DEFAULT_PUBLISH_RATE;
use crate::error::{InputError, JumpFsmError};
use crate::observability::metrics;
use crate::observability::RunSummary;
use crate::phase::{ContactReport, PhaseEngine, PhaseReader, TickInput, TickOutcome};

/// Longest accepted sample line, in bytes.
pub const DEFAULT_MAX_SAMPLE_LENGTH: usize = 64 * 1024;

/// Longest pause between paced ticks, the period of
/// [`MIN_PUBLISH_RATE`](crate::config::schema::MIN_PUBLISH_RATE).
const MAX_PACER_PERIOD: Duration = Duration::from_secs(1000);

/// One recorded robot state sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RobotSample {
    /// Robot state timestamp in seconds
    pub t: f64,
    /// Contact report for this tick; omitted means absent
    #[serde(default)]
    pub contacts: ContactReport,
}

/// One line of the phase output stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseSample {
    /// Timestamp of the tick that produced this phase
    pub t: f64,
    /// Committed phase scalar
    pub phase: u8,
}

/// Replay settings.
#[derive(Debug, Clone, Copy)]
pub struct ReplayOptions {
    /// Pace ticks at `publish_rate` instead of replaying as fast as possible
    pub realtime: bool,
    /// Tick rate in Hz when pacing
    pub publish_rate: f64,
    /// Longest accepted input line in bytes
    pub max_sample_length: usize,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            realtime: false,
            publish_rate: DEFAULT_PUBLISH_RATE,
            max_sample_length: DEFAULT_MAX_SAMPLE_LENGTH,
        }
    }
}

impl ReplayOptions {
    fn pacer(&self) -> Option<Interval> {
        if !self.realtime {
            return None;
        }
        // Rates too small or not finite fall back to the slowest period
        let period = Duration::try_from_secs_f64(1.0 / self.publish_rate)
            .unwrap_or(MAX_PACER_PERIOD)
            .clamp(Duration::from_micros(1), MAX_PACER_PERIOD);
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Some(interval)
    }
}

/// Drives a [`PhaseEngine`] from a recorded sample stream.
#[derive(Debug)]
pub struct ReplayDriver {
    engine: PhaseEngine,
    reader: PhaseReader,
    options: ReplayOptions,
}

impl ReplayDriver {
    /// Creates a driver around a fully configured engine.
    #[must_use]
    pub fn new(engine: PhaseEngine, options: ReplayOptions) -> Self {
        let reader = engine.subscribe();
        Self {
            engine,
            reader,
            options,
        }
    }

    /// Returns the engine.
    #[must_use]
    pub const fn engine(&self) -> &PhaseEngine {
        &self.engine
    }

    /// Replays every sample from `input`, writing phases to `output`.
    ///
    /// Stops at end of input or when `cancel` fires; either way the
    /// summary covers every tick processed so far.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] for a malformed sample or a contact report
    /// the configured source cannot read, and an I/O error if writing the
    /// output fails.
    pub async fn run<R, W>(
        &mut self,
        input: R,
        output: W,
        cancel: &CancellationToken,
    ) -> Result<RunSummary, JumpFsmError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = FramedRead::new(
            input,
            LinesCodec::new_with_max_length(self.options.max_sample_length),
        );
        let mut writer = BufWriter::new(output);
        let mut summary = RunSummary {
            ticks: 0,
            transitions: 0,
            timeline_resets: 0,
            final_phase: self.engine.current_phase(),
        };

        metrics::set_current_phase(self.engine.current_phase());

        // Phases already produced are flushed even when a sample fails.
        let result = self
            .pump(&mut lines, &mut writer, cancel, &mut summary)
            .await;
        writer.flush().await?;
        summary.final_phase = self.engine.current_phase();
        result?;

        debug!(
            ticks = summary.ticks,
            transitions = summary.transitions,
            timeline_resets = summary.timeline_resets,
            final_phase = %summary.final_phase,
            "replay finished"
        );

        Ok(summary)
    }

    async fn pump<R, W>(
        &mut self,
        lines: &mut FramedRead<R, LinesCodec>,
        writer: &mut BufWriter<W>,
        cancel: &CancellationToken,
        summary: &mut RunSummary,
    ) -> Result<(), JumpFsmError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut pacer = self.options.pacer();
        let mut line_number = 0usize;

        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    info!(ticks = summary.ticks, "replay cancelled");
                    return Ok(());
                }
                next = lines.next() => next,
            };
            let Some(line) = next else {
                return Ok(());
            };
            line_number += 1;

            let line = line.map_err(|e| codec_error(e, line_number))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let sample = parse_sample(line, line_number)?;
            let contacts = self
                .engine
                .resolve_contacts(&sample.contacts)
                .map_err(|mismatch| {
                    metrics::record_input_error("contact_format");
                    InputError::ContactFormat {
                        line: line_number,
                        expected: mismatch.expected,
                        found: mismatch.found,
                    }
                })?;

            if let Some(interval) = pacer.as_mut() {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {
                        info!(ticks = summary.ticks, "replay cancelled");
                        return Ok(());
                    }
                    _ = interval.tick() => {}
                }
            }

            match self.engine.tick(TickInput::new(sample.t, contacts)) {
                TickOutcome::Transitioned(_) => summary.transitions += 1,
                TickOutcome::TimelineReset(_) => summary.timeline_resets += 1,
                _ => {}
            }
            summary.ticks += 1;
            metrics::record_tick();

            let out = PhaseSample {
                t: sample.t,
                phase: self.reader.scalar(),
            };
            let mut encoded = serde_json::to_vec(&out)?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
            if pacer.is_some() {
                writer.flush().await?;
            }
        }
    }
}

fn parse_sample(line: &str, line_number: usize) -> Result<RobotSample, InputError> {
    serde_json::from_str(line).map_err(|e| {
        metrics::record_input_error("malformed");
        InputError::Malformed {
            line: line_number,
            message: e.to_string(),
        }
    })
}

fn codec_error(err: LinesCodecError, line_number: usize) -> InputError {
    match err {
        LinesCodecError::MaxLineLengthExceeded => {
            metrics::record_input_error("oversized");
            InputError::Malformed {
                line: line_number,
                message: "sample exceeds the maximum line length".to_string(),
            }
        }
        LinesCodecError::Io(e) => InputError::Read(e.to_string()),
    }
}
