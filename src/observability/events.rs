//! Structured event stream.
//!
//! Discrete, typed events emitted while a replay runs. Events are written
//! as newline-delimited JSON (JSONL), each carrying a monotonically
//! increasing sequence number.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::phase::{Phase, PhaseObserver, PhaseTransition, TimelineReset};

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete event emitted during a run.
///
/// Serialized with a `"type"` tag so consumers can dispatch on the kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A replay run started.
    RunStarted {
        /// Wall-clock start time.
        timestamp: DateTime<Utc>,
        /// Random identifier shared by every event of this run.
        run_id: String,
        /// Configuration file the controller was built from.
        config: String,
    },

    /// The controller committed a phase transition.
    PhaseEntered {
        /// Wall-clock time of the commit.
        timestamp: DateTime<Utc>,
        /// Simulation time of the committing tick.
        sim_time: f64,
        /// Phase that was left.
        from: Phase,
        /// Phase that was entered.
        to: Phase,
        /// Guard that fired, e.g. `"contacts ended"`.
        reason: String,
    },

    /// Simulation time moved backwards and the controller was reset.
    TimelineReset {
        /// Wall-clock time of the reset.
        timestamp: DateTime<Utc>,
        /// Simulation time of the tick that triggered the reset.
        sim_time: f64,
        /// Last simulation time seen before the jump.
        previous_time: f64,
        /// Phase active when the reset happened.
        phase_before: Phase,
    },

    /// A replay run finished.
    RunFinished {
        /// Wall-clock end time.
        timestamp: DateTime<Utc>,
        /// Totals for the run.
        summary: RunSummary,
    },
}

/// Totals for a completed replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Samples ticked through the engine (ignored ticks included)
    pub ticks: u64,
    /// Committed transitions
    pub transitions: u64,
    /// Backward time jumps recovered
    pub timeline_resets: u64,
    /// Phase after the last tick
    pub final_phase: Phase,
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct EventEnvelope {
    sequence: u64,
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Serialization or I/O failures are dropped: a broken event sink must
/// never stop the controller.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

// Box<dyn Write> is not Debug, provide a manual impl.
impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter over an arbitrary writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that writes to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Creates an emitter that writes to stderr.
    ///
    /// The default for `jumpfsm run`, since stdout carries the phase stream.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates an emitter that discards everything.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter that writes to a new file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line and flushes.
    pub fn emit(&self, event: Event) {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope { sequence, event };

        if let Ok(mut w) = self.writer.lock() {
            if let Ok(line) = serde_json::to_string(&envelope) {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    /// Returns the number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

impl PhaseObserver for EventEmitter {
    fn on_transition(&self, transition: &PhaseTransition) {
        self.emit(Event::PhaseEntered {
            timestamp: Utc::now(),
            sim_time: transition.time,
            from: transition.from,
            to: transition.to,
            reason: transition.trigger.to_string(),
        });
    }

    fn on_timeline_reset(&self, reset: &TimelineReset) {
        self.emit(Event::TimelineReset {
            timestamp: Utc::now(),
            sim_time: reset.time,
            previous_time: reset.previous_time,
            phase_before: reset.phase_before,
        });
    }
}
