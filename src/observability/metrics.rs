//! Prometheus metrics.
//!
//! Phase labels come from the closed [`Phase`] set, so no label
//! sanitization is needed. Every recording function is a no-op until a
//! recorder is installed.

use std::sync::atomic::{AtomicBool, Ordering};

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::JumpFsmError;
use crate::phase::{Phase, PhaseObserver, PhaseTransition, TimelineReset};

/// Guard to prevent double-initialization of the metrics recorder.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initializes the global metrics recorder.
///
/// With `Some(port)` a Prometheus HTTP listener is started on
/// `127.0.0.1:<port>`. With `None` the recorder is installed without an
/// endpoint.
///
/// # Errors
///
/// Returns `JumpFsmError::Io` if the recorder or listener cannot be
/// installed, e.g. when the port is taken.
pub fn init_metrics(port: Option<u16>) -> Result<(), JumpFsmError> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    port.map_or_else(
        || PrometheusBuilder::new().install_recorder().map(|_| ()),
        |p| {
            PrometheusBuilder::new()
                .with_http_listener(([127, 0, 0, 1], p))
                .install()
        },
    )
    .map_err(|e| JumpFsmError::Io(std::io::Error::other(e.to_string())))?;

    describe_metrics();
    Ok(())
}

fn describe_metrics() {
    describe_counter!("jumpfsm_ticks_total", "Control ticks processed");
    describe_counter!(
        "jumpfsm_phase_transitions_total",
        "Committed phase transitions by source and target phase"
    );
    describe_counter!(
        "jumpfsm_timeline_resets_total",
        "Backward time jumps recovered by resetting the machine"
    );
    describe_counter!(
        "jumpfsm_detections_armed_total",
        "Exit conditions armed and waiting on the transition delay"
    );
    describe_gauge!("jumpfsm_current_phase", "Committed phase scalar (0..=3)");
    describe_counter!(
        "jumpfsm_input_errors_total",
        "Replay samples rejected by category"
    );
}

/// Records one processed tick.
pub fn record_tick() {
    counter!("jumpfsm_ticks_total").increment(1);
}

/// Records a committed transition.
pub fn record_phase_transition(from: Phase, to: Phase) {
    counter!(
        "jumpfsm_phase_transitions_total",
        "from" => from.label(),
        "to" => to.label()
    )
    .increment(1);
}

/// Sets the committed phase gauge.
pub fn set_current_phase(phase: Phase) {
    gauge!("jumpfsm_current_phase").set(f64::from(phase.index()));
}

/// Records a timeline reset.
pub fn record_timeline_reset() {
    counter!("jumpfsm_timeline_resets_total").increment(1);
}

/// Records a newly armed detection.
pub fn record_detection_armed(phase: Phase) {
    counter!("jumpfsm_detections_armed_total", "phase" => phase.label()).increment(1);
}

/// Records a rejected replay sample.
///
/// `category` is one of a fixed set chosen by the driver, never input text.
pub fn record_input_error(category: &'static str) {
    counter!("jumpfsm_input_errors_total", "category" => category).increment(1);
}

/// Observer that mirrors engine events into metrics.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsObserver;

impl PhaseObserver for MetricsObserver {
    fn on_transition(&self, transition: &PhaseTransition) {
        record_phase_transition(transition.from, transition.to);
        set_current_phase(transition.to);
    }

    fn on_timeline_reset(&self, reset: &TimelineReset) {
        record_timeline_reset();
        set_current_phase(reset.phase_after);
    }

    fn on_detection_armed(&self, phase: Phase, _time: f64) {
        record_detection_armed(phase);
    }
}
