//! Phase engine
//!
//! [`PhaseEngine`] owns the machine state and advances it once per control
//! tick: timeline-reset recovery first, then guard evaluation through the
//! transition table, then debounce commit, then publication of the
//! committed phase.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::PhaseError;

use super::contact::{ContactReport, ContactSource, FormatMismatch};
use super::guard::detect_guard_condition;
use super::output::{PhasePublisher, PhaseReader};
use super::state::{MachineState, Phase, PhaseTransition, TickInput, TimelineReset};
use super::table::{DelayPolicy, TransitionTable};

/// Default minimum time after a phase change before a new detection is
/// honored, in seconds.
pub const DEFAULT_BUFFER_TIME: f64 = 0.05;

/// Immutable controller configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Drive the crouch and flight exits from contact sensing instead of
    /// the schedule
    pub contact_based: bool,
    /// Scheduled exit times for balance, crouch and flight, in seconds
    pub transition_times: [f64; 3],
    /// Time a detection must stay armed before it commits, in seconds
    pub transition_delay: f64,
    /// Minimum time since the last phase change before a detection is
    /// honored, in seconds
    pub buffer_time: f64,
    /// Phase at construction and after every timeline reset
    pub initial_phase: Phase,
    /// Contact feed resolving raw reports into counts
    pub contact_source: ContactSource,
    /// Drop an armed detection when its raw condition stops holding
    /// before the delay elapses. Off by default: detections are sticky.
    pub cancel_on_condition_loss: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            contact_based: false,
            transition_times: [1.0, 2.0, 3.0],
            transition_delay: 0.0,
            buffer_time: DEFAULT_BUFFER_TIME,
            initial_phase: Phase::Balance,
            contact_source: ContactSource::None,
            cancel_on_condition_loss: false,
        }
    }
}

impl EngineConfig {
    /// Checks the configuration for values the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns a [`PhaseError`] for non-monotonic or non-finite transition
    /// times, a negative or non-finite delay, buffer, or force threshold,
    /// or contact-based mode without a contact source.
    pub fn validate(&self) -> Result<(), PhaseError> {
        let times = self.transition_times;
        let finite = times.iter().all(|t| t.is_finite() && *t >= 0.0);
        let increasing = times.windows(2).all(|w| w[0] < w[1]);
        if !finite || !increasing {
            return Err(PhaseError::NonMonotonicTimes(times.to_vec()));
        }

        check_duration("transition_delay", self.transition_delay)?;
        check_duration("buffer_time", self.buffer_time)?;

        if let ContactSource::ForceMagnitudes { threshold } = self.contact_source {
            if !threshold.is_finite() || threshold <= 0.0 {
                return Err(PhaseError::InvalidDuration {
                    field: "force_threshold",
                    value: threshold,
                });
            }
        }

        if self.contact_based && !self.contact_source.provides_contacts() {
            return Err(PhaseError::ContactSourceRequired);
        }

        Ok(())
    }
}

fn check_duration(field: &'static str, value: f64) -> Result<(), PhaseError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PhaseError::InvalidDuration { field, value })
    }
}

/// Receives phase-machine events as they happen.
///
/// Observers are called synchronously from inside
/// [`PhaseEngine::tick`] and must not block.
pub trait PhaseObserver: Send {
    /// A transition committed.
    fn on_transition(&self, transition: &PhaseTransition);

    /// Time went backwards and the machine was reset.
    fn on_timeline_reset(&self, _reset: &TimelineReset) {}

    /// A new detection was armed in `phase` at `time`.
    fn on_detection_armed(&self, _phase: Phase, _time: f64) {}
}

impl<T: PhaseObserver + Sync> PhaseObserver for Arc<T> {
    fn on_transition(&self, transition: &PhaseTransition) {
        (**self).on_transition(transition);
    }

    fn on_timeline_reset(&self, reset: &TimelineReset) {
        (**self).on_timeline_reset(reset);
    }

    fn on_detection_armed(&self, phase: Phase, time: f64) {
        (**self).on_detection_armed(phase, time);
    }
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Nothing changed
    Steady,
    /// A new detection was armed and is waiting on the transition delay
    Armed {
        /// Phase the detection belongs to
        phase: Phase,
        /// Tick time of the detection
        first_detection_time: f64,
    },
    /// A pending detection was dropped because its condition went away
    Cancelled {
        /// Phase the detection belonged to
        phase: Phase,
        /// Tick time of the dropped detection
        first_detection_time: f64,
    },
    /// A transition committed
    Transitioned(PhaseTransition),
    /// The timeline moved backwards and the machine was reset
    TimelineReset(TimelineReset),
    /// The tick carried a non-finite timestamp and was skipped
    Ignored,
}

/// The jumping phase state machine.
///
/// Single writer: all mutation happens inside [`tick`](Self::tick), which
/// runs to completion synchronously. Readers obtained from
/// [`subscribe`](Self::subscribe) observe the committed phase.
pub struct PhaseEngine {
    config: EngineConfig,
    table: TransitionTable,
    state: MachineState,
    publisher: PhasePublisher,
    observers: Vec<Box<dyn PhaseObserver>>,
}

impl PhaseEngine {
    /// Creates an engine running the standard jumping table.
    ///
    /// # Errors
    ///
    /// Returns a [`PhaseError`] if the configuration is invalid.
    pub fn new(config: EngineConfig) -> Result<Self, PhaseError> {
        config.validate()?;
        let table = TransitionTable::jumping(&config);
        Self::with_table(config, table)
    }

    /// Creates an engine running a custom transition table.
    ///
    /// # Errors
    ///
    /// Returns a [`PhaseError`] if the configuration is invalid, or if the
    /// table reads contacts and the configuration has no contact source.
    pub fn with_table(config: EngineConfig, table: TransitionTable) -> Result<Self, PhaseError> {
        config.validate()?;
        if table.uses_contacts() && !config.contact_source.provides_contacts() {
            return Err(PhaseError::ContactSourceRequired);
        }

        if table.is_terminal(config.initial_phase) {
            warn!(
                phase = %config.initial_phase,
                "initial phase has no outgoing transition; engine will stay put"
            );
        }

        Ok(Self {
            state: MachineState::new(config.initial_phase),
            publisher: PhasePublisher::new(config.initial_phase),
            config,
            table,
            observers: Vec::new(),
        })
    }

    /// Registers an observer for transitions, resets, and detections.
    pub fn add_observer(&mut self, observer: Box<dyn PhaseObserver>) {
        self.observers.push(observer);
    }

    /// Returns a reader for the committed phase.
    #[must_use]
    pub fn subscribe(&self) -> PhaseReader {
        self.publisher.subscribe()
    }

    /// Resolves a raw contact report with the configured contact source.
    ///
    /// # Errors
    ///
    /// Returns [`FormatMismatch`] if the report shape does not match the
    /// configured source.
    pub fn resolve_contacts(&self, report: &ContactReport) -> Result<usize, FormatMismatch> {
        self.config.contact_source.active_contacts(report)
    }

    /// Advances the machine by one control tick.
    ///
    /// Never fails. A timestamp earlier than the previous tick is treated
    /// as a timeline reset: the machine returns to the initial phase and
    /// nothing else is evaluated on that tick.
    pub fn tick(&mut self, input: TickInput) -> TickOutcome {
        if !input.time.is_finite() {
            warn!(time = input.time, "ignoring tick with non-finite timestamp");
            return TickOutcome::Ignored;
        }

        if input.time < self.state.last_tick_time {
            return self.recover_timeline(input.time);
        }

        self.state.last_tick_time = input.time;
        let outcome = self.evaluate(&input);
        self.publisher.publish(self.state.current_phase);
        outcome
    }

    fn recover_timeline(&mut self, time: f64) -> TickOutcome {
        let reset = TimelineReset {
            time,
            previous_time: self.state.last_tick_time,
            phase_before: self.state.current_phase,
            phase_after: self.config.initial_phase,
        };

        warn!(
            time,
            previous_time = reset.previous_time,
            phase_before = %reset.phase_before,
            phase_after = %reset.phase_after,
            "timeline moved backwards; resetting phase machine"
        );

        self.state.reset_to(self.config.initial_phase, time);
        self.publisher.publish(self.state.current_phase);

        for observer in &self.observers {
            observer.on_timeline_reset(&reset);
        }

        TickOutcome::TimelineReset(reset)
    }

    fn evaluate(&mut self, input: &TickInput) -> TickOutcome {
        let current = self.state.current_phase;
        let mut outcome = TickOutcome::Steady;

        if self.config.cancel_on_condition_loss {
            if let Some(pending) = self.state.detection.pending() {
                let holds = self
                    .table
                    .rule(pending.rule)
                    .is_some_and(|rule| rule.guard.raw_condition(input));
                if !holds {
                    self.state.detection.clear();
                    debug!(
                        phase = %current,
                        first_detection_time = pending.first_time,
                        time = input.time,
                        "exit condition lost; dropping pending detection"
                    );
                    outcome = TickOutcome::Cancelled {
                        phase: current,
                        first_detection_time: pending.first_time,
                    };
                }
            }
        }

        let mut immediate = None;
        for (index, rule) in self.table.rules_from(current) {
            let raw = rule.guard.raw_condition(input);
            match rule.policy {
                DelayPolicy::Immediate => {
                    if raw {
                        immediate = Some(index);
                        break;
                    }
                }
                DelayPolicy::Debounced => {
                    if detect_guard_condition(raw, input.time, &self.state, self.config.buffer_time)
                    {
                        self.state.detection.arm(input.time, index);
                        debug!(
                            phase = %current,
                            time = input.time,
                            guard = %rule.guard,
                            "exit condition detected; waiting on transition delay"
                        );
                        for observer in &self.observers {
                            observer.on_detection_armed(current, input.time);
                        }
                        outcome = TickOutcome::Armed {
                            phase: current,
                            first_detection_time: input.time,
                        };
                        break;
                    }
                }
            }
        }

        if let Some(index) = immediate {
            return self.commit(index, input.time, input.time);
        }

        if let Some(detection) = self
            .state
            .detection
            .ready(input.time, self.config.transition_delay)
        {
            return self.commit(detection.rule, detection.first_time, input.time);
        }

        outcome
    }

    fn commit(&mut self, rule_index: usize, first_detection_time: f64, time: f64) -> TickOutcome {
        let Some(rule) = self.table.rule(rule_index).copied() else {
            return TickOutcome::Steady;
        };

        let transition = PhaseTransition {
            from: self.state.current_phase,
            to: rule.to,
            time,
            first_detection_time,
            trigger: rule.guard,
        };

        self.state.enter(rule.to, time);

        info!(
            from = %transition.from,
            to = %transition.to,
            time,
            first_detection_time,
            reason = %transition.trigger,
            "phase transition"
        );

        for observer in &self.observers {
            observer.on_transition(&transition);
        }

        TickOutcome::Transitioned(transition)
    }

    /// Returns the committed phase.
    #[must_use]
    pub const fn current_phase(&self) -> Phase {
        self.state.current_phase
    }

    /// Returns the time the current phase was entered.
    #[must_use]
    pub const fn phase_entered_at(&self) -> f64 {
        self.state.last_transition_time
    }

    /// Returns whether the current phase has no outgoing transition.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.table.is_terminal(self.state.current_phase)
    }

    /// Returns the machine state.
    #[must_use]
    pub const fn state(&self) -> &MachineState {
        &self.state
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the transition table.
    #[must_use]
    pub const fn table(&self) -> &TransitionTable {
        &self.table
    }
}

// Box<dyn PhaseObserver> is not Debug, provide a manual impl.
impl std::fmt::Debug for PhaseEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::phase::contact::DEFAULT_FORCE_THRESHOLD;
    use crate::phase::guard::GuardSource;
    use crate::phase::table::TransitionRule;

    #[derive(Default)]
    struct Recorder {
        transitions: Mutex<Vec<PhaseTransition>>,
        resets: Mutex<Vec<TimelineReset>>,
        armed: Mutex<Vec<(Phase, f64)>>,
    }

    impl PhaseObserver for Recorder {
        fn on_transition(&self, transition: &PhaseTransition) {
            self.transitions.lock().unwrap().push(transition.clone());
        }

        fn on_timeline_reset(&self, reset: &TimelineReset) {
            self.resets.lock().unwrap().push(reset.clone());
        }

        fn on_detection_armed(&self, phase: Phase, time: f64) {
            self.armed.lock().unwrap().push((phase, time));
        }
    }

    fn contact_config(delay: f64, buffer: f64) -> EngineConfig {
        EngineConfig {
            contact_based: true,
            transition_times: [1.0, 2.0, 3.0],
            transition_delay: delay,
            buffer_time: buffer,
            contact_source: ContactSource::PointPairs,
            ..EngineConfig::default()
        }
    }

    /// Ticks through balance into crouch with contacts held.
    fn into_crouch(engine: &mut PhaseEngine) {
        engine.tick(TickInput::new(0.5, 4));
        engine.tick(TickInput::new(1.1, 4));
        assert_eq!(engine.current_phase(), Phase::Crouch);
    }

    #[test]
    fn test_balance_exits_immediately() {
        let mut engine = PhaseEngine::new(contact_config(0.5, 0.5)).unwrap();
        assert_eq!(engine.tick(TickInput::new(1.0, 4)), TickOutcome::Steady);

        // Neither delay nor buffer applies to the balance exit
        let outcome = engine.tick(TickInput::new(1.01, 4));
        let TickOutcome::Transitioned(t) = outcome else {
            panic!("expected transition, got {outcome:?}");
        };
        assert_eq!((t.from, t.to), (Phase::Balance, Phase::Crouch));
        assert!((engine.phase_entered_at() - 1.01).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_delay_commits_on_detection_tick() {
        let mut engine = PhaseEngine::new(contact_config(0.0, 0.05)).unwrap();
        into_crouch(&mut engine);

        let outcome = engine.tick(TickInput::new(2.0, 0));
        assert!(matches!(outcome, TickOutcome::Transitioned(_)));
        assert_eq!(engine.current_phase(), Phase::Flight);
        assert!(!engine.state().detection_armed());
    }

    #[test]
    fn test_detection_waits_for_delay() {
        let mut engine = PhaseEngine::new(contact_config(0.1, 0.05)).unwrap();
        into_crouch(&mut engine);

        assert!(matches!(
            engine.tick(TickInput::new(2.0, 0)),
            TickOutcome::Armed { phase: Phase::Crouch, .. }
        ));
        assert_eq!(engine.state().first_detection_time(), Some(2.0));
        assert_eq!(engine.tick(TickInput::new(2.05, 0)), TickOutcome::Steady);
        assert_eq!(engine.current_phase(), Phase::Crouch);

        let TickOutcome::Transitioned(t) = engine.tick(TickInput::new(2.1, 0)) else {
            panic!("expected commit once the delay elapsed");
        };
        assert!((t.first_detection_time - 2.0).abs() < f64::EPSILON);
        assert_eq!(t.trigger, GuardSource::ContactsEnded);
        assert_eq!(engine.state().first_detection_time(), None);
    }

    #[test]
    fn test_detection_is_sticky_by_default() {
        let mut engine = PhaseEngine::new(contact_config(0.1, 0.05)).unwrap();
        into_crouch(&mut engine);

        engine.tick(TickInput::new(2.0, 0));
        // Contacts come back before the delay elapses
        assert_eq!(engine.tick(TickInput::new(2.05, 3)), TickOutcome::Steady);
        assert!(engine.state().detection_armed());

        // Still commits at the original detection time + delay
        assert!(matches!(
            engine.tick(TickInput::new(2.1, 3)),
            TickOutcome::Transitioned(_)
        ));
        assert_eq!(engine.current_phase(), Phase::Flight);
    }

    #[test]
    fn test_cancel_on_condition_loss() {
        let config = EngineConfig {
            cancel_on_condition_loss: true,
            ..contact_config(0.1, 0.05)
        };
        let mut engine = PhaseEngine::new(config).unwrap();
        into_crouch(&mut engine);

        engine.tick(TickInput::new(2.0, 0));
        assert!(matches!(
            engine.tick(TickInput::new(2.05, 3)),
            TickOutcome::Cancelled { phase: Phase::Crouch, .. }
        ));
        assert!(!engine.state().detection_armed());

        engine.tick(TickInput::new(2.1, 3));
        assert_eq!(engine.current_phase(), Phase::Crouch);

        // A fresh detection re-arms from its own time
        engine.tick(TickInput::new(2.2, 0));
        assert_eq!(engine.state().first_detection_time(), Some(2.2));
    }

    #[test]
    fn test_buffer_discards_detection_right_after_change() {
        let mut engine = PhaseEngine::new(contact_config(0.0, 0.05)).unwrap();
        engine.tick(TickInput::new(1.1, 0));
        assert_eq!(engine.current_phase(), Phase::Crouch);

        // Zero contacts immediately after entering crouch is a stale message
        assert_eq!(engine.tick(TickInput::new(1.12, 0)), TickOutcome::Steady);
        assert_eq!(engine.current_phase(), Phase::Crouch);

        assert!(matches!(
            engine.tick(TickInput::new(1.2, 0)),
            TickOutcome::Transitioned(_)
        ));
    }

    #[test]
    fn test_timeline_reset_returns_to_initial_phase() {
        let mut engine = PhaseEngine::new(contact_config(0.0, 0.05)).unwrap();
        into_crouch(&mut engine);
        engine.tick(TickInput::new(2.0, 0));
        assert_eq!(engine.current_phase(), Phase::Flight);

        let outcome = engine.tick(TickInput::new(0.2, 0));
        let TickOutcome::TimelineReset(reset) = outcome else {
            panic!("expected reset, got {outcome:?}");
        };
        assert_eq!(reset.phase_before, Phase::Flight);
        assert_eq!(reset.phase_after, Phase::Balance);
        assert!((reset.previous_time - 2.0).abs() < f64::EPSILON);
        assert_eq!(engine.current_phase(), Phase::Balance);
        assert!((engine.state().last_tick_time() - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset_tick_does_no_other_processing() {
        let mut engine = PhaseEngine::new(contact_config(0.0, 0.0)).unwrap();
        engine.tick(TickInput::new(5.0, 4));
        assert_eq!(engine.current_phase(), Phase::Crouch);

        // 1.5 is past the balance exit, but the reset tick must not use it
        engine.tick(TickInput::new(1.5, 4));
        assert_eq!(engine.current_phase(), Phase::Balance);

        engine.tick(TickInput::new(1.6, 4));
        assert_eq!(engine.current_phase(), Phase::Crouch);
    }

    #[test]
    fn test_reset_clears_pending_detection() {
        let mut engine = PhaseEngine::new(contact_config(1.0, 0.05)).unwrap();
        into_crouch(&mut engine);
        engine.tick(TickInput::new(2.0, 0));
        assert!(engine.state().detection_armed());

        engine.tick(TickInput::new(0.1, 0));
        assert!(!engine.state().detection_armed());
        assert_eq!(engine.state().first_detection_time(), None);
    }

    #[test]
    fn test_reset_uses_configured_initial_phase() {
        let config = EngineConfig {
            initial_phase: Phase::Crouch,
            ..contact_config(0.0, 0.05)
        };
        let mut engine = PhaseEngine::new(config).unwrap();
        assert_eq!(engine.current_phase(), Phase::Crouch);
        engine.tick(TickInput::new(0.5, 0));
        assert_eq!(engine.current_phase(), Phase::Flight);

        engine.tick(TickInput::new(0.1, 0));
        assert_eq!(engine.current_phase(), Phase::Crouch);
    }

    #[test]
    fn test_land_is_terminal() {
        let mut engine = PhaseEngine::new(contact_config(0.0, 0.0)).unwrap();
        engine.tick(TickInput::new(1.1, 0));
        engine.tick(TickInput::new(1.2, 0));
        engine.tick(TickInput::new(1.3, 2));
        assert_eq!(engine.current_phase(), Phase::Land);
        assert!(engine.is_terminal());

        for i in 0..20 {
            let t = 1.4 + f64::from(i) * 0.1;
            assert_eq!(
                engine.tick(TickInput::new(t, i as usize % 3)),
                TickOutcome::Steady
            );
        }
        assert_eq!(engine.current_phase(), Phase::Land);
    }

    #[test]
    fn test_non_finite_time_ignored() {
        let mut engine = PhaseEngine::new(contact_config(0.0, 0.0)).unwrap();
        engine.tick(TickInput::new(1.5, 2));
        let before = engine.state().clone();

        assert_eq!(engine.tick(TickInput::new(f64::NAN, 0)), TickOutcome::Ignored);
        assert_eq!(
            engine.tick(TickInput::new(f64::INFINITY, 0)),
            TickOutcome::Ignored
        );
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_observers_receive_events() {
        let recorder = Arc::new(Recorder::default());
        let mut engine = PhaseEngine::new(contact_config(0.1, 0.05)).unwrap();
        engine.add_observer(Box::new(Arc::clone(&recorder)));

        into_crouch(&mut engine);
        engine.tick(TickInput::new(2.0, 0));
        engine.tick(TickInput::new(2.1, 0));
        engine.tick(TickInput::new(1.0, 0));

        let transitions = recorder.transitions.lock().unwrap();
        assert_eq!(transitions.len(), 2);
        assert_eq!(transitions[1].from, Phase::Crouch);
        assert_eq!(transitions[1].to, Phase::Flight);
        assert_eq!(recorder.armed.lock().unwrap().as_slice(), &[(Phase::Crouch, 2.0)]);
        assert_eq!(recorder.resets.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_reader_tracks_committed_phase() {
        let mut engine = PhaseEngine::new(contact_config(0.0, 0.0)).unwrap();
        let reader = engine.subscribe();
        assert_eq!(reader.current(), Phase::Balance);

        engine.tick(TickInput::new(1.5, 1));
        assert_eq!(reader.current(), Phase::Crouch);
        assert_eq!(reader.scalar(), 1);
    }

    #[test]
    fn test_contact_mode_requires_source() {
        let config = EngineConfig {
            contact_based: true,
            contact_source: ContactSource::None,
            ..EngineConfig::default()
        };
        assert!(matches!(
            PhaseEngine::new(config),
            Err(PhaseError::ContactSourceRequired)
        ));
    }

    #[test]
    fn test_non_monotonic_times_rejected() {
        let config = EngineConfig {
            transition_times: [1.0, 3.0, 2.0],
            ..EngineConfig::default()
        };
        assert!(matches!(
            PhaseEngine::new(config),
            Err(PhaseError::NonMonotonicTimes(_))
        ));

        let config = EngineConfig {
            transition_times: [1.0, 1.0, 2.0],
            ..EngineConfig::default()
        };
        assert!(PhaseEngine::new(config).is_err());
    }

    #[test]
    fn test_negative_delay_rejected() {
        let config = EngineConfig {
            transition_delay: -0.1,
            ..EngineConfig::default()
        };
        assert!(matches!(
            PhaseEngine::new(config),
            Err(PhaseError::InvalidDuration {
                field: "transition_delay",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_force_threshold_rejected() {
        let config = EngineConfig {
            contact_source: ContactSource::ForceMagnitudes { threshold: 0.0 },
            ..EngineConfig::default()
        };
        assert!(PhaseEngine::new(config).is_err());
    }

    #[test]
    fn test_custom_table_contact_check() {
        let table = TransitionTable::new(vec![TransitionRule {
            from: Phase::Balance,
            to: Phase::Flight,
            guard: GuardSource::ContactsEnded,
            policy: DelayPolicy::Debounced,
        }])
        .unwrap();
        assert!(PhaseEngine::with_table(EngineConfig::default(), table.clone()).is_err());

        let config = EngineConfig {
            contact_source: ContactSource::ForceMagnitudes {
                threshold: DEFAULT_FORCE_THRESHOLD,
            },
            buffer_time: 0.0,
            ..EngineConfig::default()
        };
        let mut engine = PhaseEngine::with_table(config, table).unwrap();
        let contacts = engine
            .resolve_contacts(&ContactReport::Forces(vec![1e-9, 0.0]))
            .unwrap();
        engine.tick(TickInput::new(0.3, contacts));
        assert_eq!(engine.current_phase(), Phase::Flight);
    }
}
