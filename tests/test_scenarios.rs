mod common;

use std::sync::{Arc, Mutex};

use common::{contact_config, tick_all, time_config};
use jumpfsm::phase::{
    ContactReport, ContactSource, DEFAULT_FORCE_THRESHOLD, Phase, PhaseEngine, PhaseObserver,
    PhaseTransition, TickInput, TickOutcome, detect_guard_condition,
};

#[derive(Default)]
struct Transitions(Mutex<Vec<PhaseTransition>>);

impl PhaseObserver for Transitions {
    fn on_transition(&self, transition: &PhaseTransition) {
        self.0.lock().unwrap().push(transition.clone());
    }
}

/// Enters crouch at t = 1.1 with contacts held.
fn crouching(engine: &mut PhaseEngine) {
    tick_all(engine, &[(0.5, 4), (1.1, 4)]);
    assert_eq!(engine.current_phase(), Phase::Crouch);
}

#[test]
fn scheduled_jump_follows_the_clock() {
    let mut engine = PhaseEngine::new(time_config([1.0, 2.0, 3.0], 0.0, 0.0)).unwrap();

    for i in 0..=40 {
        let t = f64::from(i) / 10.0;
        engine.tick(TickInput::new(t, 0));

        let expected = if t <= 1.0 {
            Phase::Balance
        } else if t <= 2.0 {
            Phase::Crouch
        } else if t <= 3.0 {
            Phase::Flight
        } else {
            Phase::Land
        };
        assert_eq!(engine.current_phase(), expected, "at t = {t}");
    }
}

#[test]
fn contact_loss_commits_after_delay() {
    let mut engine = PhaseEngine::new(contact_config(0.1, 0.05)).unwrap();
    crouching(&mut engine);

    for i in 120..200 {
        engine.tick(TickInput::new(f64::from(i) / 100.0, 4));
    }
    assert_eq!(engine.current_phase(), Phase::Crouch);

    let outcome = engine.tick(TickInput::new(2.0, 0));
    assert!(matches!(
        outcome,
        TickOutcome::Armed {
            phase: Phase::Crouch,
            first_detection_time
        } if (first_detection_time - 2.0).abs() < f64::EPSILON
    ));

    let mut committed_at = None;
    for i in 201..=215 {
        let t = f64::from(i) / 100.0;
        if let TickOutcome::Transitioned(transition) = engine.tick(TickInput::new(t, 0)) {
            assert_eq!(transition.to, Phase::Flight);
            committed_at = Some(t);
            break;
        }
    }
    let committed_at = committed_at.expect("crouch never committed");
    assert!((committed_at - 2.1).abs() < 1e-9, "committed at {committed_at}");
}

#[test]
fn time_reversal_resets_to_initial_phase() {
    let mut engine = PhaseEngine::new(time_config([1.0, 2.0, 3.0], 0.0, 0.05)).unwrap();

    let phases = tick_all(&mut engine, &[(5.0, 0), (5.5, 0)]);
    assert_eq!(phases, vec![Phase::Crouch, Phase::Flight]);

    let outcome = engine.tick(TickInput::new(1.0, 0));
    assert!(matches!(outcome, TickOutcome::TimelineReset(_)));
    assert_eq!(engine.current_phase(), Phase::Balance);
    assert!(!engine.state().detection_armed());

    engine.tick(TickInput::new(1.5, 0));
    assert_eq!(engine.current_phase(), Phase::Crouch);
}

#[test]
fn second_detection_inside_window_is_ignored() {
    let mut engine = PhaseEngine::new(contact_config(0.1, 0.05)).unwrap();
    crouching(&mut engine);

    assert!(matches!(
        engine.tick(TickInput::new(2.0, 0)),
        TickOutcome::Armed { .. }
    ));

    // The guard rejects the second tick because a detection is already armed
    assert!(!detect_guard_condition(
        true,
        2.02,
        engine.state(),
        engine.config().buffer_time
    ));
    assert_eq!(engine.tick(TickInput::new(2.02, 0)), TickOutcome::Steady);
    assert_eq!(engine.state().first_detection_time(), Some(2.0));
}

#[test]
fn held_condition_transitions_exactly_once() {
    let transitions = Arc::new(Transitions::default());
    let mut engine = PhaseEngine::new(contact_config(0.1, 0.05)).unwrap();
    engine.add_observer(Box::new(Arc::clone(&transitions)));
    crouching(&mut engine);

    // Airborne (zero contacts) far longer than buffer + delay
    for i in 200..260 {
        engine.tick(TickInput::new(f64::from(i) / 100.0, 0));
    }

    let recorded = transitions.0.lock().unwrap();
    let crouch_exits = recorded.iter().filter(|t| t.from == Phase::Crouch).count();
    assert_eq!(crouch_exits, 1);
    assert_eq!(engine.current_phase(), Phase::Flight);
}

#[test]
fn armed_detection_waits_out_the_delay() {
    let mut engine = PhaseEngine::new(contact_config(0.2, 0.05)).unwrap();
    crouching(&mut engine);
    engine.tick(TickInput::new(2.0, 0));

    for t in [2.0, 2.05, 2.1, 2.15, 2.19] {
        engine.tick(TickInput::new(t, 0));
        assert_eq!(engine.current_phase(), Phase::Crouch, "at t = {t}");
    }
    engine.tick(TickInput::new(2.2, 0));
    assert_eq!(engine.current_phase(), Phase::Flight);
}

#[test]
fn armed_detection_survives_condition_flicker() {
    // Detections are sticky unless cancel_on_condition_loss is set
    let mut engine = PhaseEngine::new(contact_config(0.1, 0.05)).unwrap();
    crouching(&mut engine);

    let phases = tick_all(&mut engine, &[(2.0, 0), (2.03, 4), (2.06, 4), (2.1, 4)]);
    assert_eq!(
        phases,
        vec![Phase::Crouch, Phase::Crouch, Phase::Crouch, Phase::Flight]
    );
}

#[test]
fn force_threshold_boundary() {
    let source = ContactSource::ForceMagnitudes {
        threshold: DEFAULT_FORCE_THRESHOLD,
    };

    let quiet = ContactReport::Forces(vec![1e-9, -5e-7, 0.0, 9.99e-7]);
    assert_eq!(source.active_contacts(&quiet).unwrap(), 0);

    let touching = ContactReport::Forces(vec![1e-9, DEFAULT_FORCE_THRESHOLD]);
    assert!(source.active_contacts(&touching).unwrap() >= 1);
}

#[test]
fn force_backend_full_jump() {
    let config = jumpfsm::phase::EngineConfig {
        contact_source: ContactSource::ForceMagnitudes {
            threshold: DEFAULT_FORCE_THRESHOLD,
        },
        ..contact_config(0.0, 0.05)
    };
    let mut engine = PhaseEngine::new(config).unwrap();

    let samples = [
        (0.5, vec![40.0, 41.0]),
        (1.1, vec![60.0, 58.0]),
        // Persistent near-zero noise while airborne
        (1.5, vec![3e-8, 1e-9]),
        (1.9, vec![12.0, 0.0]),
    ];
    let phases: Vec<Phase> = samples
        .into_iter()
        .map(|(t, forces)| {
            let contacts = engine
                .resolve_contacts(&ContactReport::Forces(forces))
                .unwrap();
            engine.tick(TickInput::new(t, contacts));
            engine.current_phase()
        })
        .collect();

    assert_eq!(
        phases,
        vec![Phase::Balance, Phase::Crouch, Phase::Flight, Phase::Land]
    );
}
