#![no_main]

use jumpfsm::phase::{ContactSource, EngineConfig, PhaseEngine, TickInput, TickOutcome};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&flags, rest)) = data.split_first() else {
        return;
    };

    let config = EngineConfig {
        contact_based: flags & 1 == 1,
        transition_delay: f64::from(flags >> 4) / 100.0,
        buffer_time: f64::from((flags >> 1) & 0x7) / 100.0,
        contact_source: ContactSource::PointPairs,
        ..EngineConfig::default()
    };
    let Ok(mut engine) = PhaseEngine::new(config) else {
        return;
    };

    let mut previous = engine.current_phase();
    for chunk in rest.chunks_exact(9) {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&chunk[..8]);
        let time = f64::from_le_bytes(raw);
        let contacts = usize::from(chunk[8] & 0x7);

        let outcome = engine.tick(TickInput::new(time, contacts));
        let current = engine.current_phase();
        match outcome {
            TickOutcome::TimelineReset(_) => assert_eq!(current, config.initial_phase),
            _ => assert!(current >= previous && current.index() - previous.index() <= 1),
        }
        previous = current;
    }
});
