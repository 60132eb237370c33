#![no_main]

use jumpfsm::config::loader::ConfigLoader;
use jumpfsm::phase::PhaseEngine;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(yaml) = std::str::from_utf8(data) {
        // A config that passes validation must always build an engine
        if let Ok(loaded) = ConfigLoader::with_defaults().load_from_str(yaml) {
            let engine_config = loaded
                .config
                .engine_config()
                .expect("validated config converts");
            PhaseEngine::new(engine_config).expect("validated config builds an engine");
        }
    }
});
