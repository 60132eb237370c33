#![no_main]

use jumpfsm::driver::RobotSample;
use jumpfsm::phase::{ContactSource, DEFAULT_FORCE_THRESHOLD};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(sample) = serde_json::from_slice::<RobotSample>(data) {
        for source in [
            ContactSource::PointPairs,
            ContactSource::ForceMagnitudes {
                threshold: DEFAULT_FORCE_THRESHOLD,
            },
            ContactSource::None,
        ] {
            let _ = source.active_contacts(&sample.contacts);
        }
    }
});
