#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(submission) = watchline::fuzzing::decode_submission_input(input) {
            assert!(submission.interval.start() >= 0.0);
            assert!(submission.interval.end() >= submission.interval.start());
            let encoded = serde_json::to_string(&submission).unwrap_or_default();
            assert!(watchline::fuzzing::decode_submission_input(&encoded).is_ok());
        }
    }
});
