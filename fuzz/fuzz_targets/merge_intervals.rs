#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let forward = watchline::fuzzing::merge_from_bytes(data);
    assert!(watchline::fuzzing::is_normalized(&forward));

    let mut reversed = Vec::with_capacity(data.len());
    for chunk in data.chunks_exact(4).rev() {
        reversed.extend_from_slice(chunk);
    }
    let backward = watchline::fuzzing::merge_from_bytes(&reversed);
    assert_eq!(forward, backward);
});
