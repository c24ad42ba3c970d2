#![no_main]
use libfuzzer_sys::fuzz_target;
use sanreplay::notation;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(specs) = notation::parse(0, s) {
            assert!(!specs.is_empty());
        }
    }
});
