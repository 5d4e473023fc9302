#![no_main]

use beilage::core::{SequenceKey, SequencePolicy};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let policy = SequencePolicy::default();
        // Must not panic; unparsable ids sort last.
        match policy.key(s) {
            SequenceKey::Number(_) | SequenceKey::Unparsed => {}
        }
    }
});
