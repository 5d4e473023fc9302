#![no_main]

use beilage::statement::SheetNamer;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mut namer = SheetNamer::default();
        let first = namer.claim(s, "");
        let second = namer.claim(s, "");
        assert!(!first.is_empty() && first.chars().count() <= 31);
        assert!(second.chars().count() <= 31);
        assert_ne!(first.to_lowercase(), second.to_lowercase());
    }
});
