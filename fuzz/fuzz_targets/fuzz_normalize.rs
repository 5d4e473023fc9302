#![no_main]

use beilage::core::RawValue;
use beilage::core::normalize;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = normalize::text_from_bytes(data);
    let _ = normalize::amount(&RawValue::Text(s.clone()));
    let _ = normalize::name_key(&s);

    let key = normalize::reference_key(&s);
    assert!(key.chars().all(|c| c.is_ascii_digit()));

    if data.len() >= 8 {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&data[..8]);
        let _ = normalize::amount(&RawValue::Number(f64::from_le_bytes(bytes)));
    }
});
