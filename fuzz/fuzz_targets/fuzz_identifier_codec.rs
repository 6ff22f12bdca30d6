#![no_main]

use libfuzzer_sys::fuzz_target;
use sequence_client::short_id::{is_canonical_uuid, to_canonical_uuid, to_short_uuid};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    // Arbitrary route parameters must never panic.
    let canonical = to_canonical_uuid(s);
    let _ = to_short_uuid(s);

    // Anything that resolves to a canonical UUID survives a round trip.
    if let Some(canonical) = canonical.filter(|c| is_canonical_uuid(c)) {
        let short = to_short_uuid(&canonical).unwrap_or_default();
        let back = to_canonical_uuid(&short).unwrap_or_default();
        assert_eq!(back, canonical.to_ascii_lowercase());
    }
});
