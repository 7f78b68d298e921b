//! Fuzz target for snapshot decoding.
//!
//! Tests that snapshot JSON decoding handles arbitrary input without
//! panicking, and that anything accepted passes its own ordering check.

#![no_main]

use libfuzzer_sys::fuzz_target;
use nf_common::MetricSnapshot;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(snapshot) = MetricSnapshot::from_json(text) {
        assert!(snapshot.validate().is_ok());
    }
});
