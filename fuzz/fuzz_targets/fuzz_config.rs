//! Fuzz target for analytics.json parsing and validation.
//!
//! Tests that config parsing and semantic validation return errors rather
//! than panicking on arbitrary input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use nf_config::{validate_config, AnalyticsConfig};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = AnalyticsConfig::parse_json(text) {
        let _ = validate_config(&config);
    }
});
