//! Fuzz target for compound metric key parsing.
//!
//! Tests that `parse_key` and the classifier accept any string without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use nf_common::{parse_key, CategoryClassifier};

fuzz_target!(|data: &str| {
    let parsed = parse_key(data);
    let _ = parsed.subtype_namespaced();
    let _ = parsed.subtype_token();
    let _ = CategoryClassifier::new().category_of(data);
});
