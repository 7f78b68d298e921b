//! Fuzz target for a full analysis pass.
//!
//! Builds a snapshot from structured input and runs every view over it.
//! Only ordered series are fed in, matching what snapshot decoding admits.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use nf_common::{MetricSeries, MetricSnapshot, TimeRange};
use nf_core::{AnalysisParams, Analyzer};

#[derive(Debug, Arbitrary)]
struct Input {
    series: Vec<(String, Vec<(i64, f64)>)>,
    now_ms: i64,
    range: u8,
}

fuzz_target!(|input: Input| {
    let mut snapshot = MetricSnapshot::new();
    for (key, mut points) in input.series {
        points.sort_by_key(|(t, _)| *t);
        snapshot.insert(key, MetricSeries::from_pairs(&points));
    }

    let ranges = TimeRange::all();
    let params = AnalysisParams {
        time_range: ranges[input.range as usize % ranges.len()],
        ..AnalysisParams::default()
    };
    let report = Analyzer::default().analyze(&snapshot, &params, input.now_ms);
    let _ = serde_json::to_string(&report);
});
