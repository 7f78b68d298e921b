//! No-mock analytics pipeline tests.
//!
//! Builds a realistic server snapshot and runs it through the analyzer and
//! session exactly as the CLI does, checking every view end to end.

use nf_common::{Category, ChunkCoord, MetricSeries, MetricSnapshot, TimeRange};
use nf_config::AnalyticsConfig;
use nf_core::views::lag::SpikeSource;
use nf_core::views::system::GcSource;
use nf_core::{AnalysisParams, Analyzer, AnalyticsSession};

const NOW: i64 = 10_000_000;
const HOUR_AND_SOME: i64 = 7_200_000;

fn at_now(value: f64) -> MetricSeries {
    MetricSeries::from_pairs(&[(NOW, value)])
}

fn server_snapshot() -> MetricSnapshot {
    MetricSnapshot::new()
        .with_series(
            "server.tps",
            MetricSeries::from_pairs(&[
                (NOW - HOUR_AND_SOME, 20.0),
                (NOW - 120_000, 19.5),
                (NOW - 60_000, 18.0),
                (NOW, 15.0),
            ]),
        )
        .with_series(
            "server.tick_time",
            MetricSeries::from_pairs(&[
                (NOW - HOUR_AND_SOME, 2.0),
                (NOW - 120_000, 3.0),
                (NOW - 60_000, 12.0),
                (NOW, 150.0),
            ]),
        )
        .with_series("entities.total", at_now(8.0))
        .with_series("entities.types.minecraft.zombie", at_now(5.0))
        .with_series("entities.types.minecraft.cow", at_now(3.0))
        .with_series("world.minecraft.overworld.chunks.loaded", at_now(400.0))
        .with_series("world.minecraft.overworld.active_chunk.1.2", at_now(30.0))
        .with_series("world.minecraft.overworld.chunk.1.2.block_entities", at_now(4.0))
        .with_series("world.minecraft.overworld.hotspot.1.2.total", at_now(12.0))
        .with_series("world.minecraft.overworld.hotspot.1.2.minecraft.zombie", at_now(9.0))
        .with_series("block_entities.types.minecraft.furnace", at_now(6.0))
        .with_series("gc.young.rate", MetricSeries::from_pairs(&[(NOW - 1000, 0.4)]))
}

// ============================================================================
// Full pass
// ============================================================================

#[test]
fn full_pass_populates_views() {
    let report = Analyzer::default().analyze(&server_snapshot(), &AnalysisParams::default(), NOW);

    assert!(!report.is_empty());
    assert_eq!(report.time_range, TimeRange::OneHour);
    assert_eq!(report.series_count, 12);

    let empty: Vec<&str> = report.empty_views().iter().map(|(v, _)| *v).collect();
    assert!(empty.contains(&"system.cpu"));
    assert!(empty.contains(&"chunks.rates"));
    assert!(!empty.contains(&"distribution"));
}

#[test]
fn distribution_uses_full_history() {
    let report = Analyzer::default().analyze(&server_snapshot(), &AnalysisParams::default(), NOW);
    let dist = report.distribution.data().expect("distribution ready");

    let counts: Vec<u64> = dist.buckets.iter().map(|b| b.count).collect();
    assert_eq!(counts, vec![2, 0, 1, 0, 0, 0, 1]);
    assert_eq!(dist.total, 4);
    assert_eq!(dist.summary.max, 150.0);
}

#[test]
fn lag_spikes_derived_from_tick_time() {
    let report = Analyzer::default().analyze(&server_snapshot(), &AnalysisParams::default(), NOW);
    let lag = report.lag_spikes.data().expect("lag ready");

    assert!(matches!(lag.source, SpikeSource::Derived { .. }));
    assert_eq!(lag.total_events, 1);
    assert_eq!(lag.windows.len(), 5);
    assert!(lag.windows.iter().all(|w| w.count == 1));
}

#[test]
fn default_correlation_pair_uses_full_history() {
    let report = Analyzer::default().analyze(&server_snapshot(), &AnalysisParams::default(), NOW);
    let corr = report.correlation.data().expect("correlation ready");

    assert_eq!(corr.title, "Correlation: Server Tps vs Server Tick Time");
    assert_eq!(corr.pair_count, 4);
    assert!(corr.coefficient.expect("defined") < 0.0);
}

#[test]
fn overview_trend_is_time_filtered() {
    let report = Analyzer::default().analyze(&server_snapshot(), &AnalysisParams::default(), NOW);
    let perf = report.overview.performance.data().expect("performance ready");

    assert_eq!(perf.y_max, Some(20.0));
    assert_eq!(perf.trends.len(), 1);
    let values = perf.trends[0].values();
    assert_eq!(values, vec![19.5, 18.0, 15.0]);

    let tps = report
        .overview
        .headlines
        .iter()
        .find(|h| h.key == "server.tps")
        .expect("tps headline");
    assert_eq!(tps.value, Some(15.0));
}

#[test]
fn entities_and_chunks() {
    let report = Analyzer::default().analyze(&server_snapshot(), &AnalysisParams::default(), NOW);

    let categories = report.entities.categories.data().expect("categories");
    let hostile = categories
        .iter()
        .find(|c| c.category == Category::Hostile)
        .expect("hostile share");
    assert_eq!(hostile.total, 5.0);

    let hotspots = report.entities.hotspots.data().expect("hotspots");
    assert_eq!(hotspots[0].coordinate, ChunkCoord { x: 1, z: 2 });
    assert_eq!(hotspots[0].entity_count, 12.0);
    assert_eq!(hotspots[0].details[0].label, "Zombie");

    let active = report.chunks.active.data().expect("active chunks");
    assert_eq!(active[0].activity, 30.0);
    assert_eq!(active[0].block_entities, 4.0);

    let dims = report.chunks.by_dimension.data().expect("dimensions");
    assert_eq!(dims[0].loaded, 400.0);

    let blocks = report.chunks.block_entities.data().expect("block entities");
    assert_eq!(blocks[0].count, 6.0);
}

#[test]
fn gc_uses_first_candidate() {
    let report = Analyzer::default().analyze(&server_snapshot(), &AnalysisParams::default(), NOW);
    let gc = report.system.gc.data().expect("gc ready");
    assert_eq!(gc.source, GcSource::Candidate { index: 0 });
}

#[test]
fn report_serializes_with_status_tags() {
    let report = Analyzer::default().analyze(&server_snapshot(), &AnalysisParams::default(), NOW);
    let json = serde_json::to_value(&report).expect("serialize");

    assert_eq!(json["time_range"], "1h");
    assert_eq!(json["distribution"]["status"], "ready");
    assert_eq!(json["system"]["cpu"]["status"], "no_data");
    assert!(json["system"]["cpu"]["data"]["reason"].is_string());
    assert!(json["distribution"]["data"]["buckets"][6]["upper_exclusive"].is_null());
}

// ============================================================================
// Parameters and config
// ============================================================================

#[test]
fn unknown_performance_metric_falls_back() {
    let params = AnalysisParams {
        performance_metric: Some("server.nonsense".to_string()),
        ..AnalysisParams::default()
    };
    let report = Analyzer::default().analyze(&server_snapshot(), &params, NOW);
    let perf = report.overview.performance.data().expect("performance ready");
    assert_eq!(perf.trends[0].key, "server.tps");
}

#[test]
fn tick_time_axis_gets_headroom() {
    let params = AnalysisParams {
        performance_metric: Some("server.tick_time".to_string()),
        time_range: TimeRange::FiveMinutes,
        ..AnalysisParams::default()
    };
    let report = Analyzer::default().analyze(&server_snapshot(), &params, NOW);
    let perf = report.overview.performance.data().expect("performance ready");
    let y_max = perf.y_max.expect("axis max");
    assert!((y_max - 180.0).abs() < 1e-9);
}

#[test]
fn explicit_spike_series_preferred_over_derivation() {
    let snapshot = server_snapshot().with_series(
        "server.lag_spikes.current",
        MetricSeries::from_pairs(&[(NOW - 20 * 60_000, 1.0), (NOW - 30_000, 1.0)]),
    );
    let report = Analyzer::default().analyze(&snapshot, &AnalysisParams::default(), NOW);
    let lag = report.lag_spikes.data().expect("lag ready");

    assert!(matches!(lag.source, SpikeSource::EventSeries { .. }));
    let counts: Vec<u64> = lag.windows.iter().map(|w| w.count).collect();
    assert_eq!(counts, vec![1, 1, 1, 2, 2]);
}

#[test]
fn custom_rules_replace_stock_table() {
    let config = AnalyticsConfig::parse_json(
        r#"{
            "schema_version": "1.0.0",
            "entities": {
                "rules": [
                    {"category": "players", "matcher": {"kind": "token_in", "values": ["zombie"]}}
                ]
            }
        }"#,
    )
    .expect("parse config");
    let report = Analyzer::new(config).analyze(&server_snapshot(), &AnalysisParams::default(), NOW);
    let categories = report.entities.categories.data().expect("categories");

    let players = categories
        .iter()
        .find(|c| c.category == Category::Players)
        .expect("players share");
    assert_eq!(players.total, 5.0);
    // Cow no longer matches any rule and lands in the catch-all.
    assert!(categories.iter().any(|c| c.category == Category::Other && c.total == 3.0));
}

// ============================================================================
// Session
// ============================================================================

#[test]
fn session_correlates_on_demand() {
    let mut session = AnalyticsSession::new(Analyzer::default());
    session.replace_snapshot(server_snapshot());

    let view = session.correlate("entities.total", "server.tps");
    let corr = view.data().expect("one pair is enough to report");
    assert_eq!(corr.pair_count, 1);
    assert_eq!(corr.coefficient, None);
    assert_eq!(corr.strength, "undefined");

    let missing = session.correlate("server.tps", "server.missing");
    assert_eq!(missing.reason(), Some("no samples for server.missing"));
}

#[test]
fn session_pass_uses_selected_pair_and_range() {
    let mut session = AnalyticsSession::new(Analyzer::default());
    session.replace_snapshot(server_snapshot());
    session.set_time_range("5m");
    session.set_correlation_pair("server.tick_time", "server.tps");

    let report = session.run_pass(NOW);
    assert_eq!(report.time_range, TimeRange::FiveMinutes);
    let corr = report.correlation.data().expect("ready");
    assert_eq!(corr.x, "server.tick_time");
    assert_eq!(session.last_report().map(|r| r.now_ms), Some(NOW));
}

#[test]
fn empty_snapshot_reports_every_view_empty() {
    let mut session = AnalyticsSession::new(Analyzer::default());
    let report = session.run_pass(NOW);
    assert!(report.is_empty());
    assert_eq!(report.empty_views().len(), report.view_count());
    assert_eq!(
        report.system.gc.reason(),
        Some("No GC Data Available")
    );
}
