//! Headline figures and the two overview trend charts.

use super::trend::{trend, TrendChart};
use super::ViewState;
use nf_common::labels::metric_label;
use nf_common::{MetricSnapshot, TimeRange};
use nf_config::analytics::OverviewConfig;
use serde::Serialize;

const TPS_METRIC: &str = "server.tps";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Headline {
    pub key: String,
    pub label: String,
    /// `None` when the series is empty.
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewView {
    pub headlines: Vec<Headline>,
    pub performance: ViewState<TrendChart>,
    pub population: ViewState<TrendChart>,
}

/// Pick `choice` if it is one of `choices`, else the first choice.
pub fn select_metric<'a>(choice: Option<&'a str>, choices: &'a [String]) -> Option<&'a str> {
    match choice {
        Some(c) if choices.iter().any(|k| k == c) => Some(c),
        _ => choices.first().map(String::as_str),
    }
}

/// Y-axis maximum for the performance chart.
///
/// TPS is capped by the server's tick rate; latency metrics get headroom
/// over the observed maximum with a floor.
pub fn performance_axis_max(key: &str, max_value: Option<f64>, config: &OverviewConfig) -> f64 {
    if key == TPS_METRIC {
        return config.tps_axis_max;
    }
    let scaled = max_value.unwrap_or(0.0) * config.axis_headroom;
    if scaled < config.min_axis_max {
        config.min_axis_max
    } else {
        scaled
    }
}

pub fn overview_view(
    snapshot: &MetricSnapshot,
    config: &OverviewConfig,
    performance_choice: Option<&str>,
    population_choice: Option<&str>,
    range: TimeRange,
    now_ms: i64,
) -> OverviewView {
    let headlines = config
        .headline_metrics
        .iter()
        .map(|key| Headline {
            key: key.clone(),
            label: metric_label(key),
            value: snapshot.latest_value(key),
        })
        .collect();

    let performance = match select_metric(performance_choice, &config.performance_metrics) {
        Some(key) => {
            let t = trend(snapshot, key, range, now_ms);
            if t.is_empty() {
                ViewState::no_data(format!("no {} samples in range", key))
            } else {
                let y_max = performance_axis_max(key, t.max_value(), config);
                ViewState::Ready(TrendChart::new(vec![t]).with_y_max(Some(y_max)))
            }
        }
        None => ViewState::no_data("no performance metric configured"),
    };

    let population = match select_metric(population_choice, &config.population_metrics) {
        Some(key) => {
            let t = trend(snapshot, key, range, now_ms);
            if t.is_empty() {
                ViewState::no_data(format!("no {} samples in range", key))
            } else {
                ViewState::Ready(TrendChart::new(vec![t]))
            }
        }
        None => ViewState::no_data("no population metric configured"),
    };

    OverviewView {
        headlines,
        performance,
        population,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nf_common::MetricSeries;

    #[test]
    fn test_select_metric_fallback() {
        let choices = vec!["server.tps".to_string(), "server.tick_time".to_string()];
        assert_eq!(select_metric(Some("server.tick_time"), &choices), Some("server.tick_time"));
        assert_eq!(select_metric(Some("bogus"), &choices), Some("server.tps"));
        assert_eq!(select_metric(None, &choices), Some("server.tps"));
        assert_eq!(select_metric(Some("x"), &[]), None);
    }

    #[test]
    fn test_axis_max() {
        let cfg = OverviewConfig::default();
        assert_eq!(performance_axis_max("server.tps", Some(19.0), &cfg), 20.0);
        assert_eq!(performance_axis_max("server.tick_time", Some(30.0), &cfg), 50.0);
        assert!((performance_axis_max("server.tick_time", Some(100.0), &cfg) - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_headlines_and_trends() {
        let now = 1_000_000;
        let snapshot = MetricSnapshot::new()
            .with_series("server.tps", MetricSeries::from_pairs(&[(now - 1000, 19.5)]))
            .with_series("entities.total", MetricSeries::from_pairs(&[(now - 1000, 240.0)]));
        let view = overview_view(
            &snapshot,
            &OverviewConfig::default(),
            None,
            Some("chunks.unknown"),
            TimeRange::FiveMinutes,
            now,
        );
        assert_eq!(view.headlines[0].value, Some(19.5));
        assert_eq!(view.headlines[1].value, None);
        let perf = view.performance.data().expect("ready");
        assert_eq!(perf.y_max, Some(20.0));
        let pop = view.population.data().expect("ready");
        assert_eq!(pop.trends[0].key, "entities.total");
    }

    #[test]
    fn test_empty_trend_is_no_data() {
        let view = overview_view(
            &MetricSnapshot::new(),
            &OverviewConfig::default(),
            Some("server.tick_time"),
            None,
            TimeRange::OneHour,
            0,
        );
        assert!(!view.performance.is_ready());
        assert!(!view.population.is_ready());
    }
}
