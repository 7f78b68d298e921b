//! Metric data model: points, series and snapshots.
//!
//! A [`MetricSnapshot`] is everything the collector knew at one fetch. It is
//! immutable for the duration of an analytics pass and is replaced wholesale
//! on refresh, never patched.
//!
//! # Wire format
//!
//! ```json
//! {
//!   "server.tps": [{"timestamp": 1700000000000, "value": 19.8}],
//!   "entities.types.minecraft.zombie": [{"timestamp": 1700000000000, "value": 12}]
//! }
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::path::Path;

/// A single sample: epoch-millisecond timestamp and value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub timestamp: i64,
    pub value: f64,
}

impl MetricPoint {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Points of one metric in ascending timestamp order.
///
/// Ordering is the producer's responsibility. Construction checks it in
/// debug builds; [`MetricSnapshot::from_json`] checks it always.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSeries {
    points: Vec<MetricPoint>,
}

static EMPTY_SERIES: MetricSeries = MetricSeries { points: Vec::new() };

impl MetricSeries {
    pub fn new(points: Vec<MetricPoint>) -> Self {
        let series = Self { points };
        debug_assert!(
            series.is_chronological(),
            "metric series must be in ascending timestamp order"
        );
        series
    }

    /// Build a series from `(timestamp, value)` pairs.
    pub fn from_pairs(pairs: &[(i64, f64)]) -> Self {
        Self::new(pairs.iter().map(|&(t, v)| MetricPoint::new(t, v)).collect())
    }

    pub fn empty() -> &'static MetricSeries {
        &EMPTY_SERIES
    }

    pub fn points(&self) -> &[MetricPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MetricPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn timestamps(&self) -> Vec<i64> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    /// The most recent point, if any.
    pub fn latest(&self) -> Option<MetricPoint> {
        self.points.last().copied()
    }

    /// Largest finite value in the series.
    pub fn max_value(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.value)
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
    }

    /// Index of the first point whose timestamp is older than its predecessor.
    pub fn first_out_of_order(&self) -> Option<usize> {
        self.points
            .windows(2)
            .position(|w| w[1].timestamp < w[0].timestamp)
            .map(|i| i + 1)
    }

    pub fn is_chronological(&self) -> bool {
        self.first_out_of_order().is_none()
    }
}

impl FromIterator<MetricPoint> for MetricSeries {
    fn from_iter<I: IntoIterator<Item = MetricPoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a MetricSeries {
    type Item = &'a MetricPoint;
    type IntoIter = std::slice::Iter<'a, MetricPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// All known series as of one fetch, keyed by metric key.
///
/// Keys iterate in lexicographic order, so every derived view is
/// deterministic across runs for the same snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSnapshot {
    series: BTreeMap<String, MetricSeries>,
}

impl MetricSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode and check a snapshot from its JSON wire format.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(Error::InvalidSnapshot(
                "top level must be a JSON object".to_string(),
            ));
        }
        let snapshot: MetricSnapshot = serde_json::from_value(value)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Check the ordering invariant on every series.
    pub fn validate(&self) -> Result<()> {
        for (key, series) in &self.series {
            if let Some(index) = series.first_out_of_order() {
                return Err(Error::UnsortedSeries {
                    key: key.clone(),
                    index,
                });
            }
        }
        Ok(())
    }

    pub fn insert(&mut self, key: impl Into<String>, series: MetricSeries) {
        self.series.insert(key.into(), series);
    }

    /// Builder-style insert, handy for fixtures.
    pub fn with_series(mut self, key: impl Into<String>, series: MetricSeries) -> Self {
        self.insert(key, series);
        self
    }

    pub fn get(&self, key: &str) -> Option<&MetricSeries> {
        self.series.get(key)
    }

    /// The series for `key`, or the empty series when the key is absent.
    pub fn series(&self, key: &str) -> &MetricSeries {
        self.series.get(key).unwrap_or(&EMPTY_SERIES)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.series.contains_key(key)
    }

    /// Latest value of `key`, if the series exists and is non-empty.
    pub fn latest_value(&self, key: &str) -> Option<f64> {
        self.series(key).latest().map(|p| p.value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricSeries)> {
        self.series.iter().map(|(k, s)| (k.as_str(), s))
    }

    /// Series whose key starts with `prefix`, in key order.
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a MetricSeries)> + 'a {
        self.series
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(k, _)| k.starts_with(prefix))
            .map(|(k, s)| (k.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample() -> MetricSnapshot {
        MetricSnapshot::new()
            .with_series("server.tps", MetricSeries::from_pairs(&[(1, 20.0), (2, 19.5)]))
            .with_series("entities.total", MetricSeries::from_pairs(&[(1, 40.0)]))
            .with_series("entities.types.minecraft.cow", MetricSeries::from_pairs(&[(1, 3.0)]))
            .with_series("entitiesx", MetricSeries::from_pairs(&[(1, 1.0)]))
    }

    #[test]
    fn test_missing_key_reads_as_empty() {
        let snap = sample();
        assert!(snap.series("nope").is_empty());
        assert_eq!(snap.latest_value("nope"), None);
        assert_eq!(snap.latest_value("server.tps"), Some(19.5));
    }

    #[test]
    fn test_with_prefix_stops_at_boundary() {
        let snap = sample();
        let keys: Vec<&str> = snap.with_prefix("entities.").map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["entities.total", "entities.types.minecraft.cow"]);
    }

    #[test]
    fn test_keys_are_sorted() {
        let snap = sample();
        let keys: Vec<&str> = snap.keys().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_from_json_round_trip_shape() {
        let json = r#"{"server.tps":[{"timestamp":1000,"value":20.0},{"timestamp":2000,"value":18.0}]}"#;
        let snap = MetricSnapshot::from_json(json).expect("parse");
        assert_eq!(snap.len(), 1);
        assert_eq!(snap.series("server.tps").values(), vec![20.0, 18.0]);
    }

    #[test]
    fn test_from_json_rejects_unsorted_series() {
        let json = r#"{"a":[{"timestamp":2000,"value":1},{"timestamp":1000,"value":2}]}"#;
        let err = MetricSnapshot::from_json(json).unwrap_err();
        assert!(matches!(err, Error::UnsortedSeries { index: 1, .. }));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = MetricSnapshot::from_json("[1,2,3]").unwrap_err();
        assert!(matches!(err, Error::InvalidSnapshot(_)));
        let err = MetricSnapshot::from_json("not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"chunks.loaded":[{{"timestamp":5,"value":120}}]}}"#).expect("write");
        let snap = MetricSnapshot::from_file(file.path()).expect("load");
        assert_eq!(snap.latest_value("chunks.loaded"), Some(120.0));
    }

    #[test]
    fn test_series_helpers() {
        let s = MetricSeries::from_pairs(&[(1, 3.0), (2, f64::NAN), (3, 9.0)]);
        assert_eq!(s.max_value(), Some(9.0));
        assert_eq!(s.latest().map(|p| p.timestamp), Some(3));
        assert!(s.is_chronological());
        assert_eq!(MetricSeries::empty().max_value(), None);
    }
}
