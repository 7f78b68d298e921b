//! Descending top-N ranking.

use serde::Serialize;

/// A ranked `(key, value)` pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub key: String,
    pub value: f64,
}

impl RankedEntry {
    pub fn new(key: impl Into<String>, value: f64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Sort descending by value and keep the first `n`.
///
/// The sort is stable, so equal values keep their input order. NaN values are
/// dropped before sorting.
///
/// Rankings built from a `MetricSnapshot` see keys in lexicographic order, so
/// ties there resolve by metric key rather than by the collector's JSON order.
pub fn top_n<I>(entries: I, n: usize) -> Vec<RankedEntry>
where
    I: IntoIterator<Item = RankedEntry>,
{
    let mut ranked: Vec<RankedEntry> = entries.into_iter().filter(|e| !e.value.is_nan()).collect();
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
    ranked.truncate(n);
    ranked
}

/// Generic form of [`top_n`] for rows that carry more than a key and value.
pub fn top_n_by<T, F>(mut rows: Vec<T>, n: usize, value: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    rows.retain(|r| !value(r).is_nan());
    rows.sort_by(|a, b| value(b).total_cmp(&value(a)));
    rows.truncate(n);
    rows
}
