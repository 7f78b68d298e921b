//! Fixed-edge histogram bucketing.
//!
//! Buckets partition the number line into half-open ranges
//! `[lower_inclusive, upper_exclusive)`. A bucket set is expected to be
//! contiguous and ascending with `+inf` as the final upper bound; each value
//! is counted in the first bucket that contains it. Values no bucket
//! contains (including NaN) are dropped.

use serde::Serialize;

/// One histogram bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub lower_inclusive: f64,
    /// `f64::INFINITY` for the open-ended last bucket (serialized as `null`).
    pub upper_exclusive: f64,
    pub count: u64,
}

impl Bucket {
    /// An empty bucket used as a template.
    pub fn template(label: impl Into<String>, lower_inclusive: f64, upper_exclusive: f64) -> Self {
        Self {
            label: label.into(),
            lower_inclusive,
            upper_exclusive,
            count: 0,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower_inclusive <= value && value < self.upper_exclusive
    }

    pub fn is_unbounded(&self) -> bool {
        self.upper_exclusive == f64::INFINITY
    }
}

/// Check that `templates` form an ascending gap-free partition.
pub fn edges_are_contiguous(templates: &[Bucket]) -> bool {
    templates
        .iter()
        .all(|b| b.lower_inclusive < b.upper_exclusive)
        && templates
            .windows(2)
            .all(|w| w[0].upper_exclusive == w[1].lower_inclusive)
}

/// Count `values` into copies of `templates`.
///
/// Output has one bucket per template, in template order.
pub fn bucket_values(values: &[f64], templates: &[Bucket]) -> Vec<Bucket> {
    debug_assert!(
        edges_are_contiguous(templates),
        "bucket edges must be contiguous and ascending"
    );

    let mut buckets: Vec<Bucket> = templates
        .iter()
        .map(|t| Bucket {
            count: 0,
            ..t.clone()
        })
        .collect();

    for &value in values {
        if let Some(bucket) = buckets.iter_mut().find(|b| b.contains(value)) {
            bucket.count += 1;
        }
    }

    buckets
}

/// Sum of counts across buckets.
pub fn total_count(buckets: &[Bucket]) -> u64 {
    buckets.iter().map(|b| b.count).sum()
}
