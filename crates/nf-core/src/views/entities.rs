//! Entity categories, type breakdown and spatial hotspots.

use super::ViewState;
use crate::rank::{top_n_by, RankedEntry};
use nf_common::labels::{dimension_label, type_label};
use nf_common::{parse_key, Category, CategoryClassifier, ChunkCoord, KeyShape, MetricSnapshot};
use nf_config::analytics::EntityConfig;
use serde::Serialize;
use std::collections::BTreeMap;

const ENTITY_TYPES_PREFIX: &str = "entities.types.";
const HOTSPOT_TOTAL: &str = "total";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub label: &'static str,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeCount {
    /// Namespaced type id (`minecraft:cow`).
    pub kind: String,
    pub label: String,
    pub count: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityHotspot {
    pub dimension: String,
    pub dimension_label: String,
    pub coordinate: ChunkCoord,
    pub entity_count: f64,
    /// Most common types in the chunk.
    pub details: Vec<TypeCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitiesView {
    pub categories: ViewState<Vec<CategoryShare>>,
    pub types: ViewState<Vec<TypeCount>>,
    pub hotspots: ViewState<Vec<EntityHotspot>>,
}

pub fn entities_view(
    snapshot: &MetricSnapshot,
    classifier: &CategoryClassifier,
    config: &EntityConfig,
) -> EntitiesView {
    EntitiesView {
        categories: category_breakdown(snapshot, classifier, &config.prefix),
        types: type_breakdown(snapshot, config.type_top_n),
        hotspots: entity_hotspots(snapshot, config.hotspot_top_n, config.hotspot_detail_top_n),
    }
}

/// Fold the latest value of every key under `prefix` into category totals.
pub fn category_breakdown(
    snapshot: &MetricSnapshot,
    classifier: &CategoryClassifier,
    prefix: &str,
) -> ViewState<Vec<CategoryShare>> {
    let totals = classifier.classify_all(
        snapshot
            .with_prefix(prefix)
            .filter_map(|(key, series)| series.latest().map(|p| (key, p.value))),
    );

    let shares: Vec<CategoryShare> = totals
        .non_empty()
        .into_iter()
        .map(|(category, total)| CategoryShare {
            category,
            label: category.label(),
            total,
        })
        .collect();

    if shares.is_empty() {
        return ViewState::no_data("no entity data");
    }
    ViewState::Ready(shares)
}

/// Top entity types by latest count.
pub fn type_breakdown(snapshot: &MetricSnapshot, n: usize) -> ViewState<Vec<TypeCount>> {
    let counts: Vec<TypeCount> = snapshot
        .with_prefix(ENTITY_TYPES_PREFIX)
        .filter_map(|(key, series)| {
            let count = series.latest()?.value;
            let kind = parse_key(key).subtype_namespaced()?;
            (count > 0.0).then(|| TypeCount {
                label: type_label(&kind),
                kind,
                count,
            })
        })
        .collect();

    let ranked = top_n_by(counts, n, |t| t.count);
    if ranked.is_empty() {
        return ViewState::no_data("no entity type data");
    }
    ViewState::Ready(ranked)
}

#[derive(Default)]
struct HotspotAcc {
    total: Option<f64>,
    fallback: Option<f64>,
    details: Vec<RankedEntry>,
}

/// Chunks with the most entities.
///
/// The count comes from `<ns>.<dim>.hotspot.<x>.<z>.total` when present and
/// from `hotspot.<dim>.chunk.<x>.<z>.entities` otherwise. Other hotspot
/// subtypes are per-type counts shown as details.
pub fn entity_hotspots(
    snapshot: &MetricSnapshot,
    n: usize,
    detail_n: usize,
) -> ViewState<Vec<EntityHotspot>> {
    let mut cells: BTreeMap<(String, ChunkCoord), HotspotAcc> = BTreeMap::new();

    for (key, series) in snapshot.iter() {
        let parsed = parse_key(key);
        let is_hotspot = match parsed.shape {
            KeyShape::ChunkHotspot => true,
            KeyShape::ChunkMetric => parsed.namespace == "hotspot",
            _ => false,
        };
        if !is_hotspot {
            continue;
        }
        let (Some(dimension), Some(coordinate)) = (parsed.dimension.clone(), parsed.coordinate)
        else {
            tracing::trace!(key, "skipping hotspot key without a coordinate");
            continue;
        };
        let Some(latest) = series.latest() else {
            continue;
        };

        let acc = cells.entry((dimension, coordinate)).or_default();
        let subtype = parsed.subtype.as_deref().unwrap_or_default();
        match (parsed.shape, subtype) {
            (KeyShape::ChunkHotspot, HOTSPOT_TOTAL) => acc.total = Some(latest.value),
            (KeyShape::ChunkHotspot, _) => {
                if let Some(kind) = parsed.subtype_namespaced() {
                    acc.details.push(RankedEntry::new(kind, latest.value));
                }
            }
            (_, "entities") => acc.fallback = Some(latest.value),
            _ => {}
        }
    }

    let hotspots: Vec<EntityHotspot> = cells
        .into_iter()
        .filter_map(|((dimension, coordinate), acc)| {
            let entity_count = acc.total.or(acc.fallback).unwrap_or(0.0);
            if entity_count <= 0.0 {
                return None;
            }
            let details = crate::rank::top_n(
                acc.details.into_iter().filter(|d| d.value > 0.0),
                detail_n,
            )
            .into_iter()
            .map(|d| TypeCount {
                label: type_label(&d.key),
                kind: d.key,
                count: d.value,
            })
            .collect();
            Some(EntityHotspot {
                dimension_label: dimension_label(&dimension),
                dimension,
                coordinate,
                entity_count,
                details,
            })
        })
        .collect();

    let ranked = top_n_by(hotspots, n, |h| h.entity_count);
    if ranked.is_empty() {
        return ViewState::no_data("no entity hotspots detected");
    }
    ViewState::Ready(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nf_common::MetricSeries;

    fn latest(v: f64) -> MetricSeries {
        MetricSeries::from_pairs(&[(0, 0.0), (1000, v)])
    }

    #[test]
    fn test_categories_from_types() {
        let snapshot = MetricSnapshot::new()
            .with_series("entities.types.minecraft.zombie", latest(5.0))
            .with_series("entities.types.minecraft.cow", latest(3.0))
            .with_series("entities.total", latest(8.0));
        let view = category_breakdown(&snapshot, &CategoryClassifier::new(), "entities.");
        let shares = view.data().expect("ready");
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].category, Category::Hostile);
        assert_eq!(shares[0].total, 5.0);
        assert_eq!(shares[1].category, Category::Passive);
        assert_eq!(shares[1].total, 3.0);
    }

    #[test]
    fn test_categories_empty() {
        let snapshot = MetricSnapshot::new().with_series("entities.total", latest(8.0));
        let view = category_breakdown(&snapshot, &CategoryClassifier::new(), "entities.");
        assert!(!view.is_ready());
    }

    #[test]
    fn test_type_breakdown_ranked() {
        let snapshot = MetricSnapshot::new()
            .with_series("entities.types.minecraft.cow", latest(3.0))
            .with_series("entities.types.minecraft.magma_cube", latest(9.0))
            .with_series("entities.types.minecraft.bat", latest(0.0));
        let view = type_breakdown(&snapshot, 10);
        let types = view.data().expect("ready");
        assert_eq!(types.len(), 2);
        assert_eq!(types[0].kind, "minecraft:magma_cube");
        assert_eq!(types[0].label, "Magma Cube");
        assert_eq!(types[1].label, "Cow");
    }

    #[test]
    fn test_hotspots_with_details() {
        let snapshot = MetricSnapshot::new()
            .with_series("world.minecraft.overworld.hotspot.1.2.total", latest(12.0))
            .with_series("world.minecraft.overworld.hotspot.1.2.minecraft.zombie", latest(7.0))
            .with_series("world.minecraft.overworld.hotspot.1.2.minecraft.cow", latest(5.0))
            .with_series("hotspot.minecraft.the_nether.chunk.-3.4.entities", latest(20.0))
            .with_series("world.minecraft.overworld.hotspot.x.2.total", latest(99.0));
        let view = entity_hotspots(&snapshot, 15, 3);
        let hotspots = view.data().expect("ready");
        assert_eq!(hotspots.len(), 2);
        assert_eq!(hotspots[0].dimension_label, "The nether");
        assert_eq!(hotspots[0].coordinate, ChunkCoord { x: -3, z: 4 });
        assert_eq!(hotspots[1].entity_count, 12.0);
        let detail: Vec<&str> = hotspots[1].details.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(detail, vec!["Zombie", "Cow"]);
    }

    #[test]
    fn test_no_hotspots() {
        assert!(!entity_hotspots(&MetricSnapshot::new(), 15, 3).is_ready());
    }
}
