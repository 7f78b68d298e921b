//! Loaded chunks, active chunk hotspots, block entities and load rates.

use super::trend::{trends, TrendChart};
use super::ViewState;
use crate::rank::top_n_by;
use nf_common::labels::{block_entity_label, dimension_label};
use nf_common::{parse_key, ChunkCoord, KeyShape, MetricSnapshot, TimeRange};
use nf_config::analytics::ChunkConfig;
use serde::Serialize;

const BLOCK_ENTITY_TYPES_PREFIX: &str = "block_entities.types.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionChunks {
    pub dimension: String,
    pub label: String,
    pub loaded: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveChunk {
    pub dimension: String,
    pub dimension_label: String,
    pub coordinate: ChunkCoord,
    pub activity: f64,
    /// Block entities in the same chunk, 0 when unknown.
    pub block_entities: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockEntityCount {
    pub kind: String,
    pub label: String,
    pub count: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunksView {
    pub by_dimension: ViewState<Vec<DimensionChunks>>,
    pub active: ViewState<Vec<ActiveChunk>>,
    pub block_entities: ViewState<Vec<BlockEntityCount>>,
    pub rates: ViewState<TrendChart>,
}

pub fn chunks_view(
    snapshot: &MetricSnapshot,
    config: &ChunkConfig,
    range: TimeRange,
    now_ms: i64,
) -> ChunksView {
    ChunksView {
        by_dimension: chunks_by_dimension(snapshot),
        active: active_chunks(snapshot, config.active_top_n),
        block_entities: block_entity_types(snapshot, config.block_entity_top_n),
        rates: chunk_rates(snapshot, config, range, now_ms),
    }
}

/// Latest loaded-chunk count per dimension, positive values only.
pub fn chunks_by_dimension(snapshot: &MetricSnapshot) -> ViewState<Vec<DimensionChunks>> {
    let rows: Vec<DimensionChunks> = snapshot
        .iter()
        .filter_map(|(key, series)| {
            let parsed = parse_key(key);
            if parsed.shape != KeyShape::ChunksLoaded {
                return None;
            }
            let loaded = series.latest()?.value;
            let dimension = parsed.dimension?;
            (loaded > 0.0).then(|| DimensionChunks {
                label: dimension_label(&dimension),
                dimension,
                loaded,
            })
        })
        .collect();

    if rows.is_empty() {
        return ViewState::no_data("no per-dimension chunk data");
    }
    ViewState::Ready(rows)
}

/// Most active chunks, joined with their block entity counts.
pub fn active_chunks(snapshot: &MetricSnapshot, n: usize) -> ViewState<Vec<ActiveChunk>> {
    let mut rows = Vec::new();

    for (key, series) in snapshot.iter() {
        let parsed = parse_key(key);
        if parsed.shape != KeyShape::ActiveChunk {
            continue;
        }
        let Some(latest) = series.latest() else {
            continue;
        };
        let (Some(dimension), Some(coordinate)) = (parsed.dimension, parsed.coordinate) else {
            tracing::trace!(key, "skipping active chunk key without a coordinate");
            continue;
        };

        let block_key = format!(
            "{}.{}.chunk.{}.{}.block_entities",
            parsed.namespace, dimension, coordinate.x, coordinate.z
        );
        rows.push(ActiveChunk {
            dimension_label: dimension_label(&dimension),
            block_entities: snapshot.latest_value(&block_key).unwrap_or(0.0),
            dimension,
            coordinate,
            activity: latest.value,
        });
    }

    let ranked = top_n_by(rows, n, |c| c.activity);
    if ranked.is_empty() {
        return ViewState::no_data("no active chunk data");
    }
    ViewState::Ready(ranked)
}

/// Most common block entity types by latest count.
pub fn block_entity_types(snapshot: &MetricSnapshot, n: usize) -> ViewState<Vec<BlockEntityCount>> {
    let rows: Vec<BlockEntityCount> = snapshot
        .with_prefix(BLOCK_ENTITY_TYPES_PREFIX)
        .filter_map(|(key, series)| {
            let count = series.latest()?.value;
            let kind = parse_key(key).subtype?;
            (count > 0.0).then(|| BlockEntityCount {
                label: block_entity_label(&kind),
                kind,
                count,
            })
        })
        .collect();

    let ranked = top_n_by(rows, n, |b| b.count);
    if ranked.is_empty() {
        return ViewState::no_data("no block entity data");
    }
    ViewState::Ready(ranked)
}

/// Chunk load and unload rates over the selected range.
pub fn chunk_rates(
    snapshot: &MetricSnapshot,
    config: &ChunkConfig,
    range: TimeRange,
    now_ms: i64,
) -> ViewState<TrendChart> {
    let keys = [&config.load_rate_metric, &config.unload_rate_metric];
    let chart = TrendChart::new(trends(snapshot, &keys, range, now_ms));
    if chart.is_empty() {
        return ViewState::no_data("no chunk rate data in range");
    }
    ViewState::Ready(chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nf_common::MetricSeries;

    fn latest(v: f64) -> MetricSeries {
        MetricSeries::from_pairs(&[(0, 1.0), (1000, v)])
    }

    #[test]
    fn test_by_dimension_positive_only() {
        let snapshot = MetricSnapshot::new()
            .with_series("world.minecraft.overworld.chunks.loaded", latest(400.0))
            .with_series("world.minecraft.the_end.chunks.loaded", latest(0.0));
        let rows = chunks_by_dimension(&snapshot);
        let rows = rows.data().expect("ready");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "Overworld");
        assert_eq!(rows[0].loaded, 400.0);
    }

    #[test]
    fn test_active_chunks_join_block_entities() {
        let snapshot = MetricSnapshot::new()
            .with_series("world.minecraft.overworld.active_chunk.3.-4", latest(2.5))
            .with_series("world.minecraft.overworld.active_chunk.0.0", latest(9.0))
            .with_series("world.minecraft.overworld.active_chunk.a.0", latest(50.0))
            .with_series("world.minecraft.overworld.chunk.3.-4.block_entities", latest(17.0));
        let view = active_chunks(&snapshot, 15);
        let rows = view.data().expect("ready");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].coordinate, ChunkCoord { x: 0, z: 0 });
        assert_eq!(rows[0].block_entities, 0.0);
        assert_eq!(rows[1].coordinate, ChunkCoord { x: 3, z: -4 });
        assert_eq!(rows[1].block_entities, 17.0);
    }

    #[test]
    fn test_block_entity_labels() {
        let snapshot = MetricSnapshot::new()
            .with_series(
                "block_entities.types.net.minecraft.block.entity.MobSpawnerBlockEntity",
                latest(4.0),
            )
            .with_series("block_entities.types.minecraft:chest", latest(30.0));
        let view = block_entity_types(&snapshot, 10);
        let rows = view.data().expect("ready");
        assert_eq!(rows[0].label, "Chest");
        assert_eq!(rows[1].label, "Mob Spawner");
    }

    #[test]
    fn test_rates_need_data_in_range() {
        let snapshot = MetricSnapshot::new()
            .with_series("chunks.load_rate", MetricSeries::from_pairs(&[(0, 3.0)]));
        let cfg = ChunkConfig::default();
        assert!(!chunk_rates(&snapshot, &cfg, TimeRange::FiveMinutes, 10_000_000).is_ready());
        assert!(chunk_rates(&snapshot, &cfg, TimeRange::FiveMinutes, 1000).is_ready());
    }
}
