//! Compound metric key parsing.
//!
//! Metric keys are dot-separated identifiers whose positional segments carry
//! meaning. The recognized shapes, tried in priority order:
//!
//! | Shape | Example |
//! |-------|---------|
//! | chunks loaded | `world.minecraft.overworld.chunks.loaded` |
//! | active chunk | `world.minecraft.overworld.active_chunk.3.-4` |
//! | per-chunk metric | `world.minecraft.overworld.chunk.3.-4.block_entities` |
//! | chunk hotspot | `world.minecraft.overworld.hotspot.3.-4.minecraft.zombie` |
//! | entity type | `entities.types.minecraft.cow` |
//! | block entity type | `block_entities.types.minecraft.furnace` |
//! | plain | `server.tick_time` |
//!
//! Parsing never fails. A coordinate segment that is not a strict integer
//! leaves `coordinate` empty, and spatial views skip such keys.

use serde::{Deserialize, Serialize};

const ENTITY_TYPES_PREFIX: &str = "entities.types.";
const BLOCK_ENTITY_TYPES_PREFIX: &str = "block_entities.types.";
const CHUNKS_LOADED_SUFFIX: &str = ".chunks.loaded";

/// Which parsing rule matched a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyShape {
    ChunksLoaded,
    ActiveChunk,
    ChunkMetric,
    ChunkHotspot,
    EntityType,
    BlockEntityType,
    Plain,
}

/// Chunk coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.x, self.z)
    }
}

/// Structured view of a metric key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedKey {
    pub namespace: String,
    pub dimension: Option<String>,
    pub coordinate: Option<ChunkCoord>,
    pub subtype: Option<String>,
    pub shape: KeyShape,
}

impl ParsedKey {
    fn plain(namespace: &str, shape: KeyShape) -> Self {
        Self {
            namespace: namespace.to_string(),
            dimension: None,
            coordinate: None,
            subtype: None,
            shape,
        }
    }

    /// Subtype with dots turned into namespace colons (`minecraft.cow` -> `minecraft:cow`).
    pub fn subtype_namespaced(&self) -> Option<String> {
        self.subtype.as_deref().map(|s| s.replace('.', ":"))
    }

    /// Final path segment of the subtype (`minecraft.cow` -> `cow`).
    pub fn subtype_token(&self) -> Option<&str> {
        self.subtype
            .as_deref()
            .and_then(|s| s.rsplit(['.', ':']).next())
    }

    /// True when the key addresses a chunk and its coordinate parsed.
    pub fn is_spatial(&self) -> bool {
        self.coordinate.is_some() && self.dimension.is_some()
    }
}

/// Parse a metric key into its structured parts.
pub fn parse_key(key: &str) -> ParsedKey {
    let parts: Vec<&str> = key.split('.').collect();
    let namespace = parts.first().copied().unwrap_or_default();

    if key.ends_with(CHUNKS_LOADED_SUFFIX) && parts.len() >= 5 {
        let mut parsed = ParsedKey::plain(namespace, KeyShape::ChunksLoaded);
        parsed.dimension = Some(dimension_of(&parts));
        return parsed;
    }

    if parts.len() >= 6 && parts[3] == "active_chunk" {
        let mut parsed = ParsedKey::plain(namespace, KeyShape::ActiveChunk);
        parsed.dimension = Some(dimension_of(&parts));
        parsed.coordinate = parse_coord(parts[4], parts[5]);
        return parsed;
    }

    if parts.len() >= 7 && matches!(parts[3], "chunk" | "hotspot") {
        let shape = if parts[3] == "chunk" {
            KeyShape::ChunkMetric
        } else {
            KeyShape::ChunkHotspot
        };
        let mut parsed = ParsedKey::plain(namespace, shape);
        parsed.dimension = Some(dimension_of(&parts));
        parsed.coordinate = parse_coord(parts[4], parts[5]);
        parsed.subtype = Some(parts[6..].join("."));
        return parsed;
    }

    for (prefix, shape) in [
        (ENTITY_TYPES_PREFIX, KeyShape::EntityType),
        (BLOCK_ENTITY_TYPES_PREFIX, KeyShape::BlockEntityType),
    ] {
        if let Some(rest) = key.strip_prefix(prefix) {
            if !rest.is_empty() {
                let mut parsed = ParsedKey::plain(namespace, shape);
                parsed.subtype = Some(rest.to_string());
                return parsed;
            }
        }
    }

    ParsedKey::plain(namespace, KeyShape::Plain)
}

fn dimension_of(parts: &[&str]) -> String {
    format!("{}.{}", parts[1], parts[2])
}

fn parse_coord(x: &str, z: &str) -> Option<ChunkCoord> {
    match (x.parse::<i32>(), z.parse::<i32>()) {
        (Ok(x), Ok(z)) => Some(ChunkCoord { x, z }),
        _ => None,
    }
}
