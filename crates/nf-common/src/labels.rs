//! Display labels for metric keys, dimensions and entity types.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

const BLOCK_ENTITY_PACKAGE: &str = "net.minecraft.block.entity.";

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `server.tick_time` -> `Server Tick Time`.
///
/// Splits on `_` as well as `.` and capitalizes every word, so multi-word
/// segments read as title case rather than `Server Tick time`.
pub fn metric_label(key: &str) -> String {
    key.split(['.', '_'])
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `minecraft.the_nether` -> `The nether`. Single-segment input is returned as is.
pub fn dimension_label(dimension: &str) -> String {
    let mut parts = dimension.split(['.', ':']);
    parts.next();
    match parts.next() {
        Some(name) => capitalize(&name.replace('_', " ")),
        None => dimension.to_string(),
    }
}

/// `minecraft:magma_cube` -> `Magma Cube`.
pub fn type_label(kind: &str) -> String {
    kind.rsplit(':')
        .next()
        .unwrap_or(kind)
        .split('_')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn uppercase_letter() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([A-Z])").ok()).as_ref()
}

/// Readable name for a raw block entity type string.
///
/// Handles the class-name form (`net.minecraft.block.entity.MobSpawnerBlockEntity`
/// -> `Mob Spawner`), the identity-hash form (`BlockEntityType@1a2b3c` ->
/// `Entity-1a2b`), the namespaced form and the dotted form.
pub fn block_entity_label(raw: &str) -> String {
    if raw.contains(BLOCK_ENTITY_PACKAGE) {
        let class = raw.rsplit('.').next().unwrap_or(raw);
        let class = class.strip_suffix("BlockEntity").unwrap_or(class);
        return match uppercase_letter() {
            Some(re) => re.replace_all(class, " $1").trim().to_string(),
            None => class.to_string(),
        };
    }

    if let Some((head, tail)) = raw.split_once('@') {
        let name = head.replace("BlockEntityType", "");
        if name.is_empty() {
            let short: String = tail.chars().take(4).collect();
            return format!("Entity-{}", short);
        }
        return name;
    }

    if raw.contains(':') {
        return type_label(raw);
    }

    type_label(raw.rsplit('.').next().unwrap_or(raw))
}

/// `HH:MM:SS` (UTC) for an epoch-millisecond timestamp.
pub fn clock_label(timestamp_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(timestamp_ms) {
        Some(dt) => dt.format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}
