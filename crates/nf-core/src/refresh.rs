//! Periodic snapshot refresh.
//!
//! Each tick fetches a snapshot from a [`SnapshotProvider`], swaps it into
//! the session and runs a pass. A failed fetch is logged and the pass runs
//! against the previous snapshot, so a flaky source degrades to stale data
//! rather than no data.

use crate::session::AnalyticsSession;
use crate::views::AnalyticsReport;
use chrono::Utc;
use nf_common::MetricSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAX_RECENT_EVENTS: usize = 100;

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

/// Source of metric snapshots.
pub trait SnapshotProvider {
    fn fetch(&mut self) -> nf_common::Result<MetricSnapshot>;

    /// Human-readable name for logs.
    fn describe(&self) -> String;
}

/// Reads the collector's JSON format from a file on every fetch.
#[derive(Debug, Clone)]
pub struct FileSnapshotProvider {
    path: PathBuf,
}

impl FileSnapshotProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotProvider for FileSnapshotProvider {
    fn fetch(&mut self) -> nf_common::Result<MetricSnapshot> {
        MetricSnapshot::from_file(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ---------------------------------------------------------------------------
// Loop state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshEventType {
    SnapshotLoaded,
    FetchFailed,
    PassCompleted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshEvent {
    pub timestamp: String,
    pub event_type: RefreshEventType,
    pub detail: String,
}

/// Running state of the refresh loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshState {
    pub started_at: String,
    pub tick_count: u64,
    pub fetch_failures: u64,
    pub consecutive_failures: u32,
    pub last_success_at: Option<String>,
    /// Recent events, oldest first.
    pub recent_events: VecDeque<RefreshEvent>,
}

impl Default for RefreshState {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshState {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now().to_rfc3339(),
            tick_count: 0,
            fetch_failures: 0,
            consecutive_failures: 0,
            last_success_at: None,
            recent_events: VecDeque::with_capacity(MAX_RECENT_EVENTS),
        }
    }

    pub fn record_event(&mut self, event_type: RefreshEventType, detail: &str) {
        if self.recent_events.len() >= MAX_RECENT_EVENTS {
            self.recent_events.pop_front();
        }
        self.recent_events.push_back(RefreshEvent {
            timestamp: Utc::now().to_rfc3339(),
            event_type,
            detail: detail.to_string(),
        });
    }
}

/// Outcome of one refresh tick.
#[derive(Debug, Clone, Serialize)]
pub struct TickOutcome {
    pub tick_number: u64,
    /// False when the pass ran on the previous snapshot.
    pub fresh: bool,
    pub error: Option<String>,
    pub report: AnalyticsReport,
}

// ---------------------------------------------------------------------------
// Core loop
// ---------------------------------------------------------------------------

/// Fetch, swap and analyze once.
pub fn process_tick<P: SnapshotProvider + ?Sized>(
    session: &mut AnalyticsSession,
    provider: &mut P,
    state: &mut RefreshState,
    now_ms: i64,
) -> TickOutcome {
    state.tick_count += 1;
    let tick_number = state.tick_count;

    let (fresh, error) = match provider.fetch() {
        Ok(snapshot) => {
            let detail = format!("{} series from {}", snapshot.len(), provider.describe());
            session.replace_snapshot(snapshot);
            state.consecutive_failures = 0;
            state.last_success_at = Some(Utc::now().to_rfc3339());
            state.record_event(RefreshEventType::SnapshotLoaded, &detail);
            (true, None)
        }
        Err(e) => {
            state.fetch_failures += 1;
            state.consecutive_failures += 1;
            tracing::warn!(
                source = %provider.describe(),
                error = %e,
                code = e.code(),
                consecutive = state.consecutive_failures,
                "snapshot fetch failed, keeping previous snapshot"
            );
            state.record_event(RefreshEventType::FetchFailed, &e.to_string());
            (false, Some(e.to_string()))
        }
    };

    let report = session.run_pass(now_ms);
    state.record_event(RefreshEventType::PassCompleted, &format!("tick {}", tick_number));

    TickOutcome {
        tick_number,
        fresh,
        error,
        report,
    }
}

/// Tick every `interval` until `max_ticks` is reached or `on_tick` returns false.
pub fn run_loop<P, F>(
    session: &mut AnalyticsSession,
    provider: &mut P,
    interval: Duration,
    max_ticks: Option<u64>,
    mut on_tick: F,
) -> RefreshState
where
    P: SnapshotProvider + ?Sized,
    F: FnMut(&TickOutcome) -> bool,
{
    let mut state = RefreshState::new();
    tracing::info!(
        source = %provider.describe(),
        interval_ms = interval.as_millis() as u64,
        "refresh loop started"
    );

    loop {
        let outcome = process_tick(session, provider, &mut state, Utc::now().timestamp_millis());
        let keep_going = on_tick(&outcome);
        if !keep_going || max_ticks.is_some_and(|max| state.tick_count >= max) {
            break;
        }
        std::thread::sleep(interval);
    }

    tracing::info!(
        ticks = state.tick_count,
        failures = state.fetch_failures,
        "refresh loop stopped"
    );
    state
}
