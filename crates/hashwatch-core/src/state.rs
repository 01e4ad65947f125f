// ── Shared dashboard state ──
//
// One mutable document owned by the Monitor; consumers only ever see
// immutable `DashboardSnapshot` values published over a watch channel.

use std::sync::Arc;

use hashwatch_api::{ProxySummary, WorkerRecord};

use crate::history::{HashrateHistory, HistoryPoint};
use crate::log::{DebugLog, LogEntry};

/// The single source of truth, mutated only through [`Monitor`]'s apply
/// funnel.
///
/// [`Monitor`]: crate::Monitor
#[derive(Debug, Default)]
pub struct DashboardState {
    /// Last successfully fetched summary; errors never clear it.
    pub summary: Option<Arc<ProxySummary>>,
    /// Last successfully fetched worker list; errors never clear it.
    pub workers: Option<Arc<Vec<WorkerRecord>>>,
    /// A poll cycle is in flight.
    pub loading: bool,
    /// Most recent poll failure, displayed alongside stale data.
    pub error: Option<String>,
    /// Epoch ms of the last fully successful cycle.
    pub last_success: Option<i64>,
    pub history: HashrateHistory,
    pub log: DebugLog,
}

impl DashboardState {
    /// Cheap immutable copy for publication: `Arc`s are shared and the
    /// bounded buffers are small.
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            summary: self.summary.clone(),
            workers: self.workers.clone(),
            loading: self.loading,
            error: self.error.clone(),
            last_success: self.last_success,
            history: self.history.to_vec(),
            log: self.log.to_vec(),
        }
    }
}

/// Immutable view of the dashboard state at one instant.
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    pub summary: Option<Arc<ProxySummary>>,
    pub workers: Option<Arc<Vec<WorkerRecord>>>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_success: Option<i64>,
    /// Rolling hashrate samples, oldest first.
    pub history: Vec<HistoryPoint>,
    /// Debug log entries, newest first.
    pub log: Vec<LogEntry>,
}

impl DashboardSnapshot {
    /// Whether any telemetry has ever been fetched.
    pub fn has_data(&self) -> bool {
        self.summary.is_some()
    }
}
