// hashwatch-core: polling engine and shared dashboard state.
//
// The `Monitor` owns the connection configuration and the refresh timer,
// performs the two-step telemetry fetch, and publishes immutable state
// snapshots over a watch channel. Table sorting/filtering and the rolling
// hashrate window are pure models consumed by the front end.

pub mod config;
pub mod history;
pub mod log;
pub mod monitor;
pub mod state;
pub mod table;

pub use config::{ProxyConfig, RefreshInterval};
pub use history::{HashrateHistory, HistoryPoint};
pub use log::{DebugLog, LogEntry, LogLevel};
pub use monitor::Monitor;
pub use state::{DashboardSnapshot, DashboardState};
pub use table::{FilterSpec, SortDirection, SortSpec, WorkerColumn, WorkerView, worker_view};

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
