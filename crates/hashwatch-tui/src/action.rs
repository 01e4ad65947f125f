//! All possible UI actions. Actions are the sole mechanism for state mutation.

use hashwatch_core::{DashboardSnapshot, ProxyConfig};

use crate::screen::ScreenId;

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    ToggleHelp,

    // ── Data (from the monitor's watch channel) ───────────────────
    SnapshotUpdated(DashboardSnapshot),

    // ── Monitor commands ──────────────────────────────────────────
    /// Trigger an immediate poll.
    Refresh,
    /// Flip the auto-refresh timer on/off.
    ToggleAutoRefresh,
    /// Replace the full connection configuration (Connect).
    ApplyConfig(ProxyConfig),
    /// Drop all debug-log entries.
    ClearLog,
}
