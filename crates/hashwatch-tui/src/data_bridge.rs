//! Data bridge — connects the monitor's watch channel to TUI actions.
//!
//! Runs as a background task: forwards every published dashboard snapshot
//! as an [`Action`] through the TUI's action channel.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use hashwatch_core::Monitor;

use crate::action::Action;

/// Forward snapshots from the [`Monitor`] until cancelled.
///
/// Sends the current snapshot immediately so screens have data (or at
/// least the initialized log) before the first poll completes.
pub async fn spawn_data_bridge(
    monitor: Monitor,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut rx = monitor.subscribe();

    let _ = action_tx.send(Action::SnapshotUpdated(rx.borrow_and_update().clone()));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                if action_tx.send(Action::SnapshotUpdated(snapshot)).is_err() {
                    break;
                }
            }
        }
    }

    debug!("data bridge shut down");
}
