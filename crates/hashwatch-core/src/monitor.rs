// ── Monitor: poller, timer, and state owner ──
//
// Owns the connection configuration, the shared dashboard state, and the
// single periodic refresh task. Every poll runs as its own spawned task
// carrying a generation token: rescheduling aborts only the pending
// timer, never an in-flight fetch — a superseded fetch simply has its
// state applies discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use hashwatch_api::{ClientOptions, Error as ApiError, ProxyClient};

use crate::config::{ProxyConfig, RefreshInterval};
use crate::log::LogLevel;
use crate::now_ms;
use crate::state::{DashboardSnapshot, DashboardState};

/// The polling engine. Cheaply cloneable; all clones share one state
/// document and one refresh schedule.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    config: Mutex<ProxyConfig>,
    state: Mutex<DashboardState>,
    snapshot_tx: watch::Sender<DashboardSnapshot>,
    /// Claimed by each poll; applies from older generations are dropped.
    generation: AtomicU64,
    /// The single named periodic task. Replaced wholesale on reschedule.
    timer: Mutex<Option<JoinHandle<()>>>,
    cancel: CancellationToken,
}

impl Monitor {
    pub fn new(config: ProxyConfig) -> Self {
        let (snapshot_tx, _) = watch::channel(DashboardSnapshot::default());
        let monitor = Self {
            inner: Arc::new(MonitorInner {
                config: Mutex::new(config),
                state: Mutex::new(DashboardState::default()),
                snapshot_tx,
                generation: AtomicU64::new(0),
                timer: Mutex::new(None),
                cancel: CancellationToken::new(),
            }),
        };
        monitor
            .inner
            .apply_now(|state| state.log.push(LogLevel::Info, "Dashboard initialized"));
        monitor
    }

    /// Current configuration (cloned).
    pub fn config(&self) -> ProxyConfig {
        self.inner.config.lock().expect("config lock poisoned").clone()
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> DashboardSnapshot {
        self.inner.snapshot_tx.borrow().clone()
    }

    /// Subscribe to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.inner.snapshot_tx.subscribe()
    }

    /// Kick off the first poll and, if auto-refresh is enabled, the
    /// periodic schedule. Must run inside a tokio runtime.
    pub fn start(&self) {
        self.refresh_now();
        self.reschedule();
    }

    /// Trigger an immediate poll without touching the timer schedule.
    pub fn refresh_now(&self) {
        MonitorInner::spawn_poll(&self.inner);
    }

    /// Replace the whole configuration (Connect button): logs what
    /// changed, reschedules the timer, and polls immediately.
    pub fn apply_config(&self, new: ProxyConfig) {
        let old = {
            let mut config = self.inner.config.lock().expect("config lock poisoned");
            std::mem::replace(&mut *config, new.clone())
        };

        self.inner.apply_now(|state| {
            if old.api_url != new.api_url {
                state
                    .log
                    .push(LogLevel::Info, format!("API URL changed to: {}", new.api_url));
            }
            if old.has_token() != new.has_token() {
                let what = if new.has_token() { "set" } else { "cleared" };
                state.log.push(LogLevel::Info, format!("Access token {what}"));
            }
            if old.auto_refresh != new.auto_refresh {
                let what = if new.auto_refresh { "enabled" } else { "disabled" };
                state.log.push(LogLevel::Info, format!("Auto refresh {what}"));
            }
            if old.refresh_interval != new.refresh_interval {
                state.log.push(
                    LogLevel::Info,
                    format!(
                        "Refresh interval set to {} seconds",
                        new.refresh_interval.as_secs()
                    ),
                );
            }
        });

        self.reschedule();
        self.refresh_now();
    }

    /// Toggle auto-refresh, cancelling or (re)starting the schedule.
    pub fn set_auto_refresh(&self, enabled: bool) {
        {
            let mut config = self.inner.config.lock().expect("config lock poisoned");
            if config.auto_refresh == enabled {
                return;
            }
            config.auto_refresh = enabled;
        }
        let what = if enabled { "enabled" } else { "disabled" };
        self.inner
            .apply_now(|state| state.log.push(LogLevel::Info, format!("Auto refresh {what}")));
        self.reschedule();
    }

    /// Change the cadence; the pending scheduled tick is cancelled and a
    /// fresh schedule starts at the new interval.
    pub fn set_refresh_interval(&self, interval: RefreshInterval) {
        {
            let mut config = self.inner.config.lock().expect("config lock poisoned");
            if config.refresh_interval == interval {
                return;
            }
            config.refresh_interval = interval;
        }
        self.inner.apply_now(|state| {
            state.log.push(
                LogLevel::Info,
                format!("Refresh interval set to {} seconds", interval.as_secs()),
            );
        });
        self.reschedule();
    }

    /// Drop all debug-log entries.
    pub fn clear_log(&self) {
        self.inner.apply_now(|state| {
            state.log.clear();
            state.log.push(LogLevel::Info, "Debug logs cleared");
        });
    }

    /// Cancel the schedule and stop accepting poll results.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
        if let Some(handle) = self
            .inner
            .timer
            .lock()
            .expect("timer lock poisoned")
            .take()
        {
            handle.abort();
        }
        // Invalidate any in-flight poll's applies.
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        debug!("monitor shut down");
    }

    /// Abort the pending timer task and schedule a new one when
    /// auto-refresh is on. In-flight polls are never cancelled.
    fn reschedule(&self) {
        let mut timer = self.inner.timer.lock().expect("timer lock poisoned");
        if let Some(handle) = timer.take() {
            handle.abort();
        }

        let (auto_refresh, interval) = {
            let config = self.inner.config.lock().expect("config lock poisoned");
            (config.auto_refresh, config.refresh_interval)
        };
        if !auto_refresh {
            return;
        }

        let inner = Arc::clone(&self.inner);
        let secs = interval.as_secs();
        *timer = Some(tokio::spawn(async move {
            let mut tick =
                tokio::time::interval(std::time::Duration::from_secs(secs));
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            tick.tick().await; // consume the immediate first tick

            loop {
                tokio::select! {
                    biased;
                    () = inner.cancel.cancelled() => break,
                    _ = tick.tick() => MonitorInner::spawn_poll(&inner),
                }
            }
        }));

        self.inner.apply_now(|state| {
            state.log.push(
                LogLevel::Info,
                format!("Auto refresh scheduled every {secs} seconds"),
            );
        });
    }
}

impl MonitorInner {
    /// Mutate state and publish a fresh snapshot, but only if `generation`
    /// is still the newest poll. Lock is never held across an await.
    fn apply(&self, generation: u64, f: impl FnOnce(&mut DashboardState)) {
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "dropping state apply from superseded poll");
            return;
        }
        self.apply_now(f);
    }

    /// Mutate state unconditionally (user-driven mutations).
    fn apply_now(&self, f: impl FnOnce(&mut DashboardState)) {
        let snapshot = {
            let mut state = self.state.lock().expect("state lock poisoned");
            f(&mut state);
            state.snapshot()
        };
        let _ = self.snapshot_tx.send(snapshot);
    }

    /// Claim a generation and run one poll cycle as its own task.
    fn spawn_poll(inner: &Arc<Self>) {
        if inner.cancel.is_cancelled() {
            return;
        }
        let generation = inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = Arc::clone(inner);
        tokio::spawn(async move {
            run_poll(&inner, generation).await;
        });
    }
}

/// One full poll cycle: summary, then workers, with the loading flag
/// cleared on every exit path.
async fn run_poll(inner: &Arc<MonitorInner>, generation: u64) {
    let config = inner.config.lock().expect("config lock poisoned").clone();

    inner.apply(generation, |state| {
        state.loading = true;
        state.log.push(
            LogLevel::Info,
            format!("Fetching proxy data from: {}", config.api_url),
        );
    });

    if let Err(e) = poll_cycle(inner, generation, &config).await {
        warn!(error = %e, "poll cycle failed");
        inner.apply(generation, |state| {
            state.log.push(LogLevel::Error, format!("Error: {e}"));
            state.error = Some(e.to_string());
        });
    }

    // Finally-equivalent: runs on success and on every error path.
    inner.apply(generation, |state| state.loading = false);
}

/// The two sequential fetches. The workers fetch is only attempted once
/// the summary fully succeeds; the summary is applied as soon as it
/// lands, so a workers failure leaves the fresh summary alongside the
/// previous worker list ("last known good" per endpoint).
async fn poll_cycle(
    inner: &Arc<MonitorInner>,
    generation: u64,
    config: &ProxyConfig,
) -> Result<(), ApiError> {
    let options = ClientOptions {
        timeout: config.timeout,
    };
    let client = ProxyClient::new(&config.api_url, config.access_token.as_ref(), &options)?;

    let summary = client.summary().await?;
    let now = now_ms();
    let hashrate_1m = summary.hashrate.one_minute();
    inner.apply(generation, |state| {
        state
            .log
            .push(LogLevel::Success, "Successfully parsed proxy data JSON");
        state.history.record(now, hashrate_1m);
        state.summary = Some(Arc::new(summary));
    });

    let workers = client.workers().await?;
    inner.apply(generation, |state| {
        state
            .log
            .push(LogLevel::Success, "Successfully parsed workers data JSON");
        state.workers = Some(Arc::new(workers.workers));
        state.error = None;
        state.last_success = Some(now_ms());
        state.log.push(
            LogLevel::Success,
            "Connection successful! All data fetched and parsed.",
        );
    });

    Ok(())
}
