//! End-to-end monitor tests against a mock proxy API.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::watch;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hashwatch_core::{DashboardSnapshot, LogLevel, Monitor, ProxyConfig, RefreshInterval};

fn summary_body(uptime: u64) -> serde_json::Value {
    json!({
        "id": "proxy-1",
        "worker_id": "proxy",
        "version": "6.21.1",
        "uptime": uptime,
        "miners": { "now": 3, "max": 5 },
        "upstreams": 1,
        "results": {
            "accepted": 1200,
            "rejected": 4,
            "invalid": 0,
            "avg_time": 12.5,
            "latency": 45.0,
            "hashes_total": 981_264_000u64,
        },
        "hashrate": { "total": [1530.0, 1498.2, 1501.7, 1490.0, 1485.5] },
    })
}

fn workers_body() -> serde_json::Value {
    json!({
        "workers": [
            ["rig-a", "10.0.0.5", 2, 800, 2, 0, 654_000_000u64,
             1_700_000_000_000i64, 1020.0, 1015.0, 1010.0, 1000.0, 995.0],
            ["rig-b", "10.0.0.6", 1, 400, 2, 0, 327_264_000u64,
             1_700_000_000_000i64, 510.0, 505.0, 500.0, 495.0, 490.0],
        ],
    })
}

/// Monitor with auto-refresh off so tests drive each poll explicitly.
fn monitor_for(server: &MockServer) -> Monitor {
    Monitor::new(ProxyConfig {
        api_url: server.uri(),
        auto_refresh: false,
        ..ProxyConfig::default()
    })
}

/// Wait (bounded) until the published snapshot satisfies `pred`.
async fn wait_for(
    rx: &mut watch::Receiver<DashboardSnapshot>,
    pred: impl Fn(&DashboardSnapshot) -> bool,
) -> DashboardSnapshot {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            {
                let snapshot = rx.borrow_and_update();
                if pred(&snapshot) {
                    return snapshot.clone();
                }
            }
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("snapshot condition not reached in time")
}

/// Wait (bounded) until the server has seen `n` summary requests.
async fn wait_for_summary_requests(server: &MockServer, n: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if summary_request_count(server).await >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("request count not reached in time");
}

async fn summary_request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == "/1/summary")
        .count()
}

#[tokio::test]
async fn successful_poll_populates_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(86_400)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/1/workers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(workers_body()))
        .mount(&server)
        .await;

    let monitor = monitor_for(&server);
    let mut rx = monitor.subscribe();
    monitor.refresh_now();

    let snapshot = wait_for(&mut rx, |s| s.last_success.is_some() && !s.loading).await;
    let summary = snapshot.summary.as_ref().unwrap();
    assert_eq!(summary.uptime, 86_400);
    assert_eq!(summary.miners.now, 3);
    assert_eq!(snapshot.workers.as_ref().unwrap().len(), 2);
    assert_eq!(snapshot.error, None);
    // The 1m hashrate sample is recorded once per successful poll.
    assert_eq!(snapshot.history.len(), 1);
    assert!((snapshot.history[0].hashrate - 1530.0).abs() < f64::EPSILON);
    assert!(
        snapshot
            .log
            .iter()
            .any(|e| e.level == LogLevel::Success && e.message.contains("All data fetched"))
    );

    monitor.shutdown();
}

#[tokio::test]
async fn summary_failure_keeps_last_known_good() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(100)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/1/workers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(workers_body()))
        .mount(&server)
        .await;
    // Every summary request after the first fails.
    Mock::given(method("GET"))
        .and(path("/1/summary"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let monitor = monitor_for(&server);
    let mut rx = monitor.subscribe();

    monitor.refresh_now();
    wait_for(&mut rx, |s| s.last_success.is_some() && !s.loading).await;

    monitor.refresh_now();
    let snapshot = wait_for(&mut rx, |s| s.error.is_some() && !s.loading).await;

    // Stale data stays on screen alongside the error banner.
    assert_eq!(snapshot.summary.as_ref().unwrap().uptime, 100);
    assert_eq!(snapshot.workers.as_ref().unwrap().len(), 2);
    assert!(snapshot.error.as_ref().unwrap().contains("summary"));

    monitor.shutdown();
}

#[tokio::test]
async fn workers_failure_still_applies_fresh_summary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(100)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/1/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(200)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/1/workers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(workers_body()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/1/workers"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let monitor = monitor_for(&server);
    let mut rx = monitor.subscribe();

    monitor.refresh_now();
    wait_for(&mut rx, |s| s.last_success.is_some() && !s.loading).await;

    monitor.refresh_now();
    let snapshot = wait_for(&mut rx, |s| s.error.is_some() && !s.loading).await;

    // The summary lands before the workers fetch, so it reflects the new
    // poll even though the cycle as a whole failed.
    assert_eq!(snapshot.summary.as_ref().unwrap().uptime, 200);
    assert_eq!(snapshot.workers.as_ref().unwrap().len(), 2);
    assert_eq!(snapshot.history.len(), 1); // second sample throttled (<30s)

    monitor.shutdown();
}

#[tokio::test]
async fn malformed_worker_record_surfaces_as_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(100)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/1/workers"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "workers": [["rig-a", "10.0.0.5", 2]] })),
        )
        .mount(&server)
        .await;

    let monitor = monitor_for(&server);
    let mut rx = monitor.subscribe();
    monitor.refresh_now();

    let snapshot = wait_for(&mut rx, |s| s.error.is_some() && !s.loading).await;
    assert!(snapshot.error.as_ref().unwrap().contains("record 0"));
    assert_eq!(snapshot.workers, None);
    // The summary still applied before the workers fetch ran.
    assert!(snapshot.summary.is_some());

    monitor.shutdown();
}

#[tokio::test]
async fn clear_log_empties_entries() {
    let server = MockServer::start().await;
    let monitor = monitor_for(&server);

    monitor.clear_log();
    let snapshot = monitor.snapshot();
    assert_eq!(snapshot.log.len(), 1);
    assert_eq!(snapshot.log[0].message, "Debug logs cleared");
}

#[tokio::test]
async fn interval_change_is_logged() {
    let server = MockServer::start().await;
    let monitor = monitor_for(&server);

    monitor.set_refresh_interval(RefreshInterval::Secs60);
    let snapshot = monitor.snapshot();
    assert!(
        snapshot
            .log
            .iter()
            .any(|e| e.message == "Refresh interval set to 60 seconds")
    );
    assert_eq!(monitor.config().refresh_interval.as_secs(), 60);
}

#[tokio::test]
async fn superseded_poll_never_overwrites_newer_state() {
    let server = MockServer::start().await;
    // The first poll gets a slow, stale summary; everything after is fast.
    Mock::given(method("GET"))
        .and(path("/1/summary"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(summary_body(100))
                .set_delay(Duration::from_millis(600)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/1/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(200)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/1/workers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(workers_body()))
        .mount(&server)
        .await;

    let monitor = monitor_for(&server);
    let mut rx = monitor.subscribe();

    monitor.refresh_now();
    // Make sure the slow fetch is truly in flight before superseding it.
    wait_for_summary_requests(&server, 1).await;
    monitor.refresh_now();

    let snapshot = wait_for(&mut rx, |s| {
        s.summary.as_ref().is_some_and(|summary| summary.uptime == 200) && !s.loading
    })
    .await;
    assert_eq!(snapshot.error, None);

    // Let the delayed first response land, then confirm it was dropped.
    tokio::time::sleep(Duration::from_millis(800)).await;
    let snapshot = monitor.snapshot();
    assert_eq!(snapshot.summary.as_ref().unwrap().uptime, 200);
    assert_eq!(snapshot.history.len(), 1);
    assert_eq!(snapshot.error, None);

    monitor.shutdown();
}

#[tokio::test]
async fn interval_change_cancels_pending_tick() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(100)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/1/workers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(workers_body()))
        .mount(&server)
        .await;

    let monitor = Monitor::new(ProxyConfig {
        api_url: server.uri(),
        refresh_interval: RefreshInterval::Secs10,
        ..ProxyConfig::default()
    });
    let mut rx = monitor.subscribe();
    monitor.start();
    wait_for(&mut rx, |s| s.last_success.is_some() && !s.loading).await;
    assert_eq!(summary_request_count(&server).await, 1);

    // Swap before the 10s tick fires; the pending tick must die with the
    // old timer task, so no second poll arrives at the 10s mark.
    monitor.set_refresh_interval(RefreshInterval::Secs300);
    tokio::time::sleep(Duration::from_secs(11)).await;
    assert_eq!(summary_request_count(&server).await, 1);

    let snapshot = monitor.snapshot();
    assert!(
        snapshot
            .log
            .iter()
            .any(|e| e.message == "Auto refresh scheduled every 10 seconds")
    );
    assert!(
        snapshot
            .log
            .iter()
            .any(|e| e.message == "Auto refresh scheduled every 300 seconds")
    );

    monitor.shutdown();
}

#[tokio::test]
async fn reschedule_leaves_in_flight_poll_running() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/summary"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(summary_body(100))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/1/workers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(workers_body()))
        .mount(&server)
        .await;

    let monitor = Monitor::new(ProxyConfig {
        api_url: server.uri(),
        refresh_interval: RefreshInterval::Secs300,
        ..ProxyConfig::default()
    });
    let mut rx = monitor.subscribe();
    monitor.start();
    wait_for_summary_requests(&server, 1).await;

    // Rescheduling aborts the timer, not the fetch already in progress.
    monitor.set_refresh_interval(RefreshInterval::Secs60);

    let snapshot = wait_for(&mut rx, |s| s.last_success.is_some() && !s.loading).await;
    assert_eq!(snapshot.summary.as_ref().unwrap().uptime, 100);
    assert_eq!(snapshot.error, None);

    monitor.shutdown();
}
