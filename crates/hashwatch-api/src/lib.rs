// hashwatch-api: Async Rust client for the mining-proxy telemetry API

pub mod client;
pub mod error;
pub mod types;

pub use client::{ClientOptions, ProxyClient};
pub use error::Error;
pub use types::{
    ACTIVE_WINDOW_MS, HashrateWindows, MinerCounts, ProxySummary, ResultStats, WorkerRecord,
    WorkersSnapshot,
};
