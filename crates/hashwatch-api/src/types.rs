// Wire types for the proxy telemetry API.
//
// `/1/summary` is a plain JSON object. `/1/workers` returns each worker as
// a fixed 13-slot positional array; `WorkerRecord` keeps named fields
// internally and handles the positional layout at the serde boundary.

use std::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Connected-miner counts from the summary endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinerCounts {
    pub now: u64,
    pub max: u64,
}

/// Share-result counters from the summary endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultStats {
    pub accepted: u64,
    pub rejected: u64,
    pub invalid: u64,
    /// Average share round-trip in milliseconds.
    pub avg_time: f64,
    /// Upstream latency in milliseconds.
    pub latency: f64,
    pub hashes_total: u64,
}

/// Total-hashrate samples for the five fixed windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashrateWindows {
    /// Samples for [1m, 10m, 1h, 12h, 24h], in hashes/second.
    pub total: [f64; 5],
}

impl HashrateWindows {
    pub fn one_minute(&self) -> f64 {
        self.total[0]
    }

    /// Mean of the five window samples.
    pub fn average(&self) -> f64 {
        self.total.iter().sum::<f64>() / 5.0
    }

    /// The highest window sample.
    pub fn peak(&self) -> f64 {
        self.total.iter().copied().fold(0.0, f64::max)
    }
}

/// Immutable snapshot of one successful `/1/summary` fetch.
///
/// Replaced wholesale on each poll; never partially merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxySummary {
    pub id: String,
    pub worker_id: String,
    pub version: String,
    /// Proxy uptime in seconds.
    pub uptime: u64,
    pub miners: MinerCounts,
    pub upstreams: u64,
    pub results: ResultStats,
    pub hashrate: HashrateWindows,
}

/// One worker tracked by the proxy.
///
/// Wire layout is positional: `[name, ip, connections, accepted, rejected,
/// invalid, hashes_total, last_seen_ms, h1m, h10m, h1h, h12h, h24h]`.
/// Slot order is a wire-contract invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerRecord {
    pub name: String,
    pub ip: String,
    pub connections: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub invalid: u64,
    pub hashes_total: u64,
    /// Last share submission, epoch milliseconds. 0 means never seen.
    pub last_seen_ms: i64,
    pub hashrate_1m: f64,
    pub hashrate_10m: f64,
    pub hashrate_1h: f64,
    pub hashrate_12h: f64,
    pub hashrate_24h: f64,
}

/// Number of slots in a wire worker record.
const WORKER_ARITY: usize = 13;

/// Activity window: a worker is active if seen within the last 10 minutes.
pub const ACTIVE_WINDOW_MS: i64 = 600_000;

impl WorkerRecord {
    /// Whether this worker has submitted within the activity window.
    ///
    /// A worker is active iff it was last seen at most 10 minutes before
    /// `now_ms`. The threshold is fixed.
    pub fn is_active(&self, now_ms: i64) -> bool {
        self.last_seen_ms >= now_ms - ACTIVE_WINDOW_MS
    }
}

impl<'de> Deserialize<'de> for WorkerRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = WorkerRecord;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a worker record array with {WORKER_ARITY} elements")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<WorkerRecord, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut slot = 0usize;

                // Pulls the next slot or fails with the arity seen so far.
                macro_rules! take {
                    () => {{
                        let value = seq
                            .next_element()?
                            .ok_or_else(|| de::Error::invalid_length(slot, &self))?;
                        slot += 1;
                        value
                    }};
                }

                let record = WorkerRecord {
                    name: take!(),
                    ip: take!(),
                    connections: take!(),
                    accepted: take!(),
                    rejected: take!(),
                    invalid: take!(),
                    hashes_total: take!(),
                    last_seen_ms: take!(),
                    hashrate_1m: take!(),
                    hashrate_10m: take!(),
                    hashrate_1h: take!(),
                    hashrate_12h: take!(),
                    hashrate_24h: take!(),
                };

                // Trailing elements are a contract violation too.
                if seq.next_element::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(slot + 1, &self));
                }

                Ok(record)
            }
        }

        deserializer.deserialize_seq(RecordVisitor)
    }
}

impl Serialize for WorkerRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tup = serializer.serialize_tuple(WORKER_ARITY)?;
        tup.serialize_element(&self.name)?;
        tup.serialize_element(&self.ip)?;
        tup.serialize_element(&self.connections)?;
        tup.serialize_element(&self.accepted)?;
        tup.serialize_element(&self.rejected)?;
        tup.serialize_element(&self.invalid)?;
        tup.serialize_element(&self.hashes_total)?;
        tup.serialize_element(&self.last_seen_ms)?;
        tup.serialize_element(&self.hashrate_1m)?;
        tup.serialize_element(&self.hashrate_10m)?;
        tup.serialize_element(&self.hashrate_1h)?;
        tup.serialize_element(&self.hashrate_12h)?;
        tup.serialize_element(&self.hashrate_24h)?;
        tup.end()
    }
}

/// Ordered worker list from `/1/workers`, replaced wholesale per poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkersSnapshot {
    pub workers: Vec<WorkerRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_json() -> serde_json::Value {
        json!([
            "rig-01", "10.0.0.5", 2, 150, 3, 1, 4_200_000,
            1_700_000_000_000_i64, 1500.0, 1480.5, 1470.0, 1400.0, 1390.0
        ])
    }

    #[test]
    fn worker_record_decodes_positionally() {
        let record: WorkerRecord = serde_json::from_value(record_json()).expect("decode");
        assert_eq!(record.name, "rig-01");
        assert_eq!(record.ip, "10.0.0.5");
        assert_eq!(record.connections, 2);
        assert_eq!(record.hashes_total, 4_200_000);
        assert_eq!(record.last_seen_ms, 1_700_000_000_000);
        assert!((record.hashrate_1m - 1500.0).abs() < f64::EPSILON);
        assert!((record.hashrate_24h - 1390.0).abs() < f64::EPSILON);
    }

    #[test]
    fn worker_record_round_trips_as_array() {
        let record: WorkerRecord = serde_json::from_value(record_json()).expect("decode");
        let encoded = serde_json::to_value(&record).expect("encode");
        assert_eq!(encoded, record_json());
    }

    #[test]
    fn worker_record_rejects_short_arity() {
        let short = json!(["rig-01", "10.0.0.5", 2]);
        let err = serde_json::from_value::<WorkerRecord>(short).expect_err("must fail");
        assert!(err.to_string().contains("13"), "error was: {err}");
    }

    #[test]
    fn worker_record_rejects_trailing_elements() {
        let mut long = record_json();
        long.as_array_mut().expect("array").push(json!(0));
        assert!(serde_json::from_value::<WorkerRecord>(long).is_err());
    }

    #[test]
    fn worker_record_rejects_wrong_element_type() {
        let mut bad = record_json();
        bad.as_array_mut().expect("array")[2] = json!("two");
        assert!(serde_json::from_value::<WorkerRecord>(bad).is_err());
    }

    #[test]
    fn summary_decodes_fixed_hashrate_windows() {
        let body = json!({
            "id": "proxy-1",
            "worker_id": "w-main",
            "version": "0.9.2",
            "uptime": 86_461,
            "miners": { "now": 4, "max": 64 },
            "upstreams": 2,
            "results": {
                "accepted": 1200, "rejected": 8, "invalid": 1,
                "avg_time": 42.5, "latency": 18.0, "hashes_total": 9_000_000
            },
            "hashrate": { "total": [2_500_000.0, 2_400_000.0, 2_300_000.0, 2_200_000.0, 2_100_000.0] }
        });
        let summary: ProxySummary = serde_json::from_value(body).expect("decode");
        assert_eq!(summary.miners.now, 4);
        assert!((summary.hashrate.one_minute() - 2_500_000.0).abs() < f64::EPSILON);
        assert!((summary.hashrate.peak() - 2_500_000.0).abs() < f64::EPSILON);
        assert!((summary.hashrate.average() - 2_300_000.0).abs() < 1e-6);
    }

    #[test]
    fn summary_rejects_wrong_window_count() {
        let body = json!({
            "id": "p", "worker_id": "w", "version": "1", "uptime": 1,
            "miners": { "now": 0, "max": 0 }, "upstreams": 0,
            "results": {
                "accepted": 0, "rejected": 0, "invalid": 0,
                "avg_time": 0.0, "latency": 0.0, "hashes_total": 0
            },
            "hashrate": { "total": [1.0, 2.0, 3.0] }
        });
        assert!(serde_json::from_value::<ProxySummary>(body).is_err());
    }

    #[test]
    fn activity_threshold_is_ten_minutes() {
        let mut record: WorkerRecord = serde_json::from_value(record_json()).expect("decode");
        let now = 1_700_000_600_000_i64;
        record.last_seen_ms = now - 600_000;
        assert!(record.is_active(now));
        record.last_seen_ms = now - 600_001;
        assert!(!record.is_active(now));
    }
}
