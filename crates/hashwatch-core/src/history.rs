// ── Rolling hashrate window ──
//
// Bounded buffer of (timestamp, 1m-hashrate) samples feeding the chart
// screen. Sampling is throttled: polls arriving faster than the sample
// interval do not produce new points.

use std::collections::VecDeque;

/// Minimum wall-clock gap between recorded samples.
pub const SAMPLE_INTERVAL_MS: i64 = 30_000;

/// Maximum number of retained samples.
pub const MAX_POINTS: usize = 20;

/// One recorded sample of the proxy-wide 1-minute hashrate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryPoint {
    pub timestamp_ms: i64,
    /// Hashes per second over the 1-minute window at that instant.
    pub hashrate: f64,
}

/// Append-only rolling window with FIFO eviction.
#[derive(Debug, Clone, Default)]
pub struct HashrateHistory {
    points: VecDeque<HistoryPoint>,
    last_update: Option<i64>,
}

impl HashrateHistory {
    /// Record a sample, unless one was recorded less than
    /// [`SAMPLE_INTERVAL_MS`] ago.
    ///
    /// Appends grow the buffer by at most one point per call, so a single
    /// eviction keeps the [`MAX_POINTS`] bound.
    pub fn record(&mut self, now_ms: i64, hashrate: f64) {
        if let Some(last) = self.last_update {
            if now_ms - last < SAMPLE_INTERVAL_MS {
                return;
            }
        }

        self.points.push_back(HistoryPoint {
            timestamp_ms: now_ms,
            hashrate,
        });
        self.last_update = Some(now_ms);

        if self.points.len() > MAX_POINTS {
            self.points.pop_front();
        }
    }

    /// Samples in chronological order.
    pub fn points(&self) -> impl Iterator<Item = &HistoryPoint> {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<HistoryPoint> {
        self.points.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let mut history = HashrateHistory::default();
        for i in 0..25_i32 {
            history.record(i64::from(i) * SAMPLE_INTERVAL_MS, f64::from(i));
        }
        assert_eq!(history.len(), MAX_POINTS);
        // Oldest five evicted; remainder keeps original order.
        let values: Vec<f64> = history.points().map(|p| p.hashrate).collect();
        let expected: Vec<f64> = (5..25).map(f64::from).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn throttles_samples_within_interval() {
        let mut history = HashrateHistory::default();
        history.record(0, 100.0);
        history.record(SAMPLE_INTERVAL_MS - 1, 200.0);
        assert_eq!(history.len(), 1);
        history.record(SAMPLE_INTERVAL_MS, 300.0);
        assert_eq!(history.len(), 2);
        let values: Vec<f64> = history.points().map(|p| p.hashrate).collect();
        assert_eq!(values, vec![100.0, 300.0]);
    }

    #[test]
    fn first_sample_always_recorded() {
        let mut history = HashrateHistory::default();
        history.record(1_700_000_000_000, 42.0);
        assert_eq!(history.len(), 1);
    }
}
