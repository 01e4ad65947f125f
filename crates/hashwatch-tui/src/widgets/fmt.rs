//! Human-readable formatting helpers for proxy telemetry.

/// Format a hashrate in hashes/second (e.g., "853.41 KH/s", "1.53 MH/s").
///
/// Always two decimals. NaN renders as zero.
pub fn hashrate(hs: f64) -> String {
    let hs = if hs.is_nan() { 0.0 } else { hs };
    if hs >= 1_000_000.0 {
        format!("{:.2} MH/s", hs / 1_000_000.0)
    } else if hs >= 1_000.0 {
        format!("{:.2} KH/s", hs / 1_000.0)
    } else {
        format!("{hs:.2} H/s")
    }
}

/// Format seconds into a compact duration (e.g., "2d 4h 11m", "4h 11m 5s",
/// "11m 5s", "5s").
pub fn timespan(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Format a last-seen timestamp (epoch ms) relative to `now_ms`.
/// A zero timestamp means the worker was never seen.
pub fn last_seen(ts_ms: i64, now_ms: i64) -> String {
    if ts_ms == 0 {
        return "N/A".into();
    }
    let elapsed_secs = (now_ms - ts_ms).max(0) / 1_000;
    #[allow(clippy::cast_sign_loss, clippy::as_conversions)]
    let elapsed = elapsed_secs as u64;
    format!("{} ago", timespan(elapsed))
}

/// Format a counter with thousands separators (e.g., "981,264,000").
pub fn count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hashrate_unit_boundaries() {
        assert_eq!(hashrate(0.0), "0.00 H/s");
        assert_eq!(hashrate(999.99), "999.99 H/s");
        assert_eq!(hashrate(1_000.0), "1.00 KH/s");
        assert_eq!(hashrate(853_410.0), "853.41 KH/s");
        assert_eq!(hashrate(1_530_000.0), "1.53 MH/s");
        assert_eq!(hashrate(f64::NAN), "0.00 H/s");
    }

    #[test]
    fn timespan_precedence() {
        assert_eq!(timespan(0), "0s");
        assert_eq!(timespan(5), "5s");
        assert_eq!(timespan(65), "1m 5s");
        assert_eq!(timespan(3_605), "1h 0m 5s");
        assert_eq!(timespan(90_061), "1d 1h 1m");
    }

    #[test]
    fn last_seen_relative() {
        assert_eq!(last_seen(0, 1_000_000), "N/A");
        assert_eq!(last_seen(1_000_000, 1_065_000), "1m 5s ago");
        // Clock skew: a future timestamp clamps to zero elapsed.
        assert_eq!(last_seen(2_000_000, 1_000_000), "0s ago");
    }

    #[test]
    fn count_thousands_separators() {
        assert_eq!(count(0), "0");
        assert_eq!(count(999), "999");
        assert_eq!(count(1_000), "1,000");
        assert_eq!(count(981_264_000), "981,264,000");
    }
}
