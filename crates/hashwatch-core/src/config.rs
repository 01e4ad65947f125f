// ── Runtime connection configuration ──
//
// Describes *how* to reach the proxy API. Carries the credential and
// refresh tuning, but never touches disk — the TUI constructs a
// `ProxyConfig` from CLI flags and mutates it through the settings screen.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

/// Auto-refresh cadence. Only these four values are offered to the
/// operator, matching the proxy's own sampling granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshInterval {
    Secs10,
    #[default]
    Secs30,
    Secs60,
    Secs300,
}

impl RefreshInterval {
    /// All intervals in cycling order.
    pub const ALL: [RefreshInterval; 4] =
        [Self::Secs10, Self::Secs30, Self::Secs60, Self::Secs300];

    pub fn as_secs(self) -> u64 {
        match self {
            Self::Secs10 => 10,
            Self::Secs30 => 30,
            Self::Secs60 => 60,
            Self::Secs300 => 300,
        }
    }

    pub fn from_secs(secs: u64) -> Option<Self> {
        match secs {
            10 => Some(Self::Secs10),
            30 => Some(Self::Secs30),
            60 => Some(Self::Secs60),
            300 => Some(Self::Secs300),
            _ => None,
        }
    }

    /// Label for the settings screen.
    pub fn label(self) -> &'static str {
        match self {
            Self::Secs10 => "10 sec",
            Self::Secs30 => "30 sec",
            Self::Secs60 => "1 min",
            Self::Secs300 => "5 min",
        }
    }

    /// Next interval in cycling order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&i| i == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for RefreshInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RefreshInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let secs: u64 = s
            .parse()
            .map_err(|_| format!("invalid interval: {s:?}"))?;
        Self::from_secs(secs)
            .ok_or_else(|| format!("interval must be one of 10, 30, 60, 300 (got {secs})"))
    }
}

/// Configuration for connecting to a single proxy.
///
/// Mutated only by explicit user input; the monitor reads it before
/// every fetch cycle.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// API base URL as entered by the operator. Kept as raw text so a
    /// half-typed URL surfaces as a poll error rather than being
    /// rejected at the input box.
    pub api_url: String,
    /// Optional bearer credential, forwarded but never validated here.
    pub access_token: Option<SecretString>,
    pub auto_refresh: bool,
    pub refresh_interval: RefreshInterval,
    /// HTTP request timeout.
    pub timeout: Duration,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:4333".into(),
            access_token: None,
            auto_refresh: true,
            refresh_interval: RefreshInterval::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ProxyConfig {
    /// Whether a non-empty token is configured.
    pub fn has_token(&self) -> bool {
        self.access_token.is_some()
    }
}
