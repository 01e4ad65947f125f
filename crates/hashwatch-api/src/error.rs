use thiserror::Error;

/// Top-level error type for the `hashwatch-api` crate.
///
/// Covers every failure mode of a poll cycle: transport, HTTP status,
/// body deserialization, and worker-record validation.
/// `hashwatch-core` surfaces these verbatim in the dashboard error banner.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Access token cannot be sent as an HTTP header.
    #[error("Invalid access token: {0}")]
    InvalidToken(String),

    // ── Protocol ────────────────────────────────────────────────────
    /// Response received with a non-2xx status.
    #[error("Error fetching {endpoint}: HTTP {status}")]
    Status { endpoint: &'static str, status: u16 },

    /// Response body is not valid JSON for the expected shape.
    #[error("Failed to parse {endpoint} response: {message}")]
    Deserialization {
        endpoint: &'static str,
        message: String,
        body: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// A worker record had the wrong arity or a wrong element type.
    ///
    /// The wire format is a fixed 13-slot positional array; anything
    /// else is rejected here instead of being indexed blindly.
    #[error("Invalid worker record: {message}")]
    InvalidRecord { message: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying
    /// on the next scheduled poll.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status code, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
