use thiserror::Error;

/// Failure modes surfaced by the transport, the resolver and the reader.
///
/// The taxonomy is flat on purpose: callers branch on the kind with a single
/// `match`, without walking a source chain. A failed call returns only an
/// `Error`, never partial data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Geocoding returned zero results for the given name/country.
    ///
    /// This is an expected outcome, not a transport fault: callers can
    /// recover by retrying with a different spelling.
    #[error("location not found: {city}, {country}")]
    LocationNotFound { city: String, country: String },

    /// The payload was not parseable JSON, or a structurally required field
    /// (e.g. coordinates on a geocoding result) was missing.
    #[error("invalid response from {url}: {message}")]
    InvalidResponse { message: String, url: String },

    /// The per-attempt deadline was exceeded on every attempt.
    #[error("request timed out: {url}")]
    RequestTimeout { url: String },

    /// Transport-level failure to reach the endpoint (DNS, refused
    /// connection, ...) on every attempt.
    #[error("connection failed: {message} ({url})")]
    ConnectionFailed { message: String, url: String },

    /// A non-retryable HTTP status, or a retryable status that persisted
    /// after retries were exhausted.
    #[error("request failed with status {status}: {url}")]
    Http { status: u16, url: String },
}

impl Error {
    /// HTTP status code, when the failure carries one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The request URL that failed, when the failure is tied to one.
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::LocationNotFound { .. } => None,
            Error::InvalidResponse { url, .. }
            | Error::RequestTimeout { url }
            | Error::ConnectionFailed { url, .. }
            | Error::Http { url, .. } => Some(url),
        }
    }
}
