use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;

use crate::error::Error;

/// Per-attempt deadline applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP statuses presumed transient: rate limiting and server overload.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Bounded retry with exponential backoff for idempotent GET requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; total attempts = `max_retries + 1`.
    pub max_retries: u32,
    /// Initial backoff delay; doubles with each subsequent retry.
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 3, backoff_base: Duration::from_secs(1) }
    }
}

impl RetryPolicy {
    /// Whether a failed HTTP status should be re-attempted.
    pub fn retries_status(&self, status: u16) -> bool {
        RETRYABLE_STATUSES.contains(&status)
    }

    /// Delay before retry number `retry` (0-based): `base * 2^retry`.
    pub fn delay(&self, retry: u32) -> Duration {
        self.backoff_base.saturating_mul(2u32.saturating_pow(retry))
    }
}

/// Status and body of a single completed HTTP exchange, before any
/// classification or parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Failure of a single attempt, below the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
    /// The per-attempt deadline elapsed.
    TimedOut,
    /// The endpoint could not be reached (DNS, refused connection, ...).
    Connection(String),
    /// Any other transport fault, e.g. the connection dropped mid-body.
    Other(String),
}

/// One HTTP GET attempt against a fully-built URL.
///
/// This is the seam between the retry loop and the wire: production code
/// uses [`ReqwestFetch`], tests substitute a scripted double.
#[async_trait]
pub trait HttpFetch: Send + Sync + Debug {
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<RawResponse, AttemptError>;
}

/// Production fetcher over a shared `reqwest` client.
///
/// The client keeps a connection pool across calls; that reuse is a
/// performance optimization, never something correctness relies on.
#[derive(Debug, Clone, Default)]
pub struct ReqwestFetch {
    client: reqwest::Client,
}

impl ReqwestFetch {
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetch {
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<RawResponse, AttemptError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    AttemptError::TimedOut
                } else if err.is_connect() {
                    AttemptError::Connection(err.to_string())
                } else {
                    AttemptError::Other(err.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| {
            if err.is_timeout() {
                AttemptError::TimedOut
            } else {
                AttemptError::Other(err.to_string())
            }
        })?;

        Ok(RawResponse { status, body })
    }
}

/// Request lifecycle notifications delivered to an optional observer.
///
/// The transport itself never logs or prints; diagnostic output is the
/// concern of whoever installs the hook.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// An attempt is about to go on the wire. `attempt` is 0-based.
    AttemptStarted { url: String, attempt: u32 },
    /// A response came back, whatever its status.
    ResponseReceived { url: String, status: u16 },
    /// A retryable failure was observed; the next attempt follows `delay`.
    RetryScheduled { url: String, next_attempt: u32, delay: Duration },
    /// The request is over and a terminal error was classified.
    FailureClassified { url: String, error: String },
}

pub type EventHook = Arc<dyn Fn(&TransportEvent) + Send + Sync>;

/// Executes single GET requests with enforced per-attempt timeout and
/// bounded automatic retry.
///
/// Cheap to clone; clones share the underlying fetcher (and with it the
/// connection pool), so one transport can serve both the resolver and the
/// reader. Safe for concurrent use; requests carry no cross-call ordering.
#[derive(Clone)]
pub struct Transport {
    fetch: Arc<dyn HttpFetch>,
    policy: RetryPolicy,
    timeout: Duration,
    on_event: Option<EventHook>,
}

impl Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("fetch", &self.fetch)
            .field("policy", &self.policy)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport {
    pub fn new() -> Self {
        Self::with_fetch(Arc::new(ReqwestFetch::new()))
    }

    /// Build a transport over an explicit fetcher. Test doubles enter here.
    pub fn with_fetch(fetch: Arc<dyn HttpFetch>) -> Self {
        Self { fetch, policy: RetryPolicy::default(), timeout: DEFAULT_TIMEOUT, on_event: None }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Install an observer for request lifecycle events.
    pub fn with_event_hook(mut self, hook: EventHook) -> Self {
        self.on_event = Some(hook);
        self
    }

    fn emit(&self, event: TransportEvent) {
        if let Some(hook) = &self.on_event {
            hook(&event);
        }
    }

    /// Build a request URL from an endpoint and query parameters.
    pub fn request_url(endpoint: &str, params: &[(&str, String)]) -> Result<Url, Error> {
        Url::parse_with_params(endpoint, params).map_err(|err| Error::ConnectionFailed {
            message: format!("invalid request URL: {err}"),
            url: endpoint.to_string(),
        })
    }

    /// Execute a GET request, retrying classifiable transient failures.
    ///
    /// A 2xx response yields the raw body. Statuses in
    /// [`RETRYABLE_STATUSES`], timeouts and connection-level faults are
    /// re-attempted up to `max_retries` times with exponential backoff;
    /// any other status fails immediately. When retries run out, the last
    /// observed failure is the one surfaced.
    pub async fn execute(&self, url: Url) -> Result<String, Error> {
        let url_str = url.to_string();
        let mut attempt: u32 = 0;

        loop {
            self.emit(TransportEvent::AttemptStarted { url: url_str.clone(), attempt });

            let failure = match self.fetch.fetch(&url, self.timeout).await {
                Ok(response) => {
                    self.emit(TransportEvent::ResponseReceived {
                        url: url_str.clone(),
                        status: response.status,
                    });

                    if response.is_success() {
                        return Ok(response.body);
                    }

                    let err = Error::Http { status: response.status, url: url_str.clone() };
                    if !self.policy.retries_status(response.status) {
                        self.emit(TransportEvent::FailureClassified {
                            url: url_str.clone(),
                            error: err.to_string(),
                        });
                        return Err(err);
                    }
                    err
                }
                Err(AttemptError::TimedOut) => Error::RequestTimeout { url: url_str.clone() },
                Err(AttemptError::Connection(message) | AttemptError::Other(message)) => {
                    Error::ConnectionFailed { message, url: url_str.clone() }
                }
            };

            if attempt >= self.policy.max_retries {
                self.emit(TransportEvent::FailureClassified {
                    url: url_str.clone(),
                    error: failure.to_string(),
                });
                return Err(failure);
            }

            let delay = self.policy.delay(attempt);
            attempt += 1;
            self.emit(TransportEvent::RetryScheduled {
                url: url_str.clone(),
                next_attempt: attempt,
                delay,
            });
            tokio::time::sleep(delay).await;
        }
    }
}
