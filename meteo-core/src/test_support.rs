//! Scripted transport doubles shared by the unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;

use crate::transport::{AttemptError, HttpFetch, RawResponse, RetryPolicy};

/// A retry policy with real semantics but millisecond backoff, so retry
/// tests finish quickly.
pub(crate) fn fast_policy() -> RetryPolicy {
    RetryPolicy { max_retries: 3, backoff_base: Duration::from_millis(1) }
}

/// Replays a fixed sequence of per-attempt outcomes and records every URL
/// it was asked to fetch.
#[derive(Debug, Default)]
pub(crate) struct ScriptedFetch {
    script: Mutex<VecDeque<Result<RawResponse, AttemptError>>>,
    urls: Mutex<Vec<Url>>,
}

impl ScriptedFetch {
    pub(crate) fn replies(script: Vec<Result<RawResponse, AttemptError>>) -> Self {
        Self { script: Mutex::new(script.into()), urls: Mutex::new(Vec::new()) }
    }

    /// Single 200 response with the given body.
    pub(crate) fn ok(body: &str) -> Self {
        Self::replies(vec![Ok(RawResponse { status: 200, body: body.to_string() })])
    }

    pub(crate) fn attempts(&self) -> usize {
        self.urls.lock().unwrap().len()
    }

    pub(crate) fn seen_urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().iter().map(Url::to_string).collect()
    }
}

#[async_trait]
impl HttpFetch for ScriptedFetch {
    async fn fetch(&self, url: &Url, _timeout: Duration) -> Result<RawResponse, AttemptError> {
        self.urls.lock().unwrap().push(url.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AttemptError::Other("scripted replies exhausted".to_string())))
    }
}
