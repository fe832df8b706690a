//! Client configuration.
use std::time::Duration;

/// Default timeout applied to both queue waits and HTTP exchanges.
pub const DEFAULT_TIMEOUT_MS: u64 = 2000;

/// How a failed outgoing `Request` is retried by the pusher.
///
/// `spec.md` §9 documents the source's behavior as unbounded retry with no
/// backoff and explicitly allows an opt-in bounded variant; `Unbounded` is
/// the default and preserves that documented, possibly-surprising
/// out-of-order-on-failure behavior exactly.
#[derive(Debug, Clone, Copy)]
pub enum RetryPolicy {
    /// Push the failed request back onto the tail of the outgoing queue
    /// forever, with no delay. Matches the original behavior.
    Unbounded,
    /// Retry up to `max_attempts` times, sleeping `backoff` between
    /// attempts, then drop the request.
    Bounded {
        max_attempts: u32,
        backoff: Duration,
    },
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::Unbounded
    }
}

/// Bundles the parameters needed to create a [`Client`](crate::client::Client).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub(crate) name: String,
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) timeout: Duration,
    pub(crate) retry: RetryPolicy,
}

impl ClientConfig {
    /// New config with the default timeout (2000 ms) and retry policy
    /// (unbounded, no backoff).
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            retry: RetryPolicy::Unbounded,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub(crate) fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
