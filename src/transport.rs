//! Executes a single [`Request`] against the broker over HTTP.
use std::time::Duration;

use tracing::{debug, warn};

use crate::request::{Method, Request};

/// Executes one [`Request`] synchronously with a total timeout, returning
/// the response body on success or the failure sentinel (`None`).
///
/// A `None` return covers every failure the core treats uniformly: a
/// connection error, a timeout, a non-success status, and — for `GET` — a
/// broker signaling "no messages available" via a client-error status. The
/// puller relies on this collapsing: any absence of payload is simply a
/// signal to loop again.
pub trait RequestTransport: Send + Sync {
    fn perform(&self, request: &Request, timeout: Duration) -> Option<String>;
}

/// Lets callers hold on to an `Arc<SomeTransport>` for assertions (as the
/// integration tests do with their mock broker) while also handing a clone
/// of the same `Arc` to `Client::create_with_transport`.
impl<U: RequestTransport + ?Sized> RequestTransport for std::sync::Arc<U> {
    fn perform(&self, request: &Request, timeout: Duration) -> Option<String> {
        (**self).perform(request, timeout)
    }
}

/// Production [`RequestTransport`] backed by a blocking `reqwest` client.
///
/// One `reqwest::blocking::Client` is shared (it's internally pooled and
/// `Sync`) across both background workers; a fresh per-call timeout is
/// applied via `RequestBuilder::timeout` rather than baked into the client,
/// since `spec.md`'s timeout is a per-`Client` setting, not a global one.
#[derive(Debug, Default)]
pub struct HttpTransport {
    inner: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            inner: reqwest::blocking::Client::new(),
        }
    }
}

impl RequestTransport for HttpTransport {
    #[tracing::instrument(skip(self), fields(method = ?request.method, url = request.url.as_deref()))]
    fn perform(&self, request: &Request, timeout: Duration) -> Option<String> {
        let url = request.url.as_deref()?;
        let method = request.method?;

        let builder = match method {
            Method::Get => self.inner.get(url),
            Method::Put => {
                let body = request.body.clone().unwrap_or_default();
                self.inner.put(url).body(body)
            }
            Method::Delete => self.inner.delete(url),
        };

        let response = match builder.timeout(timeout).send() {
            Ok(response) => response,
            Err(err) => {
                debug!(error = %err, "transport request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(status = %response.status(), "broker returned a non-success status");
            return None;
        }

        match response.text() {
            Ok(body) => Some(body),
            Err(err) => {
                warn!(error = %err, "failed to read response body");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_url_is_a_failure() {
        let transport = HttpTransport::new();
        let request = Request::new(Some(Method::Get), None, None);
        assert!(transport.perform(&request, Duration::from_millis(50)).is_none());
    }

    #[test]
    fn missing_method_is_a_failure() {
        let transport = HttpTransport::new();
        let request = Request::new(None, Some("http://localhost:1".into()), None);
        assert!(transport.perform(&request, Duration::from_millis(50)).is_none());
    }

    #[test]
    fn unreachable_host_is_a_failure() {
        let transport = HttpTransport::new();
        // Port 0 never accepts connections; this should fail fast rather than hang.
        let request = Request::new(Some(Method::Get), Some("http://127.0.0.1:0/queue/x".into()), None);
        assert!(transport
            .perform(&request, Duration::from_millis(200))
            .is_none());
    }
}
