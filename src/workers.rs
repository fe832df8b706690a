//! The pusher and puller background loops that bridge a [`Client`]'s
//! queues to its [`RequestTransport`].
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::RetryPolicy;
use crate::queue::Queue;
use crate::request::Request;
use crate::transport::RequestTransport;

/// Checks `running` at the top of every loop iteration. This is the only
/// cancellation checkpoint — an in-flight HTTP exchange is never
/// interrupted, so `shutdown` can take up to one full iteration to observe.
fn is_running(running: &Mutex<bool>) -> bool {
    *running.lock().unwrap()
}

/// Pops from `outgoing`, performs the request, and re-enqueues it at the
/// tail on failure. No bounded retry count and no backoff unless
/// `retry` says otherwise.
#[tracing::instrument(skip_all)]
pub(crate) fn run_pusher<T: RequestTransport>(
    outgoing: Arc<Queue>,
    transport: Arc<T>,
    running: Arc<Mutex<bool>>,
    timeout: Duration,
    retry: RetryPolicy,
) {
    while is_running(&running) {
        let Some(mut request) = outgoing.pop(timeout) else {
            continue;
        };

        if transport.perform(&request, timeout).is_some() {
            continue;
        }

        request.attempts += 1;
        debug!(attempts = request.attempts, "request failed, requeuing at tail");
        retry_or_drop(&outgoing, request, &retry);
    }
}

/// Re-enqueues `request` per `retry`, or drops it once `Bounded` says it has
/// been tried enough times.
fn retry_or_drop(outgoing: &Queue, request: Request, retry: &RetryPolicy) {
    match retry {
        RetryPolicy::Unbounded => {
            if outgoing.push(request).is_err() {
                debug!("outgoing queue shut down, dropping failed request");
            }
        }
        RetryPolicy::Bounded {
            max_attempts,
            backoff,
        } => {
            if request.attempts >= *max_attempts {
                debug!(attempts = request.attempts, "attempt limit reached, dropping request");
                return;
            }
            std::thread::sleep(*backoff);
            if outgoing.push(request).is_err() {
                debug!("outgoing queue shut down, dropping failed request");
            }
        }
    }
}

/// Repeatedly long-polls `GET {server_url}/queue/{name}` and wraps each
/// returned body as a `Request` on `incoming`.
#[tracing::instrument(skip_all)]
pub(crate) fn run_puller<T: RequestTransport>(
    incoming: Arc<Queue>,
    transport: Arc<T>,
    running: Arc<Mutex<bool>>,
    timeout: Duration,
    poll_request: Request,
) {
    while is_running(&running) {
        let Some(body) = transport.perform(&poll_request, timeout) else {
            continue;
        };

        let wrapped = Request::received(body);
        if incoming.push(wrapped).is_err() {
            warn!("incoming queue shut down, dropping received message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req() -> Request {
        Request::new(None, None, Some("payload".into()))
    }

    #[test]
    fn unbounded_always_requeues() {
        let outgoing = Queue::new();
        let mut request = req();
        request.attempts = 1000;
        retry_or_drop(&outgoing, request, &RetryPolicy::Unbounded);
        assert_eq!(outgoing.len(), 1);
    }

    #[test]
    fn bounded_requeues_below_the_limit() {
        let outgoing = Queue::new();
        let mut request = req();
        request.attempts = 1;
        let retry = RetryPolicy::Bounded {
            max_attempts: 3,
            backoff: Duration::from_millis(1),
        };
        retry_or_drop(&outgoing, request, &retry);
        assert_eq!(outgoing.len(), 1);
    }

    #[test]
    fn bounded_drops_once_the_limit_is_reached() {
        let outgoing = Queue::new();
        let mut request = req();
        request.attempts = 3;
        let retry = RetryPolicy::Bounded {
            max_attempts: 3,
            backoff: Duration::from_millis(1),
        };
        retry_or_drop(&outgoing, request, &retry);
        assert!(outgoing.is_empty());
    }
}
