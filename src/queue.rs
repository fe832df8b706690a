//! A thread-safe FIFO of [`Request`]s with blocking pop-with-timeout and
//! shutdown, shared between the `Client`'s public API and its background
//! workers.
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use crate::request::Request;

struct State {
    items: VecDeque<Request>,
    running: bool,
}

/// FIFO queue of `Request`s. Two states only: Running (initial) and
/// Shutdown (terminal), entered only via [`Queue::shutdown`].
pub struct Queue {
    state: Mutex<State>,
    /// Signaled whenever an item is pushed; `pop` waits on this.
    produced: Condvar,
    /// Reserved for a future bounded-capacity variant — producers never
    /// wait today, so nothing currently waits on this condvar.
    consumed: Condvar,
}

impl Queue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                items: VecDeque::new(),
                running: true,
            }),
            produced: Condvar::new(),
            consumed: Condvar::new(),
        }
    }

    /// Append `request` to the tail.
    ///
    /// If the queue is not running, this is a no-op and `request` is handed
    /// back as `Err` so the caller retains ownership — mirroring the
    /// closed-queue push contract without leaking anything silently.
    pub fn push(&self, request: Request) -> Result<(), Request> {
        let mut state = self.state.lock().unwrap();
        if !state.running {
            return Err(request);
        }
        state.items.push_back(request);
        drop(state);
        self.produced.notify_one();
        Ok(())
    }

    /// Pop the head, waiting up to `timeout` for an item to arrive.
    ///
    /// Uses an absolute deadline under the hood (via
    /// [`Condvar::wait_timeout_while`], whose accounting already excludes
    /// spurious-wakeup time) so a slow producer cannot extend the caller's
    /// wait past `timeout`. A shut-down-but-nonempty queue still yields its
    /// remaining items; shutdown does not poison data already in flight.
    pub fn pop(&self, timeout: Duration) -> Option<Request> {
        let state = self.state.lock().unwrap();
        let (mut state, _timeout_result) = self
            .produced
            .wait_timeout_while(state, timeout, |s| s.items.is_empty())
            .unwrap();

        let popped = state.items.pop_front();
        drop(state);
        if popped.is_some() {
            self.consumed.notify_one();
        }
        popped
    }

    /// Transition to Shutdown. Idempotent. Does not wake waiters explicitly
    /// — they drain via their own deadlines, as `spec.md` specifies.
    pub fn shutdown(&self) {
        self.state.lock().unwrap().running = false;
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().unwrap().running
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Method, Request};
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    fn req(body: &str) -> Request {
        Request::new(None, None, Some(body.to_string()))
    }

    #[test]
    fn fifo_single_producer_single_consumer() {
        let q = Queue::new();
        for i in 0..5 {
            q.push(req(&i.to_string())).unwrap();
        }
        for i in 0..5 {
            let popped = q.pop(Duration::from_millis(10)).unwrap();
            assert_eq!(popped.body.as_deref(), Some(i.to_string().as_str()));
        }
        assert!(q.is_empty());
    }

    #[test]
    fn size_coherence_across_push_and_pop() {
        let q = Queue::new();
        q.push(req("a")).unwrap();
        q.push(req("b")).unwrap();
        assert_eq!(q.len(), 2);
        q.pop(Duration::from_millis(10));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn push_after_shutdown_is_rejected_and_ownership_returns() {
        let q = Queue::new();
        q.shutdown();
        let err = q.push(req("too late")).unwrap_err();
        assert_eq!(err.body.as_deref(), Some("too late"));
        assert_eq!(q.len(), 0);
    }

    #[test]
    fn pop_drains_after_shutdown_then_returns_none() {
        let q = Queue::new();
        q.push(req("a")).unwrap();
        q.push(req("b")).unwrap();
        q.shutdown();

        assert!(q.pop(Duration::from_millis(10)).is_some());
        assert!(q.pop(Duration::from_millis(10)).is_some());
        assert!(q.pop(Duration::from_millis(50)).is_none());
    }

    #[test]
    fn pop_on_empty_queue_waits_at_least_the_timeout() {
        let q = Queue::new();
        let start = Instant::now();
        let result = q.pop(Duration::from_millis(100));
        let elapsed = start.elapsed();
        assert!(result.is_none());
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_millis(100) + Duration::from_millis(150));
    }

    #[test]
    fn concurrent_producer_wakes_blocked_consumer() {
        let q = Arc::new(Queue::new());
        let q2 = Arc::clone(&q);
        let producer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            q2.push(req("delivered")).unwrap();
        });

        let popped = q.pop(Duration::from_secs(2)).unwrap();
        assert_eq!(popped.body.as_deref(), Some("delivered"));
        producer.join().unwrap();
    }
}
