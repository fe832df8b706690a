//! The public API: a process-local coordinator owning two queues and two
//! background worker threads.
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::info;

use crate::config::{ClientConfig, RetryPolicy};
use crate::error::{Error, Result};
use crate::queue::Queue;
use crate::request::Request;
use crate::transport::{HttpTransport, RequestTransport};
use crate::workers::{run_puller, run_pusher};

/// A client handle for one mailbox identity.
///
/// `Client` owns exactly two [`Queue`]s (outgoing, incoming) and two
/// worker threads (pusher, puller). Created by [`Client::create`] (or
/// [`Client::create_from_config`]/[`Client::create_with_transport`] for
/// configuration or testing); lives until [`Client::shutdown`] then
/// [`Client::delete`].
pub struct Client<T: RequestTransport = HttpTransport> {
    name: String,
    server_url: String,
    timeout: Duration,
    retry: RetryPolicy,
    running: Arc<Mutex<bool>>,
    outgoing: Arc<Queue>,
    incoming: Arc<Queue>,
    transport: Arc<T>,
    pusher: Mutex<Option<JoinHandle<()>>>,
    puller: Mutex<Option<JoinHandle<()>>>,
}

impl Client<HttpTransport> {
    /// Create a client talking to `{host}:{port}` over HTTP, with the
    /// default 2000 ms timeout and unbounded retry.
    pub fn create(name: impl Into<String>, host: impl Into<String>, port: u16) -> Result<Self> {
        Self::create_from_config(ClientConfig::new(name, host, port))
    }

    pub fn create_from_config(config: ClientConfig) -> Result<Self> {
        Self::create_with_transport(config, HttpTransport::new())
    }
}

impl<T: RequestTransport + 'static> Client<T> {
    /// Create a client with an explicit [`RequestTransport`] — the hook
    /// tests use to substitute a mock broker.
    pub fn create_with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        let server_url = config.server_url();
        let name = config.name;
        let timeout = config.timeout;
        let retry = config.retry;

        let running = Arc::new(Mutex::new(true));
        let outgoing = Arc::new(Queue::new());
        let incoming = Arc::new(Queue::new());
        let transport = Arc::new(transport);

        let pusher = {
            let outgoing = Arc::clone(&outgoing);
            let transport = Arc::clone(&transport);
            let running = Arc::clone(&running);
            thread::Builder::new()
                .name(format!("smq-pusher-{name}"))
                .spawn(move || run_pusher(outgoing, transport, running, timeout, retry))
                .map_err(Error::WorkerSpawn)?
        };

        let poll_request = Request::poll(&server_url, &name);
        let puller = {
            let incoming = Arc::clone(&incoming);
            let transport = Arc::clone(&transport);
            let running = Arc::clone(&running);
            match thread::Builder::new()
                .name(format!("smq-puller-{name}"))
                .spawn(move || run_puller(incoming, transport, running, timeout, poll_request))
            {
                Ok(handle) => handle,
                Err(err) => {
                    // Roll back the already-spawned pusher before bubbling
                    // the error up: construction failure must not leak a
                    // running thread.
                    *running.lock().unwrap() = false;
                    outgoing.shutdown();
                    let _ = pusher.join();
                    return Err(Error::WorkerSpawn(err));
                }
            }
        };

        info!(name = %name, server_url = %server_url, "smq client created");

        Ok(Self {
            name,
            server_url,
            timeout,
            retry,
            running,
            outgoing,
            incoming,
            transport,
            pusher: Mutex::new(Some(pusher)),
            puller: Mutex::new(Some(puller)),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn running(&self) -> bool {
        *self.running.lock().unwrap()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// The transport backing this client — mainly useful in tests that
    /// need to assert against a mock broker's recorded state.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Publish `body` to `topic`. No-op if the client is not running.
    #[tracing::instrument(skip(self, body), fields(name = %self.name, topic))]
    pub fn publish(&self, topic: &str, body: impl Into<String>) {
        if !self.running() {
            return;
        }
        let request = Request::publish(&self.server_url, topic, body.into());
        let _ = self.outgoing.push(request);
    }

    /// Subscribe this mailbox to `topic`. No-op if not running.
    #[tracing::instrument(skip(self), fields(name = %self.name))]
    pub fn subscribe(&self, topic: &str) {
        if !self.running() {
            return;
        }
        let request = Request::subscribe(&self.server_url, &self.name, topic);
        let _ = self.outgoing.push(request);
    }

    /// Unsubscribe this mailbox from `topic`. No-op if not running.
    #[tracing::instrument(skip(self), fields(name = %self.name))]
    pub fn unsubscribe(&self, topic: &str) {
        if !self.running() {
            return;
        }
        let request = Request::unsubscribe(&self.server_url, &self.name, topic);
        let _ = self.outgoing.push(request);
    }

    /// Pop one received body, waiting up to the client's timeout. Returns
    /// `None` if not running or if no message arrives in time.
    #[tracing::instrument(skip(self), fields(name = %self.name))]
    pub fn retrieve(&self) -> Option<String> {
        if !self.running() {
            return None;
        }
        self.incoming.pop(self.timeout).and_then(|req| req.body)
    }

    /// Idempotent: shuts down both queues, clears `running`, and joins both
    /// workers exactly once. Safe to call any number of times.
    #[tracing::instrument(skip(self), fields(name = %self.name))]
    pub fn shutdown(&self) {
        *self.running.lock().unwrap() = false;
        self.outgoing.shutdown();
        self.incoming.shutdown();

        if let Some(handle) = self.pusher.lock().unwrap().take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.puller.lock().unwrap().take() {
            let _ = handle.join();
        }
    }

    /// Release the client's queues (draining any residual requests).
    ///
    /// Callers are responsible for having called [`Client::shutdown`]
    /// first; this only documents that two-step contract, since the
    /// `Queue`s' own `Drop` already drains them the moment `self` goes out
    /// of scope.
    pub fn delete(self) {}
}
