//! Client core for a Simple Message Queue (SMQ) pub/sub broker.
//!
//! Applications call non-blocking (`publish`/`subscribe`/`unsubscribe`)
//! and blocking-with-timeout (`retrieve`) methods on a [`Client`]; two
//! background threads bridge the client's local queues to the broker over
//! HTTP. See [`Client`]'s docs for the full lifecycle.

pub mod client;
pub mod config;
pub mod error;
pub mod queue;
pub mod request;
pub mod transport;
mod workers;

pub use client::Client;
pub use config::{ClientConfig, RetryPolicy};
pub use error::{Error, Result};
pub use queue::Queue;
pub use request::{Method, Request};
pub use transport::{HttpTransport, RequestTransport};
