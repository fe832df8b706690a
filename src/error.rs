use thiserror::Error;

/// Errors that cross a public API boundary.
///
/// Per the core's error-handling design, most failures (closed-queue
/// push, pop timeout, transport failure) are benign and reported via
/// sentinels rather than `Result`. `Error` only covers construction
/// failure, where the caller genuinely needs to know something went
/// wrong before it can use the client at all.
#[derive(Debug, Error)]
pub enum Error {
    /// A background worker thread (pusher or puller) failed to spawn.
    #[error("failed to spawn background worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
