//! Error types for the search core

use thiserror::Error;

/// Errors surfaced by the search core.
///
/// Cancellation is not an error: a superseded job simply ends without side
/// effects and never produces one of these.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("search core is already initialized")]
    AlreadyInitialized,
    #[error("search worker is already running")]
    WorkerRunning,
    #[error("failed to spawn search worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),
    #[error("settle delay interrupted")]
    Interrupted,
    #[error("provider {provider} failed: {source}")]
    Provider {
        provider: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("provider {0} panicked")]
    ProviderPanic(String),
    #[error("search queue is closed")]
    QueueClosed,
}

pub type Result<T> = std::result::Result<T, SearchError>;
