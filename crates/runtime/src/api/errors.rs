//! Runtime-boundary errors.

use crate::repository::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The engine worker is gone; the runtime is shutting down or crashed.
    #[error("engine command channel closed")]
    CommandChannelClosed,

    /// The worker dropped a reply sender without answering.
    #[error("worker dropped reply channel: {0}")]
    ReplyChannelClosed(#[from] tokio::sync::oneshot::error::RecvError),

    #[error("worker task failed: {0}")]
    WorkerJoin(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
