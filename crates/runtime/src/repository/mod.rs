//! Snapshot persistence.

mod file;

pub use file::FileSnapshotRepository;

use async_trait::async_trait;
use engine_core::EngineSnapshot;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Storage backend for the engine snapshot.
///
/// Implementations must make `save` atomic: a crash mid-write leaves either
/// the old snapshot or the new one, never a torn file.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Loads the persisted snapshot. `Ok(None)` when nothing was saved yet.
    async fn load(&self) -> Result<Option<EngineSnapshot>, RepositoryError>;

    /// Persists the snapshot, replacing any previous one.
    async fn save(&self, snapshot: &EngineSnapshot) -> Result<(), RepositoryError>;
}
