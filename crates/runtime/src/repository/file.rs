//! JSON file-backed snapshot repository.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use engine_core::EngineSnapshot;
use tokio::fs;

use super::{RepositoryError, SnapshotRepository};

const SNAPSHOT_FILE: &str = "progress.json";

/// Stores the snapshot as pretty-printed JSON under the data directory.
///
/// Writes go to a temp file first and are renamed into place, so a crash
/// never leaves a half-written snapshot behind.
pub struct FileSnapshotRepository {
    path: PathBuf,
}

impl FileSnapshotRepository {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(SNAPSHOT_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotRepository for FileSnapshotRepository {
    async fn load(&self) -> Result<Option<EngineSnapshot>, RepositoryError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let snapshot = serde_json::from_slice(&bytes)
            .map_err(|err| RepositoryError::Serialization(err.to_string()))?;
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &EngineSnapshot) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(snapshot)
            .map_err(|err| RepositoryError::Serialization(err.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
