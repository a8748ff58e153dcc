//! Local durable storage: one JSON file per tournament under a storage directory.

use crate::models::Tournament;
use crate::persistence::{PersistenceError, SnapshotStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// On-disk envelope.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSnapshot {
    saved_at: DateTime<Utc>,
    tournament: Tournament,
}

#[derive(Debug, Clone)]
pub struct LocalFileStore {
    dir: PathBuf,
}

impl LocalFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File for `id`, or `None` if the id is not a safe file name.
    fn path_for(&self, id: &str) -> Option<PathBuf> {
        let safe = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        safe.then(|| self.dir.join(format!("{}.json", id)))
    }

    fn require_path(&self, id: &str) -> Result<PathBuf, PersistenceError> {
        self.path_for(id)
            .ok_or_else(|| PersistenceError::Unavailable(format!("invalid tournament id {:?}", id)))
    }
}

impl SnapshotStore for LocalFileStore {
    async fn load(&self, id: &str) -> Result<Option<Tournament>, PersistenceError> {
        let Some(path) = self.path_for(id) else {
            return Ok(None);
        };
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored: StoredSnapshot = serde_json::from_slice(&bytes)?;
        log::debug!("Loaded {} (saved {})", path.display(), stored.saved_at);
        Ok(Some(stored.tournament))
    }

    async fn save(&self, id: &str, snapshot: &Tournament) -> Result<(), PersistenceError> {
        let path = self.require_path(id)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let stored = StoredSnapshot {
            saved_at: Utc::now(),
            tournament: snapshot.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&stored)?;
        // Write then rename so a crash never leaves a half-written snapshot.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn clear(&self, id: &str) -> Result<(), PersistenceError> {
        let path = self.require_path(id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
