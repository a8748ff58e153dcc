//! Persistence boundary: where snapshots and live-match records go.
//!
//! Each call site picks a strategy: [`BackendClient`] syncs every transition to the
//! REST backend, [`LocalFileStore`] keeps the snapshot on local disk, [`MemoryStore`]
//! keeps everything in process.

mod backend;
mod local;
mod memory;

pub use backend::BackendClient;
pub use local::LocalFileStore;
pub use memory::MemoryStore;

use crate::models::{LiveMatch, Tournament};
use std::future::Future;

/// Errors from a persistence strategy. Logged by the engine, never retried.
#[derive(Debug)]
pub enum PersistenceError {
    /// Request could not be sent or the response not read.
    Http(reqwest::Error, String),
    /// Backend answered with a non-success status.
    Status(u16, String),
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Strategy refused the operation (e.g. a deliberately failing test store).
    Unavailable(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistenceError::Http(e, url) => write!(f, "Request to {} failed: {}", url, e),
            PersistenceError::Status(code, url) => write!(f, "{} answered with status {}", url, code),
            PersistenceError::Io(e) => write!(f, "Storage error: {}", e),
            PersistenceError::Json(e) => write!(f, "Invalid snapshot JSON: {}", e),
            PersistenceError::Unavailable(msg) => write!(f, "Store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<std::io::Error> for PersistenceError {
    fn from(e: std::io::Error) -> Self {
        PersistenceError::Io(e)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(e: serde_json::Error) -> Self {
        PersistenceError::Json(e)
    }
}

/// Loads and saves tournament snapshots, keyed by tournament id.
pub trait SnapshotStore: Send + Sync + 'static {
    /// `Ok(None)` if nothing is stored under `id`.
    fn load(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Tournament>, PersistenceError>> + Send;

    /// Idempotent upsert of the full snapshot.
    fn save(
        &self,
        id: &str,
        snapshot: &Tournament,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;

    /// Remove the stored snapshot. Strategies without durable state may ignore this.
    fn clear(&self, _id: &str) -> impl Future<Output = Result<(), PersistenceError>> + Send {
        async { Ok(()) }
    }
}

/// Registers live-match records with the match-tracking store.
pub trait MatchRegistry: Send + Sync + 'static {
    fn register(
        &self,
        record: &LiveMatch,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;
}
