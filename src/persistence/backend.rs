//! REST strategy: snapshots under `/tour/{id}`, live matches under `/live`.

use crate::models::{LiveMatch, Tournament};
use crate::persistence::{MatchRegistry, PersistenceError, SnapshotStore};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Per-request limit; a stalled backend surfaces as an error instead of hanging.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the tournament backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(concat!("bracket-dashboard/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn tournament_url(&self, id: &str) -> String {
        format!("{}/tour/{}", self.base_url, id)
    }

    fn live_url(&self) -> String {
        format!("{}/live", self.base_url)
    }
}

fn check_status(status: StatusCode, url: &str) -> Result<(), PersistenceError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(PersistenceError::Status(status.as_u16(), url.to_string()))
    }
}

impl SnapshotStore for BackendClient {
    async fn load(&self, id: &str) -> Result<Option<Tournament>, PersistenceError> {
        let url = self.tournament_url(id);
        log::debug!("GET {}", url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PersistenceError::Http(e, url.clone()))?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        check_status(resp.status(), &url)?;
        let body = resp
            .text()
            .await
            .map_err(|e| PersistenceError::Http(e, url.clone()))?;
        let body = body.trim();
        if body.is_empty() || body == "null" {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(body)?))
    }

    async fn save(&self, id: &str, snapshot: &Tournament) -> Result<(), PersistenceError> {
        let url = self.tournament_url(id);
        log::debug!("PUT {}", url);
        let resp = self
            .client
            .put(&url)
            .json(snapshot)
            .send()
            .await
            .map_err(|e| PersistenceError::Http(e, url.clone()))?;
        check_status(resp.status(), &url)
    }
}

impl MatchRegistry for BackendClient {
    async fn register(&self, record: &LiveMatch) -> Result<(), PersistenceError> {
        let url = self.live_url();
        log::debug!(
            "POST {} ({} round {}: {} vs {})",
            url,
            record.game_name,
            record.round,
            record.team_a,
            record.team_b
        );
        let resp = self
            .client
            .post(&url)
            .json(record)
            .send()
            .await
            .map_err(|e| PersistenceError::Http(e, url.clone()))?;
        check_status(resp.status(), &url)
    }
}
