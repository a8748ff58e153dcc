//! Server configuration, read once from the environment.
//!
//! | Variable           | Default                 |
//! |--------------------|-------------------------|
//! | `HOST`             | `0.0.0.0`               |
//! | `PORT`             | `8080`                  |
//! | `BACKEND_URL`      | `http://localhost:5000` |
//! | `PUSH_URL`         | unset (no push channel) |
//! | `STORAGE_DIR`      | `data`                  |
//! | `INACTIVITY_HOURS` | `12`                    |

use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Base URL of the REST backend (snapshots and live matches).
    pub backend_url: String,
    /// WebSocket URL of the push channel.
    pub push_url: Option<String>,
    /// Directory for locally persisted tournaments.
    pub storage_dir: PathBuf,
    /// Sessions not touched for this long are dropped from memory.
    pub inactivity_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            backend_url: "http://localhost:5000".to_string(),
            push_url: None,
            storage_dir: PathBuf::from("data"),
            inactivity_timeout: Duration::from_secs(12 * 3600),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset, unparsable ones fall back.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();
        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(port) = get("PORT").and_then(|p| p.parse().ok()) {
            config.port = port;
        }
        if let Some(url) = get("BACKEND_URL") {
            config.backend_url = url;
        }
        config.push_url = get("PUSH_URL");
        if let Some(dir) = get("STORAGE_DIR") {
            config.storage_dir = PathBuf::from(dir);
        }
        if let Some(hours) = get("INACTIVITY_HOURS").and_then(|h| h.parse::<u64>().ok()) {
            config.inactivity_timeout = Duration::from_secs(hours.saturating_mul(3600));
        }
        config
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}
