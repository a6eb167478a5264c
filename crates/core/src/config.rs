//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Enable per-request tracing (tower-http TraceLayer).
    #[serde(default)]
    pub enable_tracing: bool,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            enable_tracing: false,
        }
    }
}

/// Metadata store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum MetadataConfig {
    Sqlite {
        /// Path to the SQLite database file.
        path: PathBuf,
        /// Advisory query timeout in seconds.
        query_timeout_secs: Option<u64>,
    },
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("data/dramshelf.db"),
            query_timeout_secs: None,
        }
    }
}

/// Idempotency replay cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IdempotencyConfig {
    /// How long a cached response stays replayable, in seconds.
    #[serde(default = "default_replay_ttl_secs")]
    pub replay_ttl_secs: u64,
    /// Largest response body (bytes) that will be buffered and cached.
    /// Responses above this size are passed through uncached.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Interval between expired-entry sweeps of the in-memory store.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_replay_ttl_secs() -> u64 {
    86400 // 24 hours
}

fn default_max_body_bytes() -> usize {
    1024 * 1024 // 1 MiB
}

fn default_sweep_interval_secs() -> u64 {
    300
}

impl Default for IdempotencyConfig {
    fn default() -> Self {
        Self {
            replay_ttl_secs: default_replay_ttl_secs(),
            max_body_bytes: default_max_body_bytes(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl IdempotencyConfig {
    /// Replay TTL as a Duration.
    pub fn replay_ttl(&self) -> Duration {
        Duration::from_secs(self.replay_ttl_secs)
    }

    /// Sweep interval as a Duration.
    /// Returns a 60 second default if configured as zero, since
    /// tokio::time::interval panics on a zero period.
    pub fn sweep_interval(&self) -> Duration {
        if self.sweep_interval_secs == 0 {
            tracing::warn!("idempotency.sweep_interval_secs is 0, using default of 60 seconds");
            Duration::from_secs(60)
        } else {
            Duration::from_secs(self.sweep_interval_secs)
        }
    }
}

/// Name search configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Minimum similarity (0.0..=1.0) for a name to appear in fuzzy results.
    #[serde(default = "default_score_cutoff")]
    pub score_cutoff: f64,
}

fn default_score_cutoff() -> f64 {
    0.6
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            score_cutoff: default_score_cutoff(),
        }
    }
}

/// Top-level application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Metadata store configuration.
    #[serde(default)]
    pub metadata: MetadataConfig,
    /// Idempotency replay cache configuration.
    #[serde(default)]
    pub idempotency: IdempotencyConfig,
    /// Name search configuration.
    #[serde(default)]
    pub search: SearchConfig,
}

impl AppConfig {
    /// Create a test configuration with sensible defaults.
    ///
    /// **For testing only.** Uses SQLite metadata and in-memory caches.
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig::default(),
            metadata: MetadataConfig::default(),
            idempotency: IdempotencyConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idempotency_config_defaults() {
        let config = IdempotencyConfig::default();
        assert_eq!(config.replay_ttl_secs, 86400);
        assert_eq!(config.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn test_sweep_interval_zero_uses_default() {
        let config = IdempotencyConfig {
            sweep_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.sweep_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_app_config_deserialize_empty() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert!((config.search.score_cutoff - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_metadata_config_deserialize_sqlite() {
        let json = r#"{"backend": "sqlite", "path": "/tmp/test.db", "query_timeout_secs": 30}"#;
        let config: MetadataConfig = serde_json::from_str(json).unwrap();
        let MetadataConfig::Sqlite {
            path,
            query_timeout_secs,
        } = config;
        assert_eq!(path, PathBuf::from("/tmp/test.db"));
        assert_eq!(query_timeout_secs, Some(30));
    }
}
