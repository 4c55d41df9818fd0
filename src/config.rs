//! Runtime configuration for the askdb server.
//!
//! Values come from an optional JSON config file, overridden by
//! `ASKDB_HOST` / `ASKDB_PORT` / `ASKDB_API_KEY` environment variables.

use crate::types::{QueryError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Host to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
    /// Shared secret expected in the `x-api-key` header
    #[serde(default)]
    pub api_key: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_key: String::new(),
        }
    }
}

impl Config {
    /// Load configuration from an optional file, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Config` when the file is unreadable or invalid,
    /// or when no API key is configured at all.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = fs::read_to_string(path)?;
                serde_json::from_str(&content)
                    .map_err(|e| QueryError::config(format!("invalid config file: {}", e)))?
            }
            None => Self::default(),
        };
        config.apply_env();

        if config.api_key.is_empty() {
            return Err(QueryError::config(
                "no API key configured (set ASKDB_API_KEY or provide a config file)",
            ));
        }
        Ok(config)
    }

    /// Apply `ASKDB_*` environment variable overrides.
    fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("ASKDB_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("ASKDB_PORT") {
            if let Ok(port) = port.parse() {
                self.port = port;
            }
        }
        if let Ok(api_key) = std::env::var("ASKDB_API_KEY") {
            self.api_key = api_key;
        }
    }

    /// Socket address string for binding.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
