//! Configuration management
//!
//! Loads configuration from an optional `config.yml` file, then applies
//! environment variable overrides (`BLOGLIST_DATABASE_URL`,
//! `BLOGLIST_TOKEN_SECRET`, `BLOGLIST_HOST`, `BLOGLIST_PORT`).
//! Missing values fall back to sensible defaults.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Config {
    /// Load configuration from a YAML file, falling back to defaults when
    /// the file does not exist, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("BLOGLIST_DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(secret) = std::env::var("BLOGLIST_TOKEN_SECRET") {
            self.auth.token_secret = secret;
        }
        if let Ok(host) = std::env::var("BLOGLIST_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("BLOGLIST_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3003
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/bloglist.db".to_string()
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign and verify session tokens
    #[serde(default = "default_token_secret")]
    pub token_secret: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: default_token_secret(),
        }
    }
}

fn default_token_secret() -> String {
    // Development fallback; deployments override via config.yml or
    // BLOGLIST_TOKEN_SECRET.
    "bloglist-dev-secret".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3003);
        assert_eq!(config.database.url, "data/bloglist.db");
        assert!(!config.auth.token_secret.is_empty());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config =
            Config::load(Path::new("does-not-exist.yml")).expect("Defaults should load");
        assert_eq!(config.server.port, 3003);
    }

    #[test]
    fn test_load_partial_yaml_fills_defaults() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.yml");
        std::fs::write(
            &path,
            "server:\n  port: 8080\ndatabase:\n  url: \":memory:\"\n",
        )
        .expect("Failed to write config");

        let config = Config::load(&path).expect("Config should load");

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.url, ":memory:");
    }

    #[test]
    fn test_load_invalid_yaml_fails() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "server: [not a mapping").expect("Failed to write config");

        assert!(Config::load(&path).is_err());
    }
}
