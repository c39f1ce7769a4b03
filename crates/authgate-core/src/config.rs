//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which selects the storage namespace and the credential service, and
//! remembers the last email used to sign in.
//!
//! Configuration is stored at `~/.config/authgate/config.json`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::DEFAULT_TIMEOUT_SECS;
use crate::api::{CredentialService, HttpCredentialService, MockCredentialService};
use crate::storage::{FileKvStore, DEFAULT_NAMESPACE};

/// Application name used for config/data directory paths
pub const APP_NAME: &str = "authgate";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable that switches to the HTTP credential service
pub const API_URL_ENV: &str = "AUTHGATE_API_URL";

/// Environment variable that prefills the sign-in email
pub const EMAIL_ENV: &str = "AUTHGATE_EMAIL";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ServiceConfig {
    #[default]
    Mock,
    Http {
        base_url: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage_namespace: String,
    pub service: ServiceConfig,
    pub last_email: Option<String>,
    /// Set when this is a fallback for a config file that failed to load.
    /// `save` refuses to overwrite that file.
    #[serde(skip)]
    pub read_only: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_namespace: DEFAULT_NAMESPACE.to_string(),
            service: ServiceConfig::default(),
            last_email: None,
            read_only: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Load the config, or fall back to read-only defaults plus the load error.
    pub fn load_or_default() -> (Self, Option<anyhow::Error>) {
        match Self::config_path() {
            Ok(path) => Self::load_or_default_from(&path),
            Err(e) => (Self::fallback(), Some(e)),
        }
    }

    pub fn load_or_default_from(path: &Path) -> (Self, Option<anyhow::Error>) {
        match Self::load_from(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::fallback(), Some(e)),
        }
    }

    fn fallback() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if self.read_only {
            anyhow::bail!(
                "Config file {} failed to load, not overwriting it",
                path.display()
            );
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Root for persisted key-value namespaces and log files
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Apply environment overrides. `lookup` is `std::env::var` in production.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.is_empty()) {
            let timeout_secs = match self.service {
                ServiceConfig::Http { timeout_secs, .. } => timeout_secs,
                ServiceConfig::Mock => DEFAULT_TIMEOUT_SECS,
            };
            self.service = ServiceConfig::Http {
                base_url: url,
                timeout_secs,
            };
        }
        if let Some(email) = lookup(EMAIL_ENV).filter(|e| !e.is_empty()) {
            self.last_email = Some(email);
        }
    }

    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    pub fn open_storage(&self) -> Result<FileKvStore> {
        let root = self.data_dir()?;
        FileKvStore::open(&root, &self.storage_namespace)
            .with_context(|| format!("Failed to open storage under {}", root.display()))
    }

    pub fn build_service(&self) -> Result<Arc<dyn CredentialService>> {
        let service: Arc<dyn CredentialService> = match &self.service {
            ServiceConfig::Mock => Arc::new(MockCredentialService::new()),
            ServiceConfig::Http {
                base_url,
                timeout_secs,
            } => Arc::new(
                HttpCredentialService::with_timeout(base_url, Duration::from_secs(*timeout_secs))
                    .context("Failed to build HTTP credential service")?,
            ),
        };
        Ok(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.storage_namespace, "auth-storage");
        assert_eq!(config.service, ServiceConfig::Mock);
        assert_eq!(config.last_email, None);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            storage_namespace: "other".to_string(),
            service: ServiceConfig::Http {
                base_url: "https://auth.example.com".to_string(),
                timeout_secs: 5,
            },
            last_email: Some("a@b.com".to_string()),
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"service":{"kind":"http","base_url":"http://x"}}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.storage_namespace, "auth-storage");
        assert_eq!(
            config.service,
            ServiceConfig::Http {
                base_url: "http://x".to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            }
        );
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_failed_load_never_overwrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ broken").unwrap();

        let (mut config, error) = Config::load_or_default_from(&path);
        assert!(error.is_some());
        assert!(config.read_only);
        assert_eq!(config.storage_namespace, "auth-storage");

        config.last_email = Some("a@b.com".to_string());
        assert!(config.save_to(&path).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ broken");
    }

    #[test]
    fn test_clean_load_is_writable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let (config, error) = Config::load_or_default_from(&path);
        assert!(error.is_none());
        assert!(!config.read_only);
        config.save_to(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (API_URL_ENV, "http://localhost:9000"),
            (EMAIL_ENV, "env@b.com"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env_with(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(
            config.service,
            ServiceConfig::Http {
                base_url: "http://localhost:9000".to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            }
        );
        assert_eq!(config.last_email.as_deref(), Some("env@b.com"));
    }

    #[test]
    fn test_empty_env_is_ignored() {
        let mut config = Config::default();
        config.apply_env_with(|_| Some(String::new()));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_build_service() {
        assert!(Config::default().build_service().is_ok());
        let http = Config {
            service: ServiceConfig::Http {
                base_url: "http://localhost:1".to_string(),
                timeout_secs: 1,
            },
            ..Config::default()
        };
        assert!(http.build_service().is_ok());
    }
}
