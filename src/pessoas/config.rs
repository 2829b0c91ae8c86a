use crate::error::{PessoasError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
pub const BASE_URL_ENV: &str = "PESSOAS_BASE_URL";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/api";
const DEFAULT_RESOURCE: &str = "pessoas";

/// Client configuration, stored as `config.json` in the config directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server prefix the resource is mounted under.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_resource")]
    pub resource: String,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_toast_ttl_secs")]
    pub toast_ttl_secs: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_resource() -> String {
    DEFAULT_RESOURCE.to_string()
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_toast_ttl_secs() -> u64 {
    5
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            resource: default_resource(),
            poll_interval_secs: default_poll_interval_secs(),
            debounce_ms: default_debounce_ms(),
            toast_ttl_secs: default_toast_ttl_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: ClientConfig = serde_json::from_str(&content)
            .map_err(|e| PessoasError::Config(format!("{}: {}", config_path.display(), e)))?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// `PESSOAS_BASE_URL` wins over the file.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.base_url = url.trim().to_string();
            }
        }
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn toast_ttl(&self) -> Duration {
        Duration::from_secs(self.toast_ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn list_all(&self) -> Vec<(&'static str, String)> {
        vec![
            ("base-url", self.base_url.clone()),
            ("resource", self.resource.clone()),
            ("poll-interval-secs", self.poll_interval_secs.to_string()),
            ("debounce-ms", self.debounce_ms.to_string()),
            ("toast-ttl-secs", self.toast_ttl_secs.to_string()),
            ("timeout-secs", self.timeout_secs.to_string()),
        ]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.list_all()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let number = || {
            value
                .trim()
                .parse::<u64>()
                .map_err(|_| PessoasError::Config(format!("{} expects a number, got {}", key, value)))
        };
        match key {
            "base-url" => self.base_url = value.trim().to_string(),
            "resource" => self.resource = value.trim().trim_matches('/').to_string(),
            "poll-interval-secs" => self.poll_interval_secs = number()?,
            "debounce-ms" => self.debounce_ms = number()?,
            "toast-ttl-secs" => self.toast_ttl_secs = number()?,
            "timeout-secs" => self.timeout_secs = number()?,
            other => return Err(PessoasError::Config(format!("Unknown config key: {}", other))),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:5000/api");
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.toast_ttl(), Duration::from_secs(5));
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load(dir.path()).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");

        let mut config = ClientConfig::default();
        config.set("base-url", "http://example.test/api").unwrap();
        config.set("poll-interval-secs", "60").unwrap();
        config.save(&nested).unwrap();

        let loaded = ClientConfig::load(&nested).unwrap();
        assert_eq!(loaded.base_url, "http://example.test/api");
        assert_eq!(loaded.poll_interval_secs, 60);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{"base_url": "http://other/api"}"#,
        )
        .unwrap();
        let config = ClientConfig::load(dir.path()).unwrap();
        assert_eq!(config.base_url, "http://other/api");
        assert_eq!(config.resource, "pessoas");
        assert_eq!(config.debounce_ms, 300);
    }

    #[test]
    fn test_broken_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "{ nope").unwrap();
        let err = ClientConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, PessoasError::Config(_)));
    }

    #[test]
    fn test_set_rejects_unknown_and_bad_values() {
        let mut config = ClientConfig::default();
        assert!(config.set("colour", "blue").is_err());
        assert!(config.set("debounce-ms", "soon").is_err());
        config.set("resource", "/people/").unwrap();
        assert_eq!(config.get("resource").as_deref(), Some("people"));
    }
}
