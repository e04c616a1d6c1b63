//! Configuration service implementation.
//!
//! Loads [`ClientConfig`] from `config.toml` and layers environment overrides
//! on top:
//!
//! | Variable | Field |
//! |---|---|
//! | `STREAMFRONT_API_URL` | `api_base_url` |
//! | `STREAMFRONT_TIMEOUT_SECS` | `request_timeout_secs` |
//! | `STREAMFRONT_SESSION_FILE` | `session_file` |

use std::path::PathBuf;

use streamfront_core::config::ClientConfig;
use streamfront_core::error::{Result, StreamfrontError};

use crate::paths::StreamfrontPaths;

pub const ENV_API_URL: &str = "STREAMFRONT_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "STREAMFRONT_TIMEOUT_SECS";
pub const ENV_SESSION_FILE: &str = "STREAMFRONT_SESSION_FILE";

#[derive(Debug, Clone, Default)]
pub struct ConfigService {
    paths: StreamfrontPaths,
}

impl ConfigService {
    pub fn new(paths: StreamfrontPaths) -> Self {
        Self { paths }
    }

    /// Reads the config file (defaults when absent) and applies the process
    /// environment.
    pub fn load(&self) -> Result<ClientConfig> {
        let config = self.load_file()?;
        apply_env_overrides(config, |key| std::env::var(key).ok())
    }

    /// Config file contents only, without environment overrides.
    pub fn load_file(&self) -> Result<ClientConfig> {
        let path = self.config_path()?;
        if !path.exists() {
            tracing::debug!(
                "[ConfigService] No config at {}, using defaults",
                path.display()
            );
            return Ok(ClientConfig::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        tracing::debug!("[ConfigService] Loaded config from {}", path.display());
        Ok(config)
    }

    /// Writes `config` to the config file, creating the directory if needed.
    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        let path = self.config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, toml::to_string_pretty(config)?)?;
        Ok(())
    }

    /// Resolved session file: configured path, else the default location.
    pub fn session_file(&self, config: &ClientConfig) -> Result<PathBuf> {
        match &config.session_file {
            Some(path) => Ok(path.clone()),
            None => self
                .paths
                .session_file()
                .map_err(|e| StreamfrontError::config(e.to_string())),
        }
    }

    fn config_path(&self) -> Result<PathBuf> {
        self.paths
            .config_file()
            .map_err(|e| StreamfrontError::config(e.to_string()))
    }
}

/// Applies overrides read through `lookup`, validating numeric values.
pub fn apply_env_overrides<F>(mut config: ClientConfig, lookup: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
        config.api_base_url = url.trim().to_string();
    }
    if let Some(raw) = lookup(ENV_TIMEOUT_SECS).filter(|v| !v.trim().is_empty()) {
        config.request_timeout_secs = raw.trim().parse().map_err(|_| {
            StreamfrontError::config(format!(
                "{} must be a number of seconds, got '{}'",
                ENV_TIMEOUT_SECS, raw
            ))
        })?;
    }
    if let Some(path) = lookup(ENV_SESSION_FILE).filter(|v| !v.trim().is_empty()) {
        config.session_file = Some(PathBuf::from(path));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use streamfront_core::config::DEFAULT_API_BASE_URL;
    use tempfile::TempDir;

    fn service_in(temp_dir: &TempDir) -> ConfigService {
        ConfigService::new(StreamfrontPaths::new(Some(temp_dir.path().to_path_buf())))
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = service_in(&temp_dir).load_file().unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let service = service_in(&temp_dir);
        let config = ClientConfig {
            api_base_url: "https://api.example.com".to_string(),
            request_timeout_secs: 5,
            session_file: None,
        };
        service.save(&config).unwrap();
        assert_eq!(service.load_file().unwrap(), config);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("config.toml"), "api_base_url = [").unwrap();
        let err = service_in(&temp_dir).load_file().unwrap_err();
        assert!(err.is_serialization());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_URL, "http://staging/api"),
            (ENV_TIMEOUT_SECS, "7"),
            (ENV_SESSION_FILE, "/tmp/s.json"),
        ]);
        let config = apply_env_overrides(ClientConfig::default(), |k| {
            env.get(k).map(|v| v.to_string())
        })
        .unwrap();

        assert_eq!(config.api_base_url, "http://staging/api");
        assert_eq!(config.request_timeout_secs, 7);
        assert_eq!(config.session_file, Some(PathBuf::from("/tmp/s.json")));
    }

    #[test]
    fn test_bad_timeout_override_is_rejected() {
        let result = apply_env_overrides(ClientConfig::default(), |k| {
            (k == ENV_TIMEOUT_SECS).then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_session_file_defaults_under_config_dir() {
        let temp_dir = TempDir::new().unwrap();
        let service = service_in(&temp_dir);
        let path = service.session_file(&ClientConfig::default()).unwrap();
        assert_eq!(path, temp_dir.path().join("session.json"));
    }
}
