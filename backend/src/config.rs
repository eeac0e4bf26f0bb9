//! Application configuration file support.
//!
//! Configuration is read from a TOML file (`waitlist.toml`) with three
//! sections:
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [repository]
//! type = "local"
//! seed_file = "data/sample_seed.json"
//!
//! [engine]
//! timeout_ms = 30000
//! student_issue_policy = "exclude"
//!
//! [engine.grid]
//! day_start = "08:00"
//! day_end = "22:00"
//! quantization_minutes = 15
//! ```
//!
//! Every section and field is optional. A missing file yields the defaults.
//! `HOST`, `PORT` and `WAITLIST_SEED` override the file.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::RepositorySettings;
use crate::engine::{EngineConfig, EngineConfigError};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "WAITLIST_CONFIG";

/// Environment variable overriding `repository.seed_file`.
pub const SEED_ENV: &str = "WAITLIST_SEED";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid environment variable {name}: {message}")]
    Env { name: &'static str, message: String },

    #[error("Invalid repository settings: {0}")]
    Repository(String),

    #[error("Invalid engine settings: {0}")]
    Engine(#[from] EngineConfigError),
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub repository: RepositorySettings,
    pub engine: EngineConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(AppConfig)` if the file was read and parsed
    /// * `Err(ConfigError)` if it cannot be read or parsed
    ///
    /// A relative `repository.seed_file` is resolved against the directory
    /// holding the configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: AppConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let (Some(seed), Some(dir)) = (config.repository.seed_file.as_mut(), path.parent()) {
            if seed.is_relative() {
                let resolved = dir.join(&*seed);
                *seed = resolved;
            }
        }
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Uses `WAITLIST_CONFIG` when set. Otherwise searches for `waitlist.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// Falls back to the defaults when no file is found.
    pub fn from_default_location() -> Result<Self, ConfigError> {
        if let Ok(path) = env::var(CONFIG_ENV) {
            return Self::from_file(path);
        }

        let search_paths = [
            PathBuf::from("waitlist.toml"),
            PathBuf::from("backend/waitlist.toml"),
            PathBuf::from("../waitlist.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("Using configuration file {}", path.display());
                return Self::from_file(&path);
            }
        }

        log::info!("No waitlist.toml found, using default configuration");
        Ok(Self::default())
    }

    /// Apply `HOST`, `PORT` and `WAITLIST_SEED` overrides.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::Env {
                name: "PORT",
                message: format!("'{}' is not a port number", port),
            })?;
        }
        if let Ok(seed) = env::var(SEED_ENV) {
            self.repository.seed_file = Some(PathBuf::from(seed));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.repository
            .repository_type()
            .map_err(ConfigError::Repository)?;
        self.engine.validate()?;
        Ok(())
    }

    /// Default location, then environment overrides, then validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_default_location()?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::StudentIssuePolicy;
    use crate::models::time::hm;
    use std::io::Write;

    #[test]
    fn test_empty_file_is_default() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_reads_all_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9090

[repository]
type = "local"
seed_file = "seed.json"

[engine]
timeout_ms = 500
student_issue_policy = "abort"

[engine.grid]
day_start = "09:00"
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        let dir = file.path().parent().unwrap();
        assert_eq!(config.repository.seed_file, Some(dir.join("seed.json")));
        assert_eq!(config.engine.timeout_ms, 500);
        assert_eq!(config.engine.student_issue_policy, StudentIssuePolicy::Abort);
        assert_eq!(config.engine.grid.day_start, hm(9, 0));
        assert_eq!(config.engine.grid.day_end, hm(22, 0));
    }

    #[test]
    fn test_parse_error_names_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = 1").unwrap();
        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::from_file("/nonexistent/waitlist.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_validate_rejects_bad_engine_settings() {
        let mut config = AppConfig::default();
        config.engine.selector.max_proposals = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Engine(EngineConfigError::ZeroProposals))
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_repository() {
        let mut config = AppConfig::default();
        config.repository.repo_type = "postgres".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Repository(_))));
    }
}
