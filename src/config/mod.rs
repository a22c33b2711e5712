//! Configuration management for bower-gate

pub mod schema;

pub use schema::{BowerConfig, Config, FailurePolicy, InstallerConfig, PathsConfig};

use crate::error::{GateError, GateResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// File name looked up in the working directory and its ancestors
pub const LOCAL_CONFIG_FILE: &str = "bower-gate.toml";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
    explicit: bool,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
            explicit: false,
        }
    }

    /// Create a config manager with a custom path
    ///
    /// Unlike the default path, a custom path must exist when loading.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            explicit: true,
        }
    }

    /// Pick the config path the way the CLI does: explicit path, then the
    /// nearest `bower-gate.toml` above `cwd`, then the user config dir.
    pub fn discover(explicit: Option<PathBuf>, cwd: &Path) -> Self {
        if let Some(path) = explicit {
            return Self::with_path(path);
        }
        match Self::find_local_config(cwd) {
            Some(path) => {
                debug!("Found local config: {}", path.display());
                Self::with_path(path)
            }
            None => Self::new(),
        }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bower-gate")
            .join("config.toml")
    }

    /// Walk up from `start` looking for `bower-gate.toml`
    pub fn find_local_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(LOCAL_CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Load configuration, falling back to defaults when the default file is missing
    ///
    /// Relative paths in `[paths]` are resolved against the config file's
    /// directory, or the current directory when running on defaults.
    pub async fn load(&self) -> GateResult<Config> {
        if !self.config_path.exists() {
            if self.explicit {
                return Err(GateError::ConfigNotFound(self.config_path.clone()));
            }
            debug!("Config file not found, using defaults");
            let cwd = std::env::current_dir()
                .map_err(|e| GateError::io("getting current directory", e))?;
            return Ok(Self::resolve_paths(Config::default(), &cwd));
        }

        let config = self.load_from_file(&self.config_path).await?;
        let base = self
            .config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self::resolve_paths(config, &base))
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> GateResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| GateError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| GateError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn resolve_paths(mut config: Config, base: &Path) -> Config {
        if config.paths.public_root.is_relative() {
            config.paths.public_root = base.join(&config.paths.public_root);
        }
        if config.paths.cache_root.is_relative() {
            config.paths.cache_root = base.join(&config.paths.cache_root);
        }
        config
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
