//! Configuration schema for bower-gate
//!
//! Configuration is stored in `bower-gate.toml` next to the application, or at
//! `~/.config/bower-gate/config.toml`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Application directories
    pub paths: PathsConfig,

    /// Bower dependencies and settings
    pub bower: BowerConfig,

    /// External installer settings
    pub installer: InstallerConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Application directories
///
/// Relative paths are resolved against the directory holding the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Public assets root; manifests are written here and bower runs here
    pub public_root: PathBuf,

    /// Cache root holding the fingerprint file
    pub cache_root: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            public_root: PathBuf::from("public"),
            cache_root: PathBuf::from("cache"),
        }
    }
}

/// Bower settings: the inputs to the install fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BowerConfig {
    /// Name written into the generated bower.json
    pub name: String,

    /// Install directory relative to the public root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,

    /// Pass `--allow-root` to bower
    pub allow_root: bool,

    /// Package name to version constraint
    pub dependencies: HashMap<String, String>,
}

impl Default for BowerConfig {
    fn default() -> Self {
        Self {
            name: "bower-gate-app".to_string(),
            directory: None,
            allow_root: false,
            dependencies: HashMap::new(),
        }
    }
}

impl BowerConfig {
    /// The install directory, if one is actually declared
    ///
    /// Empty and `/` count as undeclared; bower then uses its own default.
    pub fn declared_directory(&self) -> Option<&str> {
        match self.directory.as_deref() {
            None | Some("") | Some("/") => None,
            Some(dir) => Some(dir),
        }
    }
}

/// What to do when the installer exits unsuccessfully
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Abort boot with an error
    #[default]
    Fail,
    /// Log a warning and continue booting
    Warn,
}

/// External installer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    /// Installer executable
    pub command: String,

    /// Policy on nonzero exit or spawn failure
    pub on_failure: FailurePolicy,

    /// Kill the installer after this many seconds (unset = wait forever)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            command: "bower".to_string(),
            on_failure: FailurePolicy::Fail,
            timeout_secs: None,
        }
    }
}
