//! Error types for bower-gate
//!
//! All modules use `GateResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for bower-gate operations
pub type GateResult<T> = Result<T, GateError>;

/// All errors that can occur in bower-gate
#[derive(Error, Debug)]
pub enum GateError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    // Boot errors
    #[error("Boot aborted while {step}: {source}")]
    FatalBoot {
        step: &'static str,
        #[source]
        source: Box<GateError>,
    },

    /// `source` is set when the installer could not be started at all
    #[error("Installer failed (exit code: {}): {output}", exit_label(code))]
    InstallFailed {
        code: Option<i32>,
        output: String,
        #[source]
        source: Option<Box<GateError>>,
    },

    #[error("Invalid fingerprint: {0}")]
    FingerprintInvalid(String),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none".to_string(),
    }
}

impl GateError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Wrap a setup-phase error so the host knows boot must not continue
    pub fn fatal_boot(step: &'static str, source: GateError) -> Self {
        Self::FatalBoot {
            step,
            source: Box::new(source),
        }
    }

    /// Whether this error came from the setup phase of a boot
    pub fn is_fatal_boot(&self) -> bool {
        matches!(self, Self::FatalBoot { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::InstallFailed {
                source: Some(_), ..
            } => Some("Is bower installed? Run: npm install -g bower"),
            Self::InstallFailed { .. } => {
                Some("Set installer.on_failure = \"warn\" to continue booting after a failed install")
            }
            Self::ConfigNotFound(_) => Some("Create bower-gate.toml or pass --config"),
            Self::FatalBoot { source, .. } => source.hint(),
            _ => None,
        }
    }
}
