//! Install fingerprinting
//!
//! A fingerprint is a SHA256 digest over the settings that decide what bower
//! installs: the sorted dependency list and the install directory. Same
//! settings = same fingerprint, regardless of dependency order.

use crate::config::BowerConfig;
use crate::error::{GateError, GateResult};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::fs;
use tracing::{debug, warn};

/// File name of the persisted fingerprint under the cache root
pub const FINGERPRINT_FILE: &str = ".bower-checksum";

/// Hex-encoded SHA256 digest of the install settings
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Hex digest length
    pub const LEN: usize = 64;

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Fingerprint {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let valid = s.len() == Self::LEN
            && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(GateError::FingerprintInvalid(s.to_string()))
        }
    }
}

/// Canonical structure that gets hashed
#[derive(Serialize)]
struct FingerprintInput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    directory: Option<&'a str>,
    deps: Vec<String>,
}

/// Compute the fingerprint of a bower configuration
///
/// `allow_root` and the manifest name do not change what gets installed, so
/// they are left out.
pub fn compute_fingerprint(config: &BowerConfig) -> GateResult<Fingerprint> {
    let mut deps: Vec<String> = config
        .dependencies
        .iter()
        .map(|(name, version)| format!("{}-{}", name, version))
        .collect();
    deps.sort();

    let input = FingerprintInput {
        directory: config.directory.as_deref(),
        deps,
    };
    let canonical = serde_json::to_vec(&input)?;

    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    Ok(Fingerprint(hex::encode(hasher.finalize())))
}

/// Decide whether an install is needed
///
/// Only a stored fingerprint equal to the computed one skips the install.
pub fn should_install(stored: Option<&Fingerprint>, computed: &Fingerprint) -> bool {
    stored != Some(computed)
}

/// The single persisted fingerprint on disk
#[derive(Debug, Clone)]
pub struct FingerprintStore {
    path: PathBuf,
}

impl FingerprintStore {
    /// Store at `<cache_root>/.bower-checksum`
    pub fn new(cache_root: &Path) -> Self {
        Self {
            path: cache_root.join(FINGERPRINT_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored fingerprint
    ///
    /// A missing file is `None`. So is unparseable content, which then gets
    /// overwritten on the next install.
    pub async fn load(&self) -> GateResult<Option<Fingerprint>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(GateError::io(
                    format!("reading fingerprint {}", self.path.display()),
                    e,
                ))
            }
        };

        match content.parse() {
            Ok(fingerprint) => Ok(Some(fingerprint)),
            Err(e) => {
                warn!("Ignoring stored fingerprint at {}: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }

    /// Persist a fingerprint, creating the cache root if needed
    pub async fn save(&self, fingerprint: &Fingerprint) -> GateResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| GateError::io(format!("creating {}", parent.display()), e))?;
        }
        fs::write(&self.path, fingerprint.as_str())
            .await
            .map_err(|e| GateError::io(format!("writing fingerprint {}", self.path.display()), e))
    }

    /// Compare against the stored fingerprint, overwriting it when they differ
    ///
    /// Returns true when an install is needed. The store is updated before the
    /// install runs, so a crashed install is not retried on the next boot.
    pub async fn check_and_update(&self, computed: &Fingerprint) -> GateResult<bool> {
        let stored = self.load().await?;
        let needed = should_install(stored.as_ref(), computed);
        if needed {
            debug!(
                "Fingerprint changed ({} -> {})",
                stored.as_ref().map(Fingerprint::as_str).unwrap_or("none"),
                computed
            );
            self.save(computed).await?;
        }
        Ok(needed)
    }

    /// Remove the stored fingerprint; returns whether one existed
    pub async fn clear(&self) -> GateResult<bool> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(GateError::io(
                format!("removing fingerprint {}", self.path.display()),
                e,
            )),
        }
    }
}
