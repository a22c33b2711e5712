//! Transient bower manifests
//!
//! `bower.json` and `.bowerrc` are generated into the public root before
//! bower runs and removed once it exits.

use crate::config::BowerConfig;
use crate::error::{GateError, GateResult};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Dependency manifest file name
pub const MANIFEST_FILE: &str = "bower.json";

/// Bower configuration file name
pub const BOWERRC_FILE: &str = ".bowerrc";

/// Generated bower.json
#[derive(Debug, Serialize)]
pub struct BowerManifest<'a> {
    pub name: &'a str,
    pub version: &'static str,
    pub dependencies: BTreeMap<&'a str, &'a str>,
}

impl<'a> BowerManifest<'a> {
    pub fn from_config(config: &'a BowerConfig) -> Self {
        Self {
            name: &config.name,
            version: "0.0.0",
            dependencies: config
                .dependencies
                .iter()
                .map(|(name, version)| (name.as_str(), version.as_str()))
                .collect(),
        }
    }
}

/// Generated .bowerrc
#[derive(Debug, Serialize)]
pub struct BowerRc<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<&'a str>,
    pub json: &'static str,
}

impl<'a> BowerRc<'a> {
    pub fn from_config(config: &'a BowerConfig) -> Self {
        Self {
            directory: config.directory.as_deref(),
            json: MANIFEST_FILE,
        }
    }
}

/// Paths of the generated files for one public root
#[derive(Debug, Clone)]
pub struct ManifestFiles {
    pub manifest: PathBuf,
    pub bowerrc: PathBuf,
}

impl ManifestFiles {
    pub fn new(public_root: &Path) -> Self {
        Self {
            manifest: public_root.join(MANIFEST_FILE),
            bowerrc: public_root.join(BOWERRC_FILE),
        }
    }

    fn all(&self) -> [&Path; 2] {
        [self.bowerrc.as_path(), self.manifest.as_path()]
    }
}

/// Serialize with 4-space indentation, the way bower writes its own files
fn to_pretty_json<T: Serialize>(value: &T) -> GateResult<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Create `<public_root>/<directory>` recursively when a directory is declared
///
/// Returns the created path, or `None` when nothing had to be created.
pub async fn ensure_target_directory(
    public_root: &Path,
    config: &BowerConfig,
) -> GateResult<Option<PathBuf>> {
    let Some(directory) = config.declared_directory() else {
        return Ok(None);
    };

    let target = public_root.join(directory.trim_start_matches('/'));
    if target.exists() {
        return Ok(None);
    }

    fs::create_dir_all(&target)
        .await
        .map_err(|e| GateError::io(format!("creating directory {}", target.display()), e))?;
    debug!("Created target directory {}", target.display());
    Ok(Some(target))
}

/// Write bower.json and .bowerrc into the public root
pub async fn write_manifests(public_root: &Path, config: &BowerConfig) -> GateResult<ManifestFiles> {
    let files = ManifestFiles::new(public_root);

    let manifest = to_pretty_json(&BowerManifest::from_config(config))?;
    fs::write(&files.manifest, manifest)
        .await
        .map_err(|e| GateError::io(format!("writing {}", files.manifest.display()), e))?;

    let bowerrc = to_pretty_json(&BowerRc::from_config(config))?;
    fs::write(&files.bowerrc, bowerrc)
        .await
        .map_err(|e| GateError::io(format!("writing {}", files.bowerrc.display()), e))?;

    debug!("Wrote manifests into {}", public_root.display());
    Ok(files)
}

/// Remove the generated files; missing files are fine
///
/// Failures are logged rather than returned: by the time cleanup runs the
/// install has already happened.
pub async fn remove_manifests(files: &ManifestFiles) -> usize {
    let mut removed = 0;
    for path in files.all() {
        match fs::remove_file(path).await {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
        }
    }
    removed
}
