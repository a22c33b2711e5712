//! Boot-time install gate
//!
//! Runs once per boot: materialize manifests, compare fingerprints and only
//! run the installer when the bower settings changed since the last boot.
//!
//! # Ordering
//!
//! target directory → manifests → fingerprint check (store updated) →
//! installer → manifest cleanup → return.
//!
//! Setup failures come back as [`GateError::FatalBoot`]; the host decides how
//! to shut down. Installer failures follow [`FailurePolicy`].

use crate::config::{BowerConfig, Config, FailurePolicy, InstallerConfig, PathsConfig};
use crate::error::{GateError, GateResult};
use crate::install::fingerprint::{
    compute_fingerprint, should_install, Fingerprint, FingerprintStore,
};
use crate::install::manifest::{
    ensure_target_directory, remove_manifests, write_manifests, ManifestFiles,
};
use crate::install::runner::{
    BowerCli, InstallOutcome, InstallRequest, Installer, OutputSink, TracingSink,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

/// Collaborators the gate talks to
pub struct GateServices {
    /// Runs the external installer
    pub installer: Box<dyn Installer>,
    /// Receives installer output
    pub sink: Box<dyn OutputSink>,
}

impl GateServices {
    /// The real bower executable, logging through tracing
    pub fn from_config(config: &InstallerConfig) -> Self {
        let installer = BowerCli::new(config.command.clone())
            .with_timeout(config.timeout_secs.map(Duration::from_secs));
        Self {
            installer: Box::new(installer),
            sink: Box::new(TracingSink),
        }
    }
}

/// What a boot did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootReport {
    /// Fingerprint unchanged; installer not run
    Skipped { fingerprint: Fingerprint },
    /// Installer ran; `outcome` is a failure only under [`FailurePolicy::Warn`]
    Installed {
        fingerprint: Fingerprint,
        outcome: InstallOutcome,
    },
}

impl BootReport {
    pub fn fingerprint(&self) -> &Fingerprint {
        match self {
            Self::Skipped { fingerprint } | Self::Installed { fingerprint, .. } => fingerprint,
        }
    }
}

/// Result of a dry-run check
#[derive(Debug, Clone)]
pub struct Plan {
    pub fingerprint: Fingerprint,
    pub stored: Option<Fingerprint>,
    pub store_path: PathBuf,
    pub install_needed: bool,
}

/// Result of a reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetReport {
    pub fingerprint_removed: bool,
    pub manifests_removed: usize,
}

/// Decides whether bower needs to run and runs it
pub struct InstallGate {
    bower: BowerConfig,
    paths: PathsConfig,
    on_failure: FailurePolicy,
    services: GateServices,
}

impl InstallGate {
    pub fn new(config: &Config, services: GateServices) -> Self {
        Self {
            bower: config.bower.clone(),
            paths: config.paths.clone(),
            on_failure: config.installer.on_failure,
            services,
        }
    }

    /// Gate backed by the real installer
    pub fn from_config(config: &Config) -> Self {
        Self::new(config, GateServices::from_config(&config.installer))
    }

    pub fn fingerprint_store(&self) -> FingerprintStore {
        FingerprintStore::new(&self.paths.cache_root)
    }

    /// Boot hook entry point
    pub async fn on_boot(&self) -> GateResult<BootReport> {
        let (files, fingerprint, needed) = self.prepare().await?;

        if !needed {
            info!("Bower: nothing to install");
            remove_manifests(&files).await;
            return Ok(BootReport::Skipped { fingerprint });
        }

        info!("Bower: installing dependencies");
        let request = InstallRequest {
            working_dir: self.paths.public_root.clone(),
            allow_root: self.bower.allow_root,
        };
        let (outcome, spawn_error) = match self
            .services
            .installer
            .update(&request, self.services.sink.as_ref())
            .await
        {
            Ok(outcome) => (outcome, None),
            Err(e) => (
                InstallOutcome::failed_without_exit(e.to_string(), &[]),
                Some(e),
            ),
        };

        remove_manifests(&files).await;

        let InstallOutcome::Failed { code, tail } = &outcome else {
            info!("Bower: done installing dependencies");
            return Ok(BootReport::Installed {
                fingerprint,
                outcome,
            });
        };
        let code = *code;
        let output = tail.join("\n");
        let command = self.services.installer.describe(&request);

        match self.on_failure {
            FailurePolicy::Fail => {
                error!("Bower: {} failed", command);
                Err(GateError::InstallFailed {
                    code,
                    output,
                    source: spawn_error.map(Box::new),
                })
            }
            FailurePolicy::Warn => {
                warn!(
                    "Bower: {} failed (exit code {:?}), continuing boot",
                    command, code
                );
                Ok(BootReport::Installed {
                    fingerprint,
                    outcome,
                })
            }
        }
    }

    /// Setup phase; every failure here is fatal for the boot
    async fn prepare(&self) -> GateResult<(ManifestFiles, Fingerprint, bool)> {
        ensure_target_directory(&self.paths.public_root, &self.bower)
            .await
            .map_err(|e| GateError::fatal_boot("creating target directory", e))?;

        let files = write_manifests(&self.paths.public_root, &self.bower)
            .await
            .map_err(|e| GateError::fatal_boot("writing manifests", e))?;

        let checked = async {
            let fingerprint = compute_fingerprint(&self.bower)
                .map_err(|e| GateError::fatal_boot("computing fingerprint", e))?;
            let needed = self
                .fingerprint_store()
                .check_and_update(&fingerprint)
                .await
                .map_err(|e| GateError::fatal_boot("updating fingerprint store", e))?;
            Ok::<_, GateError>((fingerprint, needed))
        }
        .await;

        match checked {
            Ok((fingerprint, needed)) => Ok((files, fingerprint, needed)),
            Err(e) => {
                remove_manifests(&files).await;
                Err(e)
            }
        }
    }

    /// Report whether the next boot would install, without touching disk
    pub async fn plan(&self) -> GateResult<Plan> {
        let fingerprint = compute_fingerprint(&self.bower)?;
        let store = self.fingerprint_store();
        let stored = store.load().await?;
        let install_needed = should_install(stored.as_ref(), &fingerprint);
        Ok(Plan {
            fingerprint,
            stored,
            store_path: store.path().to_path_buf(),
            install_needed,
        })
    }

    /// Forget the stored fingerprint and remove leftover manifests
    pub async fn reset(&self) -> GateResult<ResetReport> {
        let fingerprint_removed = self.fingerprint_store().clear().await?;
        let files = ManifestFiles::new(&self.paths.public_root);
        let manifests_removed = remove_manifests(&files).await;
        Ok(ResetReport {
            fingerprint_removed,
            manifests_removed,
        })
    }
}
