//! Boot-time Bower install gate
//!
//! Skips `bower update` when the dependency settings have not changed since
//! the last boot.
//!
//! # Files
//!
//! | Path | Lifetime | Description |
//! |------|----------|-------------|
//! | `<public_root>/bower.json` | transient | Dependency manifest read by bower |
//! | `<public_root>/.bowerrc` | transient | Points bower at the install directory |
//! | `<cache_root>/.bower-checksum` | persistent | Fingerprint of the last attempted install |

pub mod fingerprint;
pub mod gate;
pub mod manifest;
pub mod runner;

pub use fingerprint::{compute_fingerprint, should_install, Fingerprint, FingerprintStore};
pub use gate::{BootReport, GateServices, InstallGate, Plan, ResetReport};
pub use manifest::{ensure_target_directory, remove_manifests, write_manifests, ManifestFiles};
pub use runner::{BowerCli, InstallOutcome, InstallRequest, Installer, OutputSink, TracingSink};
