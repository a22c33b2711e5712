//! Reset command - force a reinstall on the next boot

use crate::config::Config;
use crate::error::GateResult;
use crate::install::InstallGate;
use console::style;

/// Execute the reset command
pub async fn execute(config: &Config) -> GateResult<()> {
    let gate = InstallGate::from_config(config);
    let report = gate.reset().await?;

    if report.fingerprint_removed {
        println!(
            "{} Removed {}",
            style("✓").green(),
            gate.fingerprint_store().path().display()
        );
    } else {
        println!("{} No stored fingerprint", style("-").dim());
    }

    if report.manifests_removed > 0 {
        println!(
            "{} Removed {} leftover manifest(s)",
            style("✓").green(),
            report.manifests_removed
        );
    }

    Ok(())
}
