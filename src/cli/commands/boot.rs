//! Boot command - run the install gate

use crate::config::Config;
use crate::error::GateResult;
use crate::install::{BootReport, InstallGate, InstallOutcome};
use console::style;

/// Execute the boot command
pub async fn execute(config: &Config) -> GateResult<()> {
    let gate = InstallGate::from_config(config);

    match gate.on_boot().await? {
        BootReport::Skipped { .. } => {
            println!("{} Dependencies up to date", style("✓").green());
        }
        BootReport::Installed {
            outcome: InstallOutcome::Success,
            ..
        } => {
            println!("{} Dependencies installed", style("✓").green());
        }
        BootReport::Installed {
            outcome: InstallOutcome::Failed { code, .. },
            ..
        } => {
            let code = code.map_or_else(|| "none".to_string(), |c| c.to_string());
            println!(
                "{} Dependency install failed (exit code: {}), continuing",
                style("!").yellow(),
                code
            );
        }
    }

    Ok(())
}
