//! Check command - dry-run the install gate

use crate::config::Config;
use crate::error::GateResult;
use crate::install::InstallGate;
use console::style;

/// Execute the check command
///
/// Returns whether the next boot would run the installer.
pub async fn execute(config: &Config) -> GateResult<bool> {
    let plan = InstallGate::from_config(config).plan().await?;

    println!("{:<14} {}", "Fingerprint:", plan.fingerprint);
    println!(
        "{:<14} {}",
        "Stored:",
        plan.stored
            .as_ref()
            .map(|f| f.to_string())
            .unwrap_or_else(|| style("none").dim().to_string())
    );
    println!("{:<14} {}", "Store file:", plan.store_path.display());

    if let Ok(modified) = std::fs::metadata(&plan.store_path).and_then(|m| m.modified()) {
        let modified: chrono::DateTime<chrono::Local> = modified.into();
        println!(
            "{:<14} {}",
            "Last change:",
            modified.format("%Y-%m-%d %H:%M:%S")
        );
    }

    println!();
    if plan.install_needed {
        println!("{} Install needed on next boot", style("!").yellow());
    } else {
        println!("{} Dependencies up to date", style("✓").green());
    }

    Ok(plan.install_needed)
}
