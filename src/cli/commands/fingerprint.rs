//! Fingerprint command - print the current fingerprint

use crate::config::Config;
use crate::error::GateResult;
use crate::install::compute_fingerprint;

/// Execute the fingerprint command
pub fn execute(config: &Config) -> GateResult<()> {
    println!("{}", compute_fingerprint(&config.bower)?);
    Ok(())
}
