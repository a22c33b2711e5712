//! CLI command implementations

pub mod boot;
pub mod check;
pub mod completions;
pub mod config;
pub mod fingerprint;
pub mod reset;

pub use boot::execute as boot;
pub use check::execute as check;
pub use completions::execute as completions;
pub use config::execute as config;
pub use fingerprint::execute as fingerprint;
pub use reset::execute as reset;
