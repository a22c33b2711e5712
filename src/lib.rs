//! bower-gate - boot-time Bower dependency installs
//!
//! Installs front-end dependencies with bower during application startup,
//! but only when the configured dependency set changed since the last boot.

pub mod cli;
pub mod config;
pub mod error;
pub mod install;

pub use error::{GateError, GateResult};
