//! Command-line host for the install gate

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, LogFormat};
