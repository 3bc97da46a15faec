//! CLI module for fxpack
//!
//! Command handlers plus logging setup.

mod commands;
mod logging;

pub use commands::run_command;
pub use logging::init_logging;

// Re-export Cli from config for convenience
pub use crate::config::Cli;
