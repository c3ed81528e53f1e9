//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (endpoints, timeouts, thresholds, messages)
//! - The library `Config` and the logging option types
//! - The command-line interface (`Cli`)

mod cli;
mod constants;
mod types;

// Re-export all constants
pub use cli::{Cli, Command, EngineArgs, ServeArgs, VerifyArgs};
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel};
