//! CLI module for rsvp-relay
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing with clap
//! - Configuration merging (CLI args + config files)
//! - Command execution and validation
//! - Command handlers for serve and migrate operations

pub mod parser;
pub mod validation;
pub mod config_merger;
pub mod handlers;
pub mod executor;

// Re-export public types for convenience
pub use parser::{Cli, Commands, Environment, LogLevel};
pub use config_merger::ConfigurationMerger;
pub use executor::execute_command;

use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Load and merge configuration from CLI arguments
///
/// This function handles the complete configuration loading process:
/// 1. Apply the `--env` override, if given, before any file is read
/// 2. Load base configuration from files
/// 3. Merge CLI argument overrides
/// 4. Validate the final configuration
///
/// # Arguments
/// * `cli` - Parsed CLI arguments
///
/// # Returns
/// Merged and validated Settings
///
/// # Errors
/// Returns error if configuration loading, merging, or validation fails
pub fn load_and_merge_config(cli: &Cli) -> Result<Settings, ConfigError> {
    if let Some(env) = &cli.env {
        let env: crate::config::Environment = env.clone().into();
        // The loader reads the environment from RSVP_APP_ENV.
        unsafe {
            std::env::set_var(crate::config::environment::ENV_VAR, env.as_str());
        }
    }
    let merger = ConfigurationMerger::from_config_path(cli.config.as_ref())?;
    merger.merge_cli_args(cli)
}
