//! Merges CLI flag overrides into file-based configuration.
//!
//! Precedence, lowest to highest: configuration files, environment
//! variables, CLI flags. The merged result is validated once at the end
//! so every source has had its say first.

use std::path::PathBuf;

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, settings::Settings};

/// Applies CLI flag overrides on top of loaded settings.
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads settings through the standard loader, pointing it at an
    /// explicit file when `--config` was given.
    ///
    /// # Errors
    /// Returns `ConfigError` when loading or deserialization fails.
    pub fn from_config_path(config_path: Option<&PathBuf>) -> Result<Self, ConfigError> {
        let config = match config_path {
            Some(path) => Self::load_from_file(path)?,
            None => ConfigLoader::new()?.load()?,
        };
        Ok(Self::new(config))
    }

    /// Loads settings from one explicit file. The loader picks the file
    /// up through `RSVP_CONFIG_FILE`; the variable is cleared afterwards
    /// so a `--config` run leaves no trace in the process environment.
    fn load_from_file(path: &PathBuf) -> Result<Settings, ConfigError> {
        unsafe {
            std::env::set_var("RSVP_CONFIG_FILE", path);
        }
        let result = ConfigLoader::new().and_then(|loader| loader.load());
        unsafe {
            std::env::remove_var("RSVP_CONFIG_FILE");
        }
        result
    }

    /// Returns the base settings with `cli`'s overrides applied and the
    /// result validated.
    ///
    /// Global `--verbose`/`--quiet` adjust the log level; `serve` flags
    /// override host, port and log level, with the command-level
    /// `--log-level` beating the global flags.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            dry_run: _,
        }) = &cli.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            if let Some(level) = log_level {
                config.logger.level = level.clone().into();
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn base_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/rsvp_test".to_string();
        config
    }

    fn merge(args: &[&str]) -> Result<Settings, ConfigError> {
        let cli = Cli::try_parse_from(args).unwrap();
        ConfigurationMerger::new(base_config()).merge_cli_args(&cli)
    }

    #[test]
    fn test_verbose_raises_log_level() {
        let merged = merge(&["rsvp-relay", "--verbose"]).unwrap();
        assert_eq!(merged.logger.level, "debug");
    }

    #[test]
    fn test_quiet_lowers_log_level() {
        let merged = merge(&["rsvp-relay", "--quiet"]).unwrap();
        assert_eq!(merged.logger.level, "error");
    }

    #[test]
    fn test_serve_host_and_port_override_files() {
        let merged =
            merge(&["rsvp-relay", "serve", "--host", "0.0.0.0", "--port", "8080"]).unwrap();
        assert_eq!(merged.server.host, "0.0.0.0");
        assert_eq!(merged.server.port, 8080);
    }

    #[test]
    fn test_command_log_level_beats_global_flags() {
        let merged =
            merge(&["rsvp-relay", "--verbose", "serve", "--log-level", "warn"]).unwrap();
        assert_eq!(merged.logger.level, "warn");
    }

    #[test]
    fn test_merged_config_is_validated() {
        let mut config = base_config();
        config.database.url = "mysql://localhost/rsvp".to_string();
        let cli = Cli::try_parse_from(["rsvp-relay", "serve"]).unwrap();
        assert!(ConfigurationMerger::new(config).merge_cli_args(&cli).is_err());
    }

    #[test]
    fn test_base_config_is_untouched_by_merging() {
        let merger = ConfigurationMerger::new(base_config());
        let cli = Cli::try_parse_from(["rsvp-relay", "--verbose"]).unwrap();
        merger.merge_cli_args(&cli).unwrap();
        assert_eq!(merger.config().logger.level, base_config().logger.level);
    }
}
