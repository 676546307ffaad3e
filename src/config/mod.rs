//! Configuration management
//!
//! Settings are assembled from layered TOML files (`default.toml`,
//! `{environment}.toml`, `local.toml`) and `RSVP_*` environment
//! variables, then validated before the application starts.

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
mod validation;

pub use environment::Environment;
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use settings::{
    ApplicationConfig, BulkSmsConfig, DatabaseConfig, FcmConfig, ProvidersConfig, ServerConfig,
    Settings, SmsRouting, UnifonicConfig, WatcherConfig, WhatsAppConfig,
};
