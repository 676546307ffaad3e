use thiserror::Error;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed for field '{field}': {message}")]
    ValidationError { field: String, message: String },

    #[error("Environment variable error: {0}")]
    EnvVarError(String),

    #[error("Mutually exclusive settings: {0}")]
    MutualExclusivityError(String),

    #[error(transparent)]
    Other(#[from] config::ConfigError),
}

impl ConfigError {
    /// Creates a validation error for a named field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a file-not-found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound(path.into())
    }

    /// Creates a mutual-exclusivity error.
    pub fn mutual_exclusivity(message: impl Into<String>) -> Self {
        Self::MutualExclusivityError(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display() {
        let err = ConfigError::validation("server.port", "must be non-zero");
        assert_eq!(
            err.to_string(),
            "Configuration validation failed for field 'server.port': must be non-zero"
        );
    }

    #[test]
    fn file_not_found_display() {
        let err = ConfigError::file_not_found("config/missing.toml");
        assert_eq!(
            err.to_string(),
            "Configuration file not found: config/missing.toml"
        );
    }

    #[test]
    fn mutual_exclusivity_display() {
        let err = ConfigError::mutual_exclusivity("RSVP_CONFIG_DIR and RSVP_CONFIG_FILE");
        assert_eq!(
            err.to_string(),
            "Mutually exclusive settings: RSVP_CONFIG_DIR and RSVP_CONFIG_FILE"
        );
    }
}
