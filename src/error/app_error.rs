use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Application-wide error type covering every failure that can cross a
/// handler or service boundary.
///
/// Provider-side send failures are deliberately NOT represented here; the
/// relay recovers those into `SendResult { success: false }` before they can
/// propagate. `AppError` is reserved for storage, configuration and boundary
/// faults that map onto non-2xx HTTP responses.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found error with entity, field, and value information
    #[error("Resource not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// Duplicate entry error for unique constraint violations
    #[error("Duplicate entry: {entity}.{field} = '{value}' already exists")]
    Duplicate {
        entity: String,
        field: String,
        value: String,
    },

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Bad request error with descriptive message
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Database operation error with operation context
    #[error("Database operation failed: {operation}")]
    Database {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Connection pool error
    #[error("Connection pool error")]
    ConnectionPool {
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Shorthand for the common lookup-miss case.
    pub fn not_found(entity: &str, field: &str, value: impl Into<String>) -> Self {
        AppError::NotFound {
            entity: entity.to_string(),
            field: field.to_string(),
            value: value.into(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(error: DieselError) -> Self {
        convert_diesel_error(error, "database operation")
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(error: crate::config::ConfigError) -> Self {
        AppError::Configuration {
            key: "settings".to_string(),
            source: anyhow::Error::from(error),
        }
    }
}

/// Converts a Diesel error into the matching [`AppError`] variant.
///
/// Unique violations become `Duplicate` with entity/field recovered from the
/// Postgres constraint name (`<table>_<column>_key`); everything else keeps
/// the operation context for logging.
pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
    match error {
        DieselError::NotFound => AppError::NotFound {
            entity: "resource".to_string(),
            field: "id".to_string(),
            value: "unknown".to_string(),
        },
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            if let Some((entity, field)) = parse_unique_constraint(info.constraint_name()) {
                AppError::Duplicate {
                    entity,
                    field,
                    value: "supplied value".to_string(),
                }
            } else {
                AppError::Database {
                    operation: operation.to_string(),
                    source: anyhow::Error::msg(format!(
                        "Unique constraint violation: {}",
                        info.message()
                    )),
                }
            }
        }
        other => AppError::Database {
            operation: operation.to_string(),
            source: anyhow::Error::from(other),
        },
    }
}

/// Splits a Postgres unique constraint name like `guests_invitation_id_key`
/// into `("guests", "invitation_id")`.
fn parse_unique_constraint(name: Option<&str>) -> Option<(String, String)> {
    let name = name?;
    let trimmed = name
        .strip_suffix("_key")
        .or_else(|| name.strip_suffix("_idx"))
        .unwrap_or(name);
    let (entity, field) = trimmed.split_once('_')?;
    if entity.is_empty() || field.is_empty() {
        return None;
    }
    Some((entity.to_string(), field.to_string()))
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
