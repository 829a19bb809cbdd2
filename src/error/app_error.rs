use crate::config::error::ConfigError;
use crate::error::DatabaseErrorConverter;
use diesel_async::pooled_connection::PoolError;
use thiserror::Error;

/// Application-wide error type that represents all possible errors in the system.
///
/// Every variant belongs to exactly one [`ErrorKind`]; callers that need to
/// branch on "not found" versus "anything else" check the kind instead of
/// matching on concrete variants.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found error with entity, field, and value information
    #[error("Resource not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// Bad request error with descriptive message
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

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

/// Coarse classification used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    Internal,
}

impl AppError {
    /// Shorthand for a missing user looked up by id.
    pub fn user_not_found(id: impl ToString) -> Self {
        AppError::NotFound {
            entity: "user".to_string(),
            field: "id".to_string(),
            value: id.to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound { .. } => ErrorKind::NotFound,
            AppError::BadRequest { .. } | AppError::Validation { .. } => ErrorKind::BadRequest,
            AppError::Database { .. }
            | AppError::Configuration { .. }
            | AppError::ConnectionPool { .. }
            | AppError::Internal { .. } => ErrorKind::Internal,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(error: diesel::result::Error) -> Self {
        DatabaseErrorConverter::convert_diesel_error(error, "database operation")
    }
}

impl From<PoolError> for AppError {
    fn from(error: PoolError) -> Self {
        AppError::ConnectionPool {
            source: anyhow::Error::from(error),
        }
    }
}

impl From<bb8::RunError<PoolError>> for AppError {
    fn from(error: bb8::RunError<PoolError>) -> Self {
        match error {
            bb8::RunError::User(inner) => AppError::from(inner),
            bb8::RunError::TimedOut => AppError::ConnectionPool {
                source: anyhow::anyhow!("timed out waiting for a database connection"),
            },
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = error.field().unwrap_or("configuration").to_string();
        AppError::Configuration {
            key,
            source: anyhow::Error::from(error),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        match fields.first() {
            Some((field, field_errors)) => {
                let reason = field_errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .next()
                    .unwrap_or_else(|| "invalid value".to_string());
                AppError::Validation {
                    field: field.to_string(),
                    reason,
                }
            }
            None => AppError::bad_request("invalid request"),
        }
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::bad_request(format!("invalid request format: {}", rejection.body_text()))
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(max = 3, message = "too long"))]
        name: String,
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(AppError::user_not_found("x").kind(), ErrorKind::NotFound);
        assert_eq!(AppError::bad_request("x").kind(), ErrorKind::BadRequest);
        assert_eq!(
            AppError::Validation {
                field: "f".to_string(),
                reason: "r".to_string()
            }
            .kind(),
            ErrorKind::BadRequest
        );
        assert_eq!(
            AppError::Internal {
                source: anyhow::anyhow!("boom")
            }
            .kind(),
            ErrorKind::Internal
        );
        assert_eq!(
            AppError::ConnectionPool {
                source: anyhow::anyhow!("pool")
            }
            .kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_user_not_found_message() {
        let error = AppError::user_not_found("abc");
        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "Resource not found: user with id=abc");
    }

    #[test]
    fn test_pool_timeout_is_connection_pool_error() {
        let error = AppError::from(bb8::RunError::<PoolError>::TimedOut);
        assert!(matches!(error, AppError::ConnectionPool { .. }));
    }

    #[test]
    fn test_validation_errors_conversion() {
        let sample = Sample {
            name: "abcdef".to_string(),
        };
        let error = AppError::from(sample.validate().unwrap_err());
        match error {
            AppError::Validation { field, reason } => {
                assert_eq!(field, "name");
                assert_eq!(reason, "too long");
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_config_error_conversion_keeps_field() {
        let error = AppError::from(ConfigError::validation("pagination.default_limit", "missing"));
        match error {
            AppError::Configuration { key, .. } => assert_eq!(key, "pagination.default_limit"),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }
}
