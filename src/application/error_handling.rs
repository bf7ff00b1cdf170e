// src/application/error_handling.rs
//
// User-facing error notices
//
// ARCHITECTURE:
// - Maps internal errors → notices the UI can show as-is
// - One consistent shape for every failure
// - Never exposes SQL or transport internals in `message`
// - Logs the full error for debugging

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::error::AppError;

/// Error notice kept in diary state and shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
}

/// Error categories for UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Resource not found (404)
    NotFound,

    /// Invalid input, caught locally or rejected by the backend (400)
    Validation,

    /// Session missing or CSRF check failed (401/403)
    Unauthorized,

    /// Another submission is still running
    Busy,

    /// Database/persistence error (500)
    Database,

    /// Backend unreachable or failing (502)
    ExternalService,

    /// File system error (500)
    FileSystem,

    /// Other/unknown error (500)
    Internal,
}

impl ErrorResponse {
    fn new(error_type: ErrorType, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            error_type,
            message: message.into(),
            details,
        }
    }

    /// Create error response from AppError
    pub fn from_app_error(error: &AppError) -> Self {
        match error {
            AppError::NotFound => Self::new(ErrorType::NotFound, "Resource not found", None),

            AppError::Domain(DomainError::NotFound(what)) => {
                Self::new(ErrorType::NotFound, format!("{} not found", what), None)
            }

            AppError::Domain(domain_error) => {
                Self::new(ErrorType::Validation, domain_error.to_string(), None)
            }

            AppError::SubmissionInFlight => Self::new(
                ErrorType::Busy,
                "Still saving the previous entry, please wait",
                None,
            ),

            AppError::Http { status, body } => {
                log::error!("Backend returned {}: {:?}", status, body);

                match status {
                    400 | 422 => Self::new(
                        ErrorType::Validation,
                        "The server rejected the entry",
                        body.clone(),
                    ),
                    401 | 403 => Self::new(
                        ErrorType::Unauthorized,
                        "Your session has expired, please sign in again",
                        None,
                    ),
                    404 => Self::new(ErrorType::NotFound, "The entry no longer exists", None),
                    _ => Self::new(
                        ErrorType::ExternalService,
                        format!("The server failed to handle the request (status {})", status),
                        body.clone(),
                    ),
                }
            }

            AppError::Transport(message) => {
                log::error!("Transport error: {}", message);

                Self::new(
                    ErrorType::ExternalService,
                    "Could not reach the server",
                    Some(message.clone()),
                )
            }

            AppError::Database(db_error) => {
                log::error!("Database error: {:?}", db_error);

                Self::new(
                    ErrorType::Database,
                    "Database operation failed",
                    Some("Check logs for details".to_string()),
                )
            }

            AppError::Pool(pool_error) => {
                log::error!("Connection pool error: {}", pool_error);

                Self::new(ErrorType::Database, "Database connection failed", None)
            }

            AppError::Serialization(serde_error) => {
                log::error!("Serialization error: {:?}", serde_error);

                Self::new(ErrorType::Internal, "Data serialization failed", None)
            }

            AppError::Io(io_error) => {
                log::error!("IO error: {:?}", io_error);

                Self::new(
                    ErrorType::FileSystem,
                    "File system operation failed",
                    Some(io_error.to_string()),
                )
            }

            AppError::Config(message) => {
                Self::new(ErrorType::Internal, "Configuration error", Some(message.clone()))
            }

            AppError::Other(message) => {
                log::error!("Other error: {}", message);

                Self::new(ErrorType::Internal, message.clone(), None)
            }
        }
    }

    /// Create validation error
    pub fn validation(message: String) -> Self {
        Self::new(ErrorType::Validation, message, None)
    }

    /// Create not found error
    pub fn not_found(resource: &str) -> Self {
        Self::new(ErrorType::NotFound, format!("{} not found", resource), None)
    }
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        Self::from_app_error(error)
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{} ({})", self.message, details),
            None => write!(f, "{}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = ErrorResponse::from_app_error(&AppError::NotFound);
        assert_eq!(error.error_type, ErrorType::NotFound);
        assert_eq!(error.message, "Resource not found");
        assert!(!error.success);
    }

    #[test]
    fn test_validation_error() {
        let error = ErrorResponse::validation("Invalid input".to_string());
        assert_eq!(error.error_type, ErrorType::Validation);
        assert_eq!(error.message, "Invalid input");
    }

    #[test]
    fn test_missing_field_is_validation() {
        let error = ErrorResponse::from_app_error(&AppError::Domain(DomainError::MissingField(
            "title",
        )));
        assert_eq!(error.error_type, ErrorType::Validation);
        assert!(error.message.contains("title"));
    }

    #[test]
    fn test_server_error_notice() {
        let error = ErrorResponse::from_app_error(&AppError::Http {
            status: 500,
            body: Some("Traceback".to_string()),
        });
        assert_eq!(error.error_type, ErrorType::ExternalService);
        assert!(error.message.contains("500"));
        assert_eq!(error.details.as_deref(), Some("Traceback"));
    }

    #[test]
    fn test_forbidden_is_unauthorized() {
        let error = ErrorResponse::from_app_error(&AppError::Http {
            status: 403,
            body: Some("CSRF verification failed".to_string()),
        });
        assert_eq!(error.error_type, ErrorType::Unauthorized);
        assert!(error.details.is_none());
    }

    #[test]
    fn test_in_flight_is_busy() {
        let error = ErrorResponse::from_app_error(&AppError::SubmissionInFlight);
        assert_eq!(error.error_type, ErrorType::Busy);
    }

    #[test]
    fn test_serialization() {
        let error = ErrorResponse::not_found("Rubric");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("not_found"));
        assert!(json.contains("Rubric not found"));
    }
}
