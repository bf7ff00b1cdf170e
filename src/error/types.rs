// src/error/types.rs
use crate::domain::DomainError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend answered with a non-success status
    #[error("Backend returned status {status}")]
    Http { status: u16, body: Option<String> },

    /// The request never produced a response (connection, timeout, decoding)
    #[error("Backend request failed: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("A submission is already in progress")]
    SubmissionInFlight,

    #[error("Resource not found")]
    NotFound,

    #[error("Other error: {0}")]
    Other(String),
}

impl AppError {
    /// True for failures that happened at the backend boundary
    pub fn is_remote(&self) -> bool {
        matches!(self, AppError::Http { .. } | AppError::Transport(_))
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => AppError::Http {
                status: status.as_u16(),
                body: None,
            },
            None => AppError::Transport(err.to_string()),
        }
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::Other(format!("Date parse error: {}", err))
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_errors_are_flagged() {
        assert!(AppError::Http { status: 500, body: None }.is_remote());
        assert!(AppError::Transport("connection refused".to_string()).is_remote());
        assert!(!AppError::NotFound.is_remote());
        assert!(!AppError::SubmissionInFlight.is_remote());
    }

    #[test]
    fn test_serializes_as_message() {
        let json = serde_json::to_string(&AppError::Http { status: 502, body: None }).unwrap();
        assert_eq!(json, "\"Backend returned status 502\"");
    }
}
