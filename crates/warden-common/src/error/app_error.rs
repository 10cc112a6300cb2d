//! Application error types
//!
//! Unified error handling for the command and event handlers that sit on top
//! of the services.

use serde::Serialize;
use std::fmt;
use warden_core::DomainError;

use crate::config::ConfigError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Input errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Resource errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    Database(String),

    #[error("Cache error: {0}")]
    Cache(String),

    // Internal errors
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Who is responsible for an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorOrigin {
    /// The invoking user supplied something unusable
    User,
    /// The bot or its infrastructure failed
    System,
}

impl AppError {
    /// Classify the error
    #[must_use]
    pub fn origin(&self) -> ErrorOrigin {
        match self {
            Self::Validation(_) | Self::InvalidInput(_) | Self::NotFound(_) => ErrorOrigin::User,

            Self::Database(_) | Self::Cache(_) | Self::Internal(_) | Self::Config(_) => {
                ErrorOrigin::System
            }

            Self::Domain(e) => {
                if e.is_not_found() || e.is_validation() {
                    ErrorOrigin::User
                } else {
                    ErrorOrigin::System
                }
            }
        }
    }

    /// Get error code for user-facing replies and logs
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Check if the invoking user caused this error
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        self.origin() == ErrorOrigin::User
    }

    /// Check if the system failed
    #[must_use]
    pub fn is_system_error(&self) -> bool {
        self.origin() == ErrorOrigin::System
    }

    /// Create a not found error for a resource type
    #[must_use]
    pub fn not_found(resource: impl fmt::Display) -> Self {
        Self::NotFound(resource.to_string())
    }

    /// Create a validation error
    #[must_use]
    pub fn validation(msg: impl fmt::Display) -> Self {
        Self::Validation(msg.to_string())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Serializable error payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        // System failures are logged in full; users get the generic text.
        let message = match err.origin() {
            ErrorOrigin::User => err.to_string(),
            ErrorOrigin::System => "Something went wrong on our side".to_string(),
        };
        Self {
            code: err.error_code().to_string(),
            message,
            details: None,
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        Self::from(&err)
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
