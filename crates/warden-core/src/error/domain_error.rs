//! Domain errors - error types for the domain layer
//!
//! Absence is never an error here: a missing settings row, override or
//! tracker is modelled as a default or `None` by the callers. What remains
//! are invariant violations and infrastructure failures.

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Guild not found: {0}")]
    GuildNotFound(Snowflake),

    // =========================================================================
    // Invariant Violations
    // =========================================================================
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    #[error("Unknown log type: {0}")]
    UnknownLogType(String),

    #[error("Unknown log override option: {0}")]
    UnknownLogOverride(String),

    #[error("Module {0} has no settings table")]
    ModuleWithoutSettings(&'static str),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid leveling settings: {0}")]
    InvalidLevelingSettings(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for callers that surface errors to users
    pub fn code(&self) -> &'static str {
        match self {
            Self::GuildNotFound(_) => "UNKNOWN_GUILD",

            Self::UnknownModule(_) => "UNKNOWN_MODULE",
            Self::UnknownLogType(_) => "UNKNOWN_LOG_TYPE",
            Self::UnknownLogOverride(_) => "UNKNOWN_LOG_OVERRIDE",
            Self::ModuleWithoutSettings(_) => "MODULE_WITHOUT_SETTINGS",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidLevelingSettings(_) => "INVALID_LEVELING_SETTINGS",

            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::GuildNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidLevelingSettings(_)
        )
    }

    /// Check if this error signals a missing case in the code rather than bad input
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::UnknownModule(_)
                | Self::UnknownLogType(_)
                | Self::UnknownLogOverride(_)
                | Self::ModuleWithoutSettings(_)
        )
    }

    /// Check if the store or cache failed underneath the operation
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::DatabaseError(_) | Self::CacheError(_) | Self::InternalError(_)
        )
    }
}
