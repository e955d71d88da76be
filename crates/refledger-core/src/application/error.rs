//! Application layer errors.
//!
//! These errors represent failures in orchestration and store access, not
//! business logic. Business logic errors are `DomainError` from
//! `crate::domain`.
//!
//! Per the subsystem's failure contract: store failures are never caught
//! here; they propagate to the caller unmodified, with no retry and no
//! compensating action. A partial award (referrer recorded, referred-user
//! attempt failed) is left as-is; re-invoking the orchestrator is safe
//! because the recorded side no-ops on the conditional append.

use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Ledger store access failed.
    #[error("Points ledger error: {reason}")]
    LedgerStore { reason: String },

    /// Conversion store access failed.
    #[error("Conversion store error: {reason}")]
    ConversionStore { reason: String },

    /// Booking directory access failed.
    #[error("Booking directory error: {reason}")]
    BookingDirectory { reason: String },

    /// Store access failed (lock poisoned, etc.).
    #[error("Store lock error")]
    StoreLockError,

    /// A record a store operation requires does not exist.
    #[error("{entity} not found: {id}")]
    RecordNotFound { entity: &'static str, id: String },
}

impl ApplicationError {
    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::LedgerStore { .. }
            | Self::ConversionStore { .. }
            | Self::BookingDirectory { .. } => ErrorCategory::Internal,
            Self::StoreLockError => ErrorCategory::Internal,
            Self::RecordNotFound { .. } => ErrorCategory::NotFound,
        }
    }
}
