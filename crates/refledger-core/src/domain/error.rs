// ============================================================================
// domain/error.rs - COMPREHENSIVE ERROR DOMAIN
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (for retry logic)
/// - Categorizable (for caller display)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid identifier for {field}: must not be empty")]
    EmptyIdentifier { field: &'static str },

    #[error("Invalid grant: {0}")]
    InvalidGrant(String),

    #[error("Grant for reference '{reference_id}' carries zero points")]
    ZeroPointGrant { reference_id: String },

    #[error("Invalid conversion record: {0}")]
    InvalidConversion(String),

    // ========================================================================
    // Parse Errors
    // ========================================================================
    #[error("Unknown reference type tag: {0}")]
    UnknownReferenceType(String),

    #[error("Unknown reference kind: {0}")]
    UnknownReferenceKind(String),

    #[error("Unknown conversion status: {0}")]
    UnknownStatus(String),

    // ========================================================================
    // Conflict / State Errors
    // ========================================================================
    #[error("Entry under '{reference_type}' is itself a reversal and cannot be reversed")]
    NotReversible { reference_type: String },

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Error category for caller display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyIdentifier { .. }
            | Self::InvalidGrant(_)
            | Self::ZeroPointGrant { .. }
            | Self::InvalidConversion(_) => ErrorCategory::Validation,
            Self::UnknownReferenceType(_)
            | Self::UnknownReferenceKind(_)
            | Self::UnknownStatus(_) => ErrorCategory::Validation,
            Self::NotReversible { .. } => ErrorCategory::Conflict,
            Self::MissingRequiredField { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
    Internal,
}
