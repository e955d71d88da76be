//! Application layer for Refledger.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ReferralService, LedgerService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business rules itself. Payout amounts, tag pairing, and stamping
//! semantics all live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{LedgerService, ReferralService};

// Re-export port traits (for adapter implementation)
pub use ports::{
    AppendOutcome, AwardOutcome, BookingDirectory, ConversionStore, PointsAwarder, PointsLedger,
};

pub use error::ApplicationError;
