// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Refledger.
//!
//! This module contains pure business logic with ZERO external I/O.
//! All storage and gamification concerns are reached via ports (traits)
//! defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No database, network, or external calls
//! - **Immutable ledger**: Entries are recorded once, never mutated
//! - **Rich domain model**: Stamping/negation behavior lives in entities,
//!   not services
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod rewards;
pub mod value_objects;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use entities::{
    booking::Booking,
    common::{BookingId, ConversionId, Reference, UserId},
    conversion::{ConversionRecord, ConversionRecordBuilder},
    ledger::{EntryKey, LedgerEntry, PointsGrant, PointsGrantBuilder},
};

pub use error::{DomainError, ErrorCategory};

pub use rewards::{DEFAULT_REFERRED_POINTS, DEFAULT_REFERRER_POINTS, RewardSchedule};

pub use value_objects::{ConversionStatus, ReferenceKind, ReferenceType};

// Internal only - not re-exported
pub use validation::DomainValidator;
