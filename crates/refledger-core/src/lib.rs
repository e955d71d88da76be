//! Refledger Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the
//! referral points ledger, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │     Booking lifecycle (host app)        │
//! │   (payment confirmed / refunded hooks)  │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │    (ReferralService, LedgerService)     │
//! │        Orchestrates Use Cases           │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │ (PointsLedger, PointsAwarder, Stores)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   refledger-adapters (Infrastructure)   │
//! │ (InMemoryLedger, LedgerBackedAwarder…)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (LedgerEntry, ConversionRecord, Grant)  │
//! │         No External Dependencies        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use refledger_core::{
//!     application::ReferralService,
//!     domain::BookingId,
//! };
//!
//! // 1. Wire the service with injected adapters
//! let service = ReferralService::new(conversions, bookings, ledger, awarder);
//!
//! // 2. Booking paid: award both referral parties, exactly once
//! service.award_booking_points(&BookingId::new("b1"))?;
//!
//! // 3. Booking refunded: negate whatever was awarded, exactly once
//! service.revoke_booking_points(&BookingId::new("b1"))?;
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        LedgerService, ReferralService,
        ports::{
            AppendOutcome, AwardOutcome, BookingDirectory, ConversionStore, PointsAwarder,
            PointsLedger,
        },
    };
    pub use crate::domain::{
        Booking, BookingId, ConversionId, ConversionRecord, ConversionStatus, EntryKey,
        LedgerEntry, PointsGrant, Reference, ReferenceKind, ReferenceType, RewardSchedule, UserId,
    };
    pub use crate::error::{RefledgerError, RefledgerResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
