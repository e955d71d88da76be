//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `refledger-adapters`
//! implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `PointsLedger`: Append-only points history store
//!   - `PointsAwarder`: The gamification award primitive
//!   - `ConversionStore`: Conversion record storage
//!   - `BookingDirectory`: Read-only booking lookups
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (The booking lifecycle invokes `ReferralService` directly)

pub mod output;

pub use output::{
    AppendOutcome, AwardOutcome, BookingDirectory, ConversionStore, PointsAwarder, PointsLedger,
};
