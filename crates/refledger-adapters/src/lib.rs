//! Infrastructure adapters for Refledger.
//!
//! This crate implements the ports defined in
//! `refledger-core::application::ports`. Every adapter here is an
//! in-memory, thread-safe implementation — the substitutable fakes the
//! core's property tests run against, and a workable backend for embedded
//! or single-process deployments. A SQL adapter would implement the same
//! traits over a connection pool.

pub mod booking_directory;
pub mod conversion_store;
pub mod gamification;
pub mod ledger_store;

// Re-export commonly used adapters
pub use booking_directory::InMemoryBookings;
pub use conversion_store::InMemoryConversions;
pub use gamification::{LedgerBackedAwarder, MemberProgress};
pub use ledger_store::InMemoryLedger;
