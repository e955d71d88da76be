//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `refledger-adapters` crate provides implementations.

use chrono::{DateTime, Utc};

use crate::domain::{
    Booking, BookingId, ConversionId, ConversionRecord, EntryKey, LedgerEntry, PointsGrant,
    Reference, ReferenceType, UserId,
};
use crate::error::RefledgerResult;

/// Result of a conditional ledger append.
#[derive(Debug, Clone, PartialEq)]
pub enum AppendOutcome {
    /// The entry was written; this is the recorded form (id + timestamp).
    Recorded(LedgerEntry),
    /// An entry already occupied the grant's key; nothing was written.
    AlreadyRecorded,
}

/// Result of an award primitive call.
#[derive(Debug, Clone, PartialEq)]
pub enum AwardOutcome {
    /// Points were applied and the ledger entry recorded.
    Awarded(LedgerEntry),
    /// The logical event was already paid out; no state changed.
    AlreadyAwarded,
}

/// Port for the append-only points history store.
///
/// Implemented by:
/// - `refledger_adapters::ledger_store::InMemoryLedger` (testing / embedded)
/// - a SQL adapter in production (unique index over the `EntryKey`
///   columns, `INSERT ... ON CONFLICT DO NOTHING`)
///
/// ## Design Notes
///
/// - `append_unique` is the subsystem's one concurrency-sensitive
///   operation: it must decide "new or duplicate" and write in a single
///   atomic step. Everything else is a plain read.
/// - Entries are immutable; there is no update or delete operation.
#[cfg_attr(test, mockall::automock)]
pub trait PointsLedger: Send + Sync {
    /// Append an entry unless its key is already taken.
    fn append_unique(&self, grant: PointsGrant) -> RefledgerResult<AppendOutcome>;

    /// Look up the entry occupying a key, if any.
    fn find(&self, key: &EntryKey) -> RefledgerResult<Option<LedgerEntry>>;

    /// All entries recorded against a reference under one tag.
    ///
    /// The award invariant makes more than one per user impossible, but
    /// callers must not assume a cardinality of one across users.
    fn entries_for_reference(
        &self,
        reference_id: &str,
        reference_type: ReferenceType,
    ) -> RefledgerResult<Vec<LedgerEntry>>;

    /// A user's full history, in recording order.
    fn entries_for_user(&self, user: &UserId) -> RefledgerResult<Vec<LedgerEntry>>;
}

/// Port for the points award primitive.
///
/// Owned by the gamification subsystem: one call appends one ledger entry
/// and applies the signed delta to the user's running total/level state.
/// The call is conditional on the entry key: a duplicate grant returns
/// `AlreadyAwarded` and changes nothing, which is what makes the
/// orchestrators safely re-invocable.
///
/// Implemented by:
/// - `refledger_adapters::gamification::LedgerBackedAwarder`
#[cfg_attr(test, mockall::automock)]
pub trait PointsAwarder: Send + Sync {
    fn award(&self, grant: PointsGrant) -> RefledgerResult<AwardOutcome>;
}

/// Port for conversion record storage.
///
/// Implemented by:
/// - `refledger_adapters::conversion_store::InMemoryConversions`
///
/// The two `mark_*` operations are the only writes this subsystem performs
/// on conversions; both carry set-once semantics inside the record and
/// return whether anything actually changed.
#[cfg_attr(test, mockall::automock)]
pub trait ConversionStore: Send + Sync {
    /// Find the conversion tied to a business reference, if any.
    fn find_by_reference(
        &self,
        reference: &Reference,
    ) -> RefledgerResult<Option<ConversionRecord>>;

    /// Get a conversion by id.
    fn get(&self, id: &ConversionId) -> RefledgerResult<ConversionRecord>;

    /// Insert a new conversion record.
    fn insert(&self, record: ConversionRecord) -> RefledgerResult<()>;

    /// Stamp `points_awarded_at` (set-once). Returns whether the stamp
    /// was applied.
    fn mark_points_awarded(&self, id: &ConversionId, at: DateTime<Utc>) -> RefledgerResult<bool>;

    /// Transition to refunded and stamp `points_revoked_at`. Returns
    /// `false` when the record was already refunded.
    fn mark_refunded(&self, id: &ConversionId, at: DateTime<Utc>) -> RefledgerResult<bool>;
}

/// Port for read-only booking lookups.
///
/// Implemented by:
/// - `refledger_adapters::booking_directory::InMemoryBookings`
#[cfg_attr(test, mockall::automock)]
pub trait BookingDirectory: Send + Sync {
    fn get(&self, id: &BookingId) -> RefledgerResult<Option<Booking>>;
}
