//! In-memory points ledger with atomic conditional append.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use refledger_core::{
    application::{ApplicationError, ports::{AppendOutcome, PointsLedger}},
    domain::{DomainValidator as validator, EntryKey, LedgerEntry, PointsGrant, ReferenceType, UserId},
    error::RefledgerResult,
};

/// Thread-safe in-memory points ledger.
///
/// Entries live in an insertion-ordered log; a key index enforces the
/// at-most-one-entry-per-key invariant. `append_unique` performs the
/// check and the insert inside a single write-lock critical section,
/// which is what makes the conditional write atomic: concurrent grants
/// for the same key cannot both observe "absent". A SQL adapter gets the
/// same guarantee from a unique index and `ON CONFLICT DO NOTHING`.
#[derive(Clone)]
pub struct InMemoryLedger {
    inner: Arc<RwLock<LedgerInner>>,
}

#[derive(Default)]
struct LedgerInner {
    /// Recording order; entries are never removed or rewritten.
    entries: Vec<LedgerEntry>,
    /// `EntryKey` -> position in `entries`.
    index: HashMap<EntryKey, usize>,
}

impl InMemoryLedger {
    /// Create a new empty ledger.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(LedgerInner::default())),
        }
    }

    /// Get the number of recorded entries.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().entries.len()
    }

    /// Check if the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries in recording order (testing helper).
    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.inner.read().unwrap().entries.clone()
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl PointsLedger for InMemoryLedger {
    fn append_unique(&self, grant: PointsGrant) -> RefledgerResult<AppendOutcome> {
        // Re-check invariants for grants that bypassed the builder.
        validator::validate_grant(&grant)?;

        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let key = grant.key();
        if inner.index.contains_key(&key) {
            return Ok(AppendOutcome::AlreadyRecorded);
        }

        let entry = LedgerEntry::record(grant);
        let position = inner.entries.len();
        inner.entries.push(entry.clone());
        inner.index.insert(key, position);

        Ok(AppendOutcome::Recorded(entry))
    }

    fn find(&self, key: &EntryKey) -> RefledgerResult<Option<LedgerEntry>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        Ok(inner
            .index
            .get(key)
            .map(|position| inner.entries[*position].clone()))
    }

    fn entries_for_reference(
        &self,
        reference_id: &str,
        reference_type: ReferenceType,
    ) -> RefledgerResult<Vec<LedgerEntry>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        Ok(inner
            .entries
            .iter()
            .filter(|e| e.reference_id == reference_id && e.reference_type == reference_type)
            .cloned()
            .collect())
    }

    fn entries_for_user(&self, user: &UserId) -> RefledgerResult<Vec<LedgerEntry>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        Ok(inner
            .entries
            .iter()
            .filter(|e| &e.user == user)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(user: &str, points: i64, tag: ReferenceType) -> PointsGrant {
        PointsGrant::builder()
            .user(UserId::new(user))
            .points(points)
            .reference("b1", tag)
            .description("test")
            .build()
            .unwrap()
    }

    #[test]
    fn append_unique_records_then_ignores() {
        let ledger = InMemoryLedger::new();
        let g = grant("u1", 250, ReferenceType::BookingReferralReferrer);

        let first = ledger.append_unique(g.clone()).unwrap();
        assert!(matches!(first, AppendOutcome::Recorded(_)));

        let second = ledger.append_unique(g).unwrap();
        assert_eq!(second, AppendOutcome::AlreadyRecorded);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn same_reference_different_tags_both_record() {
        let ledger = InMemoryLedger::new();
        ledger
            .append_unique(grant("u1", 250, ReferenceType::BookingReferralReferrer))
            .unwrap();
        ledger
            .append_unique(grant(
                "u1",
                -250,
                ReferenceType::BookingReferralReferrerReversal,
            ))
            .unwrap();

        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn find_returns_the_occupying_entry() {
        let ledger = InMemoryLedger::new();
        ledger
            .append_unique(grant("u1", 250, ReferenceType::BookingReferralReferrer))
            .unwrap();

        let key = EntryKey::new(
            UserId::new("u1"),
            "b1",
            ReferenceType::BookingReferralReferrer,
        );
        assert_eq!(ledger.find(&key).unwrap().unwrap().points, 250);

        let vacant = EntryKey::new(
            UserId::new("u1"),
            "b1",
            ReferenceType::BookingReferralReferred,
        );
        assert!(ledger.find(&vacant).unwrap().is_none());
    }

    #[test]
    fn reference_query_filters_by_tag() {
        let ledger = InMemoryLedger::new();
        ledger
            .append_unique(grant("u1", 250, ReferenceType::BookingReferralReferrer))
            .unwrap();
        ledger
            .append_unique(grant("u2", 125, ReferenceType::BookingReferralReferred))
            .unwrap();

        let referrer_entries = ledger
            .entries_for_reference("b1", ReferenceType::BookingReferralReferrer)
            .unwrap();
        assert_eq!(referrer_entries.len(), 1);
        assert_eq!(referrer_entries[0].user.as_str(), "u1");
    }

    #[test]
    fn user_query_preserves_recording_order() {
        let ledger = InMemoryLedger::new();
        ledger
            .append_unique(grant("u1", 250, ReferenceType::BookingReferralReferrer))
            .unwrap();
        ledger
            .append_unique(grant(
                "u1",
                -250,
                ReferenceType::BookingReferralReferrerReversal,
            ))
            .unwrap();

        let history = ledger.entries_for_user(&UserId::new("u1")).unwrap();
        assert_eq!(
            history.iter().map(|e| e.points).collect::<Vec<_>>(),
            vec![250, -250]
        );
    }

    #[test]
    fn zero_point_grant_is_rejected_not_recorded() {
        let ledger = InMemoryLedger::new();
        let mut g = grant("u1", 10, ReferenceType::BookingReferralReferrer);
        g.points = 0; // simulate a grant deserialized from a bad row

        assert!(ledger.append_unique(g).is_err());
        assert!(ledger.is_empty());
    }
}
