//! Ledger Service - read-side queries over the points history.
//!
//! Handles statement and balance queries. Separated from ReferralService
//! for single responsibility: callers that only read never get write
//! capability.

use crate::{
    application::ports::PointsLedger,
    domain::{LedgerEntry, ReferenceType, UserId},
    error::RefledgerResult,
};

/// Service for points-history queries.
pub struct LedgerService {
    ledger: Box<dyn PointsLedger>,
}

impl LedgerService {
    /// Create a new ledger query service.
    pub fn new(ledger: Box<dyn PointsLedger>) -> Self {
        Self { ledger }
    }

    /// A user's full history, in recording order.
    pub fn entries_for_user(&self, user: &UserId) -> RefledgerResult<Vec<LedgerEntry>> {
        self.ledger.entries_for_user(user)
    }

    /// All entries recorded against a reference under one tag.
    pub fn entries_for_reference(
        &self,
        reference_id: &str,
        reference_type: ReferenceType,
    ) -> RefledgerResult<Vec<LedgerEntry>> {
        self.ledger.entries_for_reference(reference_id, reference_type)
    }

    /// Net points across a user's entries.
    ///
    /// An award followed by its reversal contributes zero.
    pub fn balance(&self, user: &UserId) -> RefledgerResult<i64> {
        Ok(self
            .ledger
            .entries_for_user(user)?
            .iter()
            .map(|e| e.points)
            .sum())
    }
}
