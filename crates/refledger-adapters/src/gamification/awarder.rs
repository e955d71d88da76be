//! Ledger-backed points award primitive.
//!
//! The gamification contract: one award call appends exactly one ledger
//! entry and applies the signed delta to the user's running total/level
//! state. This adapter realizes it over the in-memory ledger's
//! conditional append: a duplicate grant changes nothing, neither in the
//! ledger nor in the progress table.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use tracing::debug;

use refledger_core::{
    application::{
        ApplicationError,
        ports::{AppendOutcome, AwardOutcome, PointsAwarder, PointsLedger},
    },
    domain::{PointsGrant, UserId},
    error::RefledgerResult,
};

use crate::ledger_store::InMemoryLedger;

/// Lifetime-points thresholds per level, lowest first.
///
/// Levels never drop: reversals reduce the spendable balance but not
/// `lifetime_points`, so the level derived from it is monotonic.
const LEVEL_THRESHOLDS: [i64; 5] = [0, 500, 1_500, 4_000, 10_000];

/// A member's running point totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemberProgress {
    /// Spendable balance: the sum of all signed deltas.
    pub points_balance: i64,
    /// Positive deltas only; the basis for level computation.
    pub lifetime_points: i64,
    /// Current level, 1-based, derived from `lifetime_points`.
    pub level: u8,
}

impl MemberProgress {
    fn apply(&mut self, delta: i64) {
        self.points_balance += delta;
        if delta > 0 {
            self.lifetime_points += delta;
        }
        self.level = level_for(self.lifetime_points);
    }
}

/// Level for a lifetime total: the highest threshold reached.
fn level_for(lifetime_points: i64) -> u8 {
    let reached = LEVEL_THRESHOLDS
        .iter()
        .take_while(|t| lifetime_points >= **t)
        .count();
    reached.max(1) as u8
}

/// Points award primitive over a shared in-memory ledger.
///
/// Cloning shares both the ledger and the progress table, so a service
/// and a test can observe the same state.
#[derive(Clone)]
pub struct LedgerBackedAwarder {
    ledger: InMemoryLedger,
    progress: Arc<RwLock<HashMap<UserId, MemberProgress>>>,
}

impl LedgerBackedAwarder {
    /// Create an awarder writing through the given ledger.
    ///
    /// The ledger handle is shared (its storage is internally
    /// reference-counted), so pass the same instance the orchestrators
    /// read from.
    pub fn new(ledger: InMemoryLedger) -> Self {
        Self {
            ledger,
            progress: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// A member's current totals, if any entry ever touched them.
    pub fn progress(&self, user: &UserId) -> Option<MemberProgress> {
        self.progress.read().unwrap().get(user).copied()
    }
}

impl PointsAwarder for LedgerBackedAwarder {
    fn award(&self, grant: PointsGrant) -> RefledgerResult<AwardOutcome> {
        match self.ledger.append_unique(grant)? {
            AppendOutcome::Recorded(entry) => {
                let mut progress = self
                    .progress
                    .write()
                    .map_err(|_| ApplicationError::StoreLockError)?;
                let member = progress.entry(entry.user.clone()).or_default();
                member.apply(entry.points);
                debug!(
                    user = %entry.user,
                    balance = member.points_balance,
                    level = member.level,
                    "progress updated"
                );
                Ok(AwardOutcome::Awarded(entry))
            }
            AppendOutcome::AlreadyRecorded => Ok(AwardOutcome::AlreadyAwarded),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refledger_core::domain::ReferenceType;

    fn grant(user: &str, points: i64, reference_id: &str, tag: ReferenceType) -> PointsGrant {
        PointsGrant::builder()
            .user(UserId::new(user))
            .points(points)
            .reference(reference_id, tag)
            .description("test")
            .build()
            .unwrap()
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(level_for(0), 1);
        assert_eq!(level_for(499), 1);
        assert_eq!(level_for(500), 2);
        assert_eq!(level_for(1_500), 3);
        assert_eq!(level_for(99_999), 5);
    }

    #[test]
    fn award_updates_balance_and_lifetime() {
        let awarder = LedgerBackedAwarder::new(InMemoryLedger::new());
        awarder
            .award(grant(
                "u1",
                250,
                "b1",
                ReferenceType::BookingReferralReferrer,
            ))
            .unwrap();

        let progress = awarder.progress(&UserId::new("u1")).unwrap();
        assert_eq!(progress.points_balance, 250);
        assert_eq!(progress.lifetime_points, 250);
        assert_eq!(progress.level, 1);
    }

    #[test]
    fn duplicate_award_changes_nothing() {
        let awarder = LedgerBackedAwarder::new(InMemoryLedger::new());
        let g = grant("u1", 250, "b1", ReferenceType::BookingReferralReferrer);

        assert!(matches!(
            awarder.award(g.clone()).unwrap(),
            AwardOutcome::Awarded(_)
        ));
        assert_eq!(awarder.award(g).unwrap(), AwardOutcome::AlreadyAwarded);

        let progress = awarder.progress(&UserId::new("u1")).unwrap();
        assert_eq!(progress.points_balance, 250);
    }

    #[test]
    fn reversal_reduces_balance_but_not_lifetime() {
        let awarder = LedgerBackedAwarder::new(InMemoryLedger::new());
        awarder
            .award(grant(
                "u1",
                250,
                "b1",
                ReferenceType::BookingReferralReferrer,
            ))
            .unwrap();
        awarder
            .award(grant(
                "u1",
                -250,
                "b1",
                ReferenceType::BookingReferralReferrerReversal,
            ))
            .unwrap();

        let progress = awarder.progress(&UserId::new("u1")).unwrap();
        assert_eq!(progress.points_balance, 0);
        assert_eq!(progress.lifetime_points, 250);
    }

    #[test]
    fn lifetime_awards_cross_level_boundaries() {
        let awarder = LedgerBackedAwarder::new(InMemoryLedger::new());
        for reference_id in ["b1", "b2"] {
            awarder
                .award(grant(
                    "u1",
                    250,
                    reference_id,
                    ReferenceType::BookingReferralReferrer,
                ))
                .unwrap();
        }

        let progress = awarder.progress(&UserId::new("u1")).unwrap();
        assert_eq!(progress.lifetime_points, 500);
        assert_eq!(progress.level, 2);
    }

    #[test]
    fn shared_ledger_sees_awarder_entries() {
        let ledger = InMemoryLedger::new();
        let awarder = LedgerBackedAwarder::new(ledger.clone());
        awarder
            .award(grant(
                "u1",
                250,
                "b1",
                ReferenceType::BookingReferralReferrer,
            ))
            .unwrap();

        assert_eq!(ledger.len(), 1);
    }
}
