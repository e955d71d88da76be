//! Points ledger domain aggregate.
//!
//! The ledger is the system of record for every point-changing event. It is
//! **append-only**: entries are immutable once recorded, and undoing an
//! entry means recording a second, negated entry under the paired reversal
//! tag, never editing or deleting the original.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Ledger Domain                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  LedgerEntry (immutable record)                             │
//! │  ├── EntryKey (Value Object) - uniqueness triple            │
//! │  └── points: signed i64 delta                               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  PointsGrant (Value Object) - validated award input         │
//! │  └── built via PointsGrantBuilder, keyed like the entry     │
//! │      it will become                                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//!
//! 1. At most one entry exists per `EntryKey`, the
//!    `(user, reference_id, reference_type)` triple. This is the sole
//!    idempotency invariant of the whole subsystem. It is enforced by the
//!    ledger port's conditional append (`append_unique`), a single atomic
//!    write, not by a read-then-check sequence.
//! 2. No entry carries zero points (`PointsGrant` refuses to build one).
//! 3. Reversal entries negate toward zero: `points = -|original.points|`,
//!    regardless of the original's sign. Original awards are positive by
//!    construction, so reversals are negative counter-entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::{
    entities::common::UserId, error::DomainError, value_objects::ReferenceType,
};

// ============================================================================
// Entry Identity
// ============================================================================

/// The uniqueness triple of a ledger entry.
///
/// Two entries with the same key would double-count the same logical
/// event; the ledger port guarantees the second write is ignored. A SQL
/// adapter maps this to a unique index over the three columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryKey {
    pub user: UserId,
    pub reference_id: String,
    pub reference_type: ReferenceType,
}

impl EntryKey {
    pub fn new(
        user: UserId,
        reference_id: impl Into<String>,
        reference_type: ReferenceType,
    ) -> Self {
        Self {
            user,
            reference_id: reference_id.into(),
            reference_type,
        }
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.user, self.reference_id, self.reference_type
        )
    }
}

// ============================================================================
// Ledger Entry
// ============================================================================

/// One immutable, signed point-change record.
///
/// ## Lifecycle
///
/// 1. **Grant:** a validated `PointsGrant` is handed to the ledger port
/// 2. **Record:** the port's conditional append materializes the entry
///    (id and timestamp assigned at that moment)
/// 3. **Never again:** the entry is immutable; a reversal is a new entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique entry identifier, assigned when the entry is recorded.
    pub id: Uuid,

    /// The user whose balance this entry changes.
    pub user: UserId,

    /// Signed delta: positive for awards, negative for reversals.
    pub points: i64,

    /// Free-form category for grouping in statements (e.g. `"referral"`).
    pub action_type: String,

    /// Id of the business entity that triggered this entry.
    pub reference_id: String,

    /// Semantic tag distinguishing which side of the referral this entry
    /// belongs to, and whether it is an original or a reversal.
    pub reference_type: ReferenceType,

    /// Human-readable statement line (Thai-language in production data).
    pub description: String,

    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Materialize an entry from a validated grant.
    ///
    /// Called by ledger adapters at append time; id and timestamp are
    /// assigned here so callers never fabricate either.
    pub fn record(grant: PointsGrant) -> Self {
        Self {
            id: Uuid::new_v4(),
            user: grant.user,
            points: grant.points,
            action_type: grant.action_type,
            reference_id: grant.reference_id,
            reference_type: grant.reference_type,
            description: grant.description,
            created_at: Utc::now(),
        }
    }

    /// The uniqueness triple of this entry.
    pub fn key(&self) -> EntryKey {
        EntryKey::new(
            self.user.clone(),
            self.reference_id.clone(),
            self.reference_type,
        )
    }

    /// Build the grant that negates this entry.
    ///
    /// The counter-grant always negates toward zero
    /// (`points = -|self.points|`) and is recorded under the paired
    /// reversal tag, so the original entry stays untouched and the pair
    /// sums to zero.
    ///
    /// # Errors
    ///
    /// `NotReversible` if this entry is itself a reversal: reversal tags
    /// have no paired reversal of their own.
    pub fn reversal_grant(
        &self,
        description: impl Into<String>,
    ) -> Result<PointsGrant, DomainError> {
        let reversal_type =
            self.reference_type
                .reversal()
                .ok_or_else(|| DomainError::NotReversible {
                    reference_type: self.reference_type.to_string(),
                })?;

        PointsGrant::builder()
            .user(self.user.clone())
            .points(-self.points.abs())
            .action_type(self.action_type.clone())
            .reference(self.reference_id.clone(), reversal_type)
            .description(description)
            .build()
    }
}

// ============================================================================
// Points Grant
// ============================================================================

/// Validated input to the points award primitive.
///
/// A grant is the *request* to change a balance; a `LedgerEntry` is the
/// recorded *fact*. Building a grant enforces the domain constraints
/// (non-empty user, non-zero points) once, so every downstream consumer
/// can trust the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsGrant {
    pub user: UserId,
    pub points: i64,
    pub action_type: String,
    pub reference_id: String,
    pub reference_type: ReferenceType,
    pub description: String,
}

impl PointsGrant {
    /// Start the builder pattern for fluent construction.
    pub fn builder() -> PointsGrantBuilder {
        PointsGrantBuilder::default()
    }

    /// The uniqueness triple the resulting entry will carry.
    pub fn key(&self) -> EntryKey {
        EntryKey::new(
            self.user.clone(),
            self.reference_id.clone(),
            self.reference_type,
        )
    }
}

/// Builder for constructing grants with validation.
///
/// ## Required Fields
///
/// All fields are optional during construction, but `build()` enforces:
/// - `user` (must be set)
/// - `points` (must be set and non-zero)
/// - `reference` (id and type must be set)
///
/// `action_type` defaults to `"referral"`; `description` defaults to empty.
#[derive(Default)]
pub struct PointsGrantBuilder {
    user: Option<UserId>,
    points: Option<i64>,
    action_type: Option<String>,
    reference_id: Option<String>,
    reference_type: Option<ReferenceType>,
    description: Option<String>,
}

impl PointsGrantBuilder {
    pub fn user(mut self, user: UserId) -> Self {
        self.user = Some(user);
        self
    }

    pub fn points(mut self, points: i64) -> Self {
        self.points = Some(points);
        self
    }

    pub fn action_type(mut self, action_type: impl Into<String>) -> Self {
        self.action_type = Some(action_type.into());
        self
    }

    pub fn reference(
        mut self,
        reference_id: impl Into<String>,
        reference_type: ReferenceType,
    ) -> Self {
        self.reference_id = Some(reference_id.into());
        self.reference_type = Some(reference_type);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Consume builder and construct a `PointsGrant`.
    ///
    /// # Errors
    ///
    /// - `MissingRequiredField` if user/points/reference not set
    /// - `ZeroPointGrant` if points is zero: zero-value entries would
    ///   occupy the entry's uniqueness key while changing nothing
    pub fn build(self) -> Result<PointsGrant, DomainError> {
        let user = self
            .user
            .ok_or(DomainError::MissingRequiredField { field: "user" })?;
        let points = self
            .points
            .ok_or(DomainError::MissingRequiredField { field: "points" })?;
        let reference_id = self
            .reference_id
            .ok_or(DomainError::MissingRequiredField {
                field: "reference_id",
            })?;
        let reference_type = self
            .reference_type
            .ok_or(DomainError::MissingRequiredField {
                field: "reference_type",
            })?;

        if points == 0 {
            return Err(DomainError::ZeroPointGrant { reference_id });
        }

        Ok(PointsGrant {
            user,
            points,
            action_type: self.action_type.unwrap_or_else(|| "referral".to_string()),
            reference_id,
            reference_type,
            description: self.description.unwrap_or_default(),
        })
    }
}
