//! Conversion record aggregate.
//!
//! A conversion is one recorded referral outcome: a referrer, the user
//! they referred, and the business event (a booking) whose payment
//! triggers the payout. Records are created by the affiliate-tracking
//! subsystem at signup time; this ledger only reads them and stamps the
//! payout bookkeeping fields.
//!
//! ## Invariants
//!
//! 1. `reference` names exactly one business entity (`(id, kind)` pair)
//! 2. `points_awarded_at` and `points_revoked_at` are set once and never
//!    cleared
//! 3. `Refunded` is terminal: `mark_refunded` on a refunded record is a
//!    no-op, and nothing here transitions a record out of `Refunded`
//! 4. `metadata` belongs to the affiliate subsystem and is carried
//!    untouched; stamping a record must not drop or rewrite its keys

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{
    entities::common::{ConversionId, Reference, UserId},
    error::DomainError,
    value_objects::ConversionStatus,
};

/// One referral-driven conversion: signup under a code, later monetized
/// by a booking.
///
/// ## Lifecycle
///
/// 1. **Created** by the affiliate subsystem (status `Pending` or
///    `Confirmed`), possibly before the affiliate feature knew both
///    parties (either user may be absent)
/// 2. **Stamped** by the award orchestrator (`points_awarded_at`)
/// 3. **Refunded** by the reversal orchestrator (status + stamp)
/// 4. Never deleted by this subsystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub id: ConversionId,

    /// The referrer; owns the "referrer reward" claim. A record with no
    /// affiliate user is inert for this ledger.
    pub affiliate_user: Option<UserId>,

    /// The new user who signed up under the referral code; owns the
    /// "referred bonus" claim.
    pub referred_user: Option<UserId>,

    /// The business entity whose payment triggers payout.
    pub reference: Reference,

    pub status: ConversionStatus,

    /// Open string-keyed bag owned by the affiliate subsystem.
    /// Preserved verbatim across stamping operations.
    pub metadata: Map<String, Value>,

    /// When referral points were first awarded for this conversion.
    /// Set once; never cleared.
    pub points_awarded_at: Option<DateTime<Utc>>,

    /// When previously-awarded points were reversed. Set once; never
    /// cleared.
    pub points_revoked_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversionRecord {
    /// Start the builder pattern for fluent construction.
    pub fn builder() -> ConversionRecordBuilder {
        ConversionRecordBuilder::default()
    }

    /// Whether this conversion can pay out at all.
    ///
    /// Records without an affiliate user predate the affiliate feature or
    /// were recorded defensively; the award orchestrator treats them as
    /// not referral-driven.
    pub fn is_payable(&self) -> bool {
        self.affiliate_user.is_some()
    }

    /// Stamp the first successful award.
    ///
    /// Returns `true` if the stamp was applied, `false` if already set
    /// (set-once semantics). Touches `updated_at` only when applied.
    pub fn stamp_points_awarded(&mut self, at: DateTime<Utc>) -> bool {
        if self.points_awarded_at.is_some() {
            return false;
        }
        self.points_awarded_at = Some(at);
        self.updated_at = at;
        true
    }

    /// Transition to `Refunded` and stamp the reversal.
    ///
    /// Returns `false` without side effects when the record is already
    /// refunded. Otherwise sets the status, stamps `points_revoked_at`
    /// if unset, touches `updated_at`, and returns `true`.
    pub fn mark_refunded(&mut self, at: DateTime<Utc>) -> bool {
        if self.status == ConversionStatus::Refunded {
            return false;
        }
        self.status = ConversionStatus::Refunded;
        if self.points_revoked_at.is_none() {
            self.points_revoked_at = Some(at);
        }
        self.updated_at = at;
        true
    }

    /// Validate record integrity.
    ///
    /// The reference id must be non-empty; an id-less reference could
    /// never match a booking lookup and the record would be unreachable.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.reference.id.is_empty() {
            return Err(DomainError::InvalidConversion(
                "reference id cannot be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for constructing conversion records with validation.
///
/// ## Required Fields
///
/// - `id` (must be set)
/// - `reference` (must be set, non-empty id)
///
/// Parties are optional (either side of the referral may be unknown),
/// status defaults to `Pending`, metadata to empty, timestamps to now.
#[derive(Default)]
pub struct ConversionRecordBuilder {
    id: Option<ConversionId>,
    affiliate_user: Option<UserId>,
    referred_user: Option<UserId>,
    reference: Option<Reference>,
    status: Option<ConversionStatus>,
    metadata: Map<String, Value>,
}

impl ConversionRecordBuilder {
    pub fn id(mut self, id: ConversionId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn affiliate_user(mut self, user: UserId) -> Self {
        self.affiliate_user = Some(user);
        self
    }

    pub fn referred_user(mut self, user: UserId) -> Self {
        self.referred_user = Some(user);
        self
    }

    pub fn reference(mut self, reference: Reference) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn status(mut self, status: ConversionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Merge one metadata key (accumulates).
    pub fn metadata_entry(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Consume builder and construct a `ConversionRecord`.
    ///
    /// # Errors
    ///
    /// - `MissingRequiredField` if id/reference not set
    /// - `InvalidConversion` if the reference id is empty
    pub fn build(self) -> Result<ConversionRecord, DomainError> {
        let now = Utc::now();
        let record = ConversionRecord {
            id: self
                .id
                .ok_or(DomainError::MissingRequiredField { field: "id" })?,
            affiliate_user: self.affiliate_user,
            referred_user: self.referred_user,
            reference: self
                .reference
                .ok_or(DomainError::MissingRequiredField { field: "reference" })?,
            status: self.status.unwrap_or(ConversionStatus::Pending),
            metadata: self.metadata,
            points_awarded_at: None,
            points_revoked_at: None,
            created_at: now,
            updated_at: now,
        };
        record.validate()?;
        Ok(record)
    }
}
