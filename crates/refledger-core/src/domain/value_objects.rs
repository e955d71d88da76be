//! Domain value objects: ReferenceType, ReferenceKind, ConversionStatus.
//!
//! # Design
//!
//! These are pure value types — `Copy`, equality-by-value, no identity.
//! This file's only job is to define the types, their string
//! representations, and their `FromStr` parsers. The payout amounts and
//! descriptions that go with the tags live in `rewards.rs`.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str` arm and the `FromStr` arm here
//! 3. If the tag is an original award, pair it with its reversal in
//!    `ReferenceType::reversal`
//! 4. Done — nothing else changes

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── ReferenceType ────────────────────────────────────────────────────────────

/// Semantic category of a ledger entry.
///
/// A closed, string-tagged set. Each original award tag is paired with a
/// reversal tag; a reversal entry never mutates the original, it is a
/// second negated entry recorded under the paired tag.
///
/// | Tag | Meaning |
/// |---|---|
/// | `booking_referral_referrer` | Referrer's original award for a booking |
/// | `booking_referral_referrer_reversal` | Negation of the above |
/// | `booking_referral_referred` | Referred user's original bonus |
/// | `booking_referral_referred_reversal` | Negation of the above |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    BookingReferralReferrer,
    BookingReferralReferrerReversal,
    BookingReferralReferred,
    BookingReferralReferredReversal,
}

impl ReferenceType {
    /// The original award tags, in award order (referrer first).
    ///
    /// The reversal orchestrator iterates these to collect every entry a
    /// booking may have produced.
    pub const ORIGINAL_AWARD_TAGS: [Self; 2] =
        [Self::BookingReferralReferrer, Self::BookingReferralReferred];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BookingReferralReferrer => "booking_referral_referrer",
            Self::BookingReferralReferrerReversal => "booking_referral_referrer_reversal",
            Self::BookingReferralReferred => "booking_referral_referred",
            Self::BookingReferralReferredReversal => "booking_referral_referred_reversal",
        }
    }

    /// The reversal tag paired with an original award tag.
    ///
    /// `None` for tags that are themselves reversals; reversals are not
    /// reversible.
    pub const fn reversal(self) -> Option<Self> {
        match self {
            Self::BookingReferralReferrer => Some(Self::BookingReferralReferrerReversal),
            Self::BookingReferralReferred => Some(Self::BookingReferralReferredReversal),
            Self::BookingReferralReferrerReversal | Self::BookingReferralReferredReversal => None,
        }
    }

    pub const fn is_reversal(self) -> bool {
        matches!(
            self,
            Self::BookingReferralReferrerReversal | Self::BookingReferralReferredReversal
        )
    }
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReferenceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "booking_referral_referrer" => Ok(Self::BookingReferralReferrer),
            "booking_referral_referrer_reversal" => Ok(Self::BookingReferralReferrerReversal),
            "booking_referral_referred" => Ok(Self::BookingReferralReferred),
            "booking_referral_referred_reversal" => Ok(Self::BookingReferralReferredReversal),
            other => Err(DomainError::UnknownReferenceType(other.to_string())),
        }
    }
}

// ── ReferenceKind ────────────────────────────────────────────────────────────

/// The kind of business entity a conversion points at.
///
/// In the booking-referral flow this is always `Booking`; the variant set
/// mirrors what the affiliate subsystem records in its
/// `reference_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Booking,
}

impl ReferenceKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Booking => "booking",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReferenceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "booking" => Ok(Self::Booking),
            other => Err(DomainError::UnknownReferenceKind(other.to_string())),
        }
    }
}

// ── ConversionStatus ─────────────────────────────────────────────────────────

/// Lifecycle status of a conversion record.
///
/// The affiliate subsystem owns the full enumeration; these are the values
/// this ledger reads or writes. The only transition performed here is
/// `* -> Refunded` (by the reversal orchestrator), and `Refunded` is
/// terminal; there is no path back to an awarded state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionStatus {
    Pending,
    Confirmed,
    Refunded,
}

impl ConversionStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConversionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "refunded" => Ok(Self::Refunded),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}
