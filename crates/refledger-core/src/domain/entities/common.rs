use super::DomainError;
use crate::domain::value_objects::ReferenceKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque user identifier.
///
/// Invariant: never empty. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a new user id.
    ///
    /// # Panics
    /// Panics if the id is empty (use `try_new` for fallible).
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        assert!(!id.is_empty(), "UserId cannot be empty");
        Self(id)
    }

    /// Fallible constructor.
    pub fn try_new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.is_empty() {
            Err(DomainError::EmptyIdentifier { field: "user_id" })
        } else {
            Ok(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An opaque booking identifier.
///
/// Invariant: never empty. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    /// Create a new booking id.
    ///
    /// # Panics
    /// Panics if the id is empty (use `try_new` for fallible).
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        assert!(!id.is_empty(), "BookingId cannot be empty");
        Self(id)
    }

    /// Fallible constructor.
    pub fn try_new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.is_empty() {
            Err(DomainError::EmptyIdentifier { field: "booking_id" })
        } else {
            Ok(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable fallback code: the first 8 characters of the id,
    /// uppercased.
    ///
    /// Used wherever a booking has no explicit `booking_number`; ledger
    /// descriptions still need something a support agent can read back.
    pub fn short_code(&self) -> String {
        self.0.chars().take(8).collect::<String>().to_uppercase()
    }
}

impl From<&str> for BookingId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An opaque conversion record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversionId(String);

impl ConversionId {
    /// Create a new conversion id.
    ///
    /// # Panics
    /// Panics if the id is empty (use `try_new` for fallible).
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        assert!(!id.is_empty(), "ConversionId cannot be empty");
        Self(id)
    }

    /// Fallible constructor.
    pub fn try_new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.is_empty() {
            Err(DomainError::EmptyIdentifier {
                field: "conversion_id",
            })
        } else {
            Ok(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConversionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for ConversionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The business entity a conversion points at: `(id, kind)`.
///
/// In the booking-referral flow this is always `(booking.id, Booking)`.
/// Conversion lookups key on the full pair, so an id collision between
/// entity kinds cannot cross-match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub id: String,
    pub kind: ReferenceKind,
}

impl Reference {
    pub fn new(id: impl Into<String>, kind: ReferenceKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// The reference for a booking-triggered conversion.
    pub fn booking(id: &BookingId) -> Self {
        Self::new(id.as_str(), ReferenceKind::Booking)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}
