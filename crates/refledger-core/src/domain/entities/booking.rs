//! Read-only booking projection.
//!
//! Bookings are owned by the booking subsystem; this ledger reads them for
//! one purpose only: a human-readable reference number for ledger
//! descriptions. None of the orchestration logic branches on booking
//! fields.

use serde::{Deserialize, Serialize};

use crate::domain::entities::common::{BookingId, UserId};

/// The slice of a booking this subsystem consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,

    /// The paying customer (the referred user in a referral flow).
    pub user: UserId,

    /// Amount paid, in minor currency units. Carried for statement
    /// context; never used in arithmetic here.
    pub price_paid: i64,

    /// Explicit human-facing number (e.g. "BK001"), when the booking
    /// subsystem assigned one.
    pub booking_number: Option<String>,
}

impl Booking {
    pub fn new(id: BookingId, user: UserId, price_paid: i64) -> Self {
        Self {
            id,
            user,
            price_paid,
            booking_number: None,
        }
    }

    pub fn with_booking_number(mut self, number: impl Into<String>) -> Self {
        self.booking_number = Some(number.into());
        self
    }

    /// The number shown in ledger descriptions.
    ///
    /// Falls back to the uppercased first 8 characters of the id when no
    /// explicit number exists.
    pub fn display_number(&self) -> String {
        self.booking_number
            .clone()
            .unwrap_or_else(|| self.id.short_code())
    }
}
