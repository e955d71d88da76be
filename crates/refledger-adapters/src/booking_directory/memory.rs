//! In-memory booking directory for testing.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use refledger_core::{
    application::{ApplicationError, ports::BookingDirectory},
    domain::{Booking, BookingId},
    error::RefledgerResult,
};

/// In-memory read model of the booking subsystem.
///
/// The real directory is owned elsewhere; this adapter exists so the
/// orchestrators can be exercised without it. `put` is a test seam, not
/// part of the `BookingDirectory` port; the ledger never writes
/// bookings.
#[derive(Clone)]
pub struct InMemoryBookings {
    inner: Arc<RwLock<HashMap<BookingId, Booking>>>,
}

impl InMemoryBookings {
    /// Create a new empty directory.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Seed a booking (testing helper).
    pub fn put(&self, booking: Booking) {
        self.inner
            .write()
            .unwrap()
            .insert(booking.id.clone(), booking);
    }
}

impl Default for InMemoryBookings {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingDirectory for InMemoryBookings {
    fn get(&self, id: &BookingId) -> RefledgerResult<Option<Booking>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        Ok(inner.get(id).cloned())
    }
}
