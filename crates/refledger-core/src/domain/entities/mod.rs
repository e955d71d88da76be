pub mod booking;
pub mod common;
pub mod conversion;
pub mod ledger;

pub use crate::domain::DomainError;
pub use booking::Booking;
pub use conversion::ConversionRecord;
pub use ledger::{EntryKey, LedgerEntry, PointsGrant};
