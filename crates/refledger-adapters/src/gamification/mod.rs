//! Gamification adapters: the points award primitive.

mod awarder;

pub use awarder::{LedgerBackedAwarder, MemberProgress};
