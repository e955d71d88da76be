//! Points ledger store adapters.

mod memory;

pub use memory::InMemoryLedger;
