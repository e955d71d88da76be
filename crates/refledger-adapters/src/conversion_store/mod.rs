//! Conversion record store adapters.

mod memory;

pub use memory::InMemoryConversions;
