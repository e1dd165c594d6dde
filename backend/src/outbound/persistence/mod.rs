//! Outbound persistence adapters.

mod memory;

pub use memory::{InMemoryPostRepository, InMemoryUserRepository};
