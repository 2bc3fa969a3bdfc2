//! Storage implementations other than the database

mod memory;

pub use memory::InMemoryStore;
