//! User accounts: registration, listing, updates and soft delete

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
