//! Apartments with their owner, members and vehicles

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
