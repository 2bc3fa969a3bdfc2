//! Residents, including the move-out and delete cascades

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
