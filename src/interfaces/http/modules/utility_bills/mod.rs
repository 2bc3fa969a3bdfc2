//! Utility bills: CSV import per billing period and payment tracking

pub mod csv_rows;
pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
