//! Invoices: fee sets, per-apartment amounts, contributions and payments

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
