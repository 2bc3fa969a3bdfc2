//! Fee aggregate

pub mod model;
pub mod repository;

pub use model::{Fee, FeeFilter, FeeType, NewFee};
pub use repository::FeeRepository;
