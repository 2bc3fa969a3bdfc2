//! Utility bill aggregate

pub mod model;
pub mod repository;

pub use model::{NewUtilityBill, UtilityBill, UtilityBillFilter};
pub use repository::UtilityBillRepository;
