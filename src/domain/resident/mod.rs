//! Resident aggregate

pub mod model;
pub mod repository;

pub use model::{Gender, Resident, ResidentFilter, ResidentStatus};
pub use repository::ResidentRepository;
