//! Apartment aggregate

pub mod model;
pub mod repository;

pub use model::{Apartment, ApartmentDetails, ApartmentFilter, ApartmentStatus};
pub use repository::ApartmentRepository;
