//! Vehicle aggregate

pub mod model;
pub mod repository;

pub use model::{Vehicle, VehicleCategory, VehicleFilter};
pub use repository::VehicleRepository;
