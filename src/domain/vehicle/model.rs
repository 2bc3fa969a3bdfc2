use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum VehicleCategory {
    Car,
    Motorbike,
}

impl std::fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Car => write!(f, "Car"),
            Self::Motorbike => write!(f, "Motorbike"),
        }
    }
}

/// A registered vehicle. `id` is the licence plate.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: String,
    pub category: VehicleCategory,
    pub apartment_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct VehicleFilter {
    pub category: Option<VehicleCategory>,
    pub apartment_id: Option<i64>,
}

impl VehicleFilter {
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        self.category.map_or(true, |c| vehicle.category == c)
            && self.apartment_id.map_or(true, |a| vehicle.apartment_id == a)
    }
}
