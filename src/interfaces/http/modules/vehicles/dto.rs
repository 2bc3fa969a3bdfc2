use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::services::NewVehicle;
use crate::domain::{Vehicle, VehicleCategory, VehicleFilter};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDto {
    /// Licence plate
    pub id: String,
    pub category: VehicleCategory,
    pub apartment_id: i64,
    pub registered_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleDto {
    fn from(v: Vehicle) -> Self {
        Self {
            id: v.id,
            category: v.category,
            apartment_id: v.apartment_id,
            registered_at: v.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterVehicleRequest {
    #[serde(default)]
    #[validate(length(max = 20, message = "id must be at most 20 characters"))]
    pub id: String,
    pub category: VehicleCategory,
    pub apartment_id: i64,
}

impl From<RegisterVehicleRequest> for NewVehicle {
    fn from(r: RegisterVehicleRequest) -> Self {
        Self {
            id: r.id,
            category: r.category,
            apartment_id: r.apartment_id,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListVehiclesParams {
    pub category: Option<VehicleCategory>,
    pub apartment_id: Option<i64>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

impl ListVehiclesParams {
    pub fn filter(&self) -> VehicleFilter {
        VehicleFilter {
            category: self.category,
            apartment_id: self.apartment_id,
        }
    }
}
