use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::services::{ApartmentUpdate, NewApartment};
use crate::domain::{ApartmentDetails, ApartmentFilter, ApartmentStatus};
use crate::interfaces::http::modules::residents::ResidentDto;
use crate::interfaces::http::modules::vehicles::VehicleDto;

/// Apartment read model with its related records and counts.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApartmentDto {
    pub address_number: i64,
    pub area: Decimal,
    pub status: ApartmentStatus,
    pub owner_id: Option<i64>,
    pub owner_phone: Option<String>,
    pub owner: Option<ResidentDto>,
    pub residents: Vec<ResidentDto>,
    pub vehicles: Vec<VehicleDto>,
    /// Members whose status is not `Moved`
    pub number_of_members: usize,
    pub number_of_cars: usize,
    pub number_of_motorbikes: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ApartmentDetails> for ApartmentDto {
    fn from(d: ApartmentDetails) -> Self {
        let number_of_members = d.number_of_members();
        let number_of_cars = d.number_of_cars();
        let number_of_motorbikes = d.number_of_motorbikes();
        let ApartmentDetails {
            apartment,
            owner,
            members,
            vehicles,
        } = d;
        Self {
            address_number: apartment.address_number,
            area: apartment.area,
            status: apartment.status,
            owner_id: apartment.owner_id,
            owner_phone: apartment.owner_phone,
            owner: owner.map(ResidentDto::from),
            residents: members.into_iter().map(ResidentDto::from).collect(),
            vehicles: vehicles.into_iter().map(VehicleDto::from).collect(),
            number_of_members,
            number_of_cars,
            number_of_motorbikes,
            created_at: apartment.created_at,
            updated_at: apartment.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateApartmentRequest {
    #[validate(range(min = 1, message = "addressNumber must be a positive number"))]
    pub address_number: i64,
    #[schema(value_type = String, example = "75.5")]
    pub area: Decimal,
    /// Defaults to `Residential`
    pub status: Option<ApartmentStatus>,
    pub owner_id: i64,
    #[validate(length(min = 1, max = 20, message = "ownerPhone must be 1-20 characters"))]
    pub owner_phone: Option<String>,
    /// Member resident ids; the owner is always added.
    #[serde(default)]
    pub residents: Vec<i64>,
}

impl From<CreateApartmentRequest> for NewApartment {
    fn from(r: CreateApartmentRequest) -> Self {
        Self {
            address_number: r.address_number,
            area: r.area,
            status: r.status,
            owner_id: r.owner_id,
            owner_phone: r.owner_phone,
            member_ids: r.residents,
        }
    }
}

/// Only the fields present are changed. `residents`, when sent, replaces the
/// member list.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApartmentRequest {
    #[schema(value_type = Option<String>, example = "75.5")]
    pub area: Option<Decimal>,
    pub status: Option<ApartmentStatus>,
    pub owner_id: Option<i64>,
    #[validate(length(min = 1, max = 20, message = "ownerPhone must be 1-20 characters"))]
    pub owner_phone: Option<String>,
    pub residents: Option<Vec<i64>>,
}

impl From<UpdateApartmentRequest> for ApartmentUpdate {
    fn from(r: UpdateApartmentRequest) -> Self {
        Self {
            area: r.area,
            status: r.status,
            owner_id: r.owner_id,
            owner_phone: r.owner_phone,
            residents: r.residents,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListApartmentsParams {
    pub status: Option<ApartmentStatus>,
    pub owner_id: Option<i64>,
    #[param(value_type = Option<String>)]
    pub min_area: Option<Decimal>,
    #[param(value_type = Option<String>)]
    pub max_area: Option<Decimal>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

impl ListApartmentsParams {
    pub fn filter(&self) -> ApartmentFilter {
        ApartmentFilter {
            status: self.status,
            owner_id: self.owner_id,
            min_area: self.min_area,
            max_area: self.max_area,
        }
    }
}
