use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::services::{NewResident, ResidentUpdate};
use crate::domain::{Gender, Resident, ResidentFilter, ResidentStatus};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResidentDto {
    pub id: i64,
    pub name: String,
    pub dob: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub cic: Option<String>,
    pub status: ResidentStatus,
    pub apartment_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Resident> for ResidentDto {
    fn from(r: Resident) -> Self {
        Self {
            id: r.id,
            name: r.name,
            dob: r.dob,
            gender: r.gender,
            cic: r.cic,
            status: r.status,
            apartment_id: r.apartment_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// An apartment id of 0 means "no apartment".
fn apartment_link(id: Option<i64>) -> Option<i64> {
    id.filter(|id| *id != 0)
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateResidentRequest {
    /// National identity number
    #[validate(range(min = 1, message = "id must be a positive number"))]
    pub id: i64,
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    pub dob: Option<NaiveDate>,
    pub gender: Option<Gender>,
    #[validate(length(max = 20, message = "cic must be at most 20 characters"))]
    pub cic: Option<String>,
    /// Defaults to `Active`
    pub status: Option<ResidentStatus>,
    #[serde(alias = "addressNumber")]
    pub apartment_id: Option<i64>,
}

impl From<CreateResidentRequest> for NewResident {
    fn from(r: CreateResidentRequest) -> Self {
        Self {
            id: r.id,
            name: r.name,
            dob: r.dob,
            gender: r.gender,
            cic: r.cic,
            status: r.status,
            apartment_id: apartment_link(r.apartment_id),
        }
    }
}

/// Only the fields present are changed. `status: "Moved"` moves the resident out.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResidentRequest {
    #[validate(length(min = 1, max = 100, message = "name must not be blank"))]
    pub name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<Gender>,
    #[validate(length(max = 20, message = "cic must be at most 20 characters"))]
    pub cic: Option<String>,
    pub status: Option<ResidentStatus>,
    #[serde(alias = "addressNumber")]
    pub apartment_id: Option<i64>,
}

impl From<UpdateResidentRequest> for ResidentUpdate {
    fn from(r: UpdateResidentRequest) -> Self {
        Self {
            name: r.name,
            dob: r.dob,
            gender: r.gender,
            cic: r.cic,
            status: r.status,
            apartment_id: apartment_link(r.apartment_id),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListResidentsParams {
    /// Substring of the name
    pub name: Option<String>,
    pub status: Option<ResidentStatus>,
    pub apartment_id: Option<i64>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

impl ListResidentsParams {
    pub fn filter(&self) -> ResidentFilter {
        ResidentFilter {
            name: self.name.clone(),
            status: self.status,
            apartment_id: self.apartment_id,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_field_names_are_accepted() {
        let req: CreateResidentRequest = serde_json::from_value(serde_json::json!({
            "id": 79,
            "name": "Nguyen Van A",
            "status": "Resident",
            "addressNumber": 101
        }))
        .unwrap();
        let new: NewResident = req.into();
        assert_eq!(new.status, Some(ResidentStatus::Active));
        assert_eq!(new.apartment_id, Some(101));
    }

    #[test]
    fn zero_apartment_means_none() {
        let req: UpdateResidentRequest =
            serde_json::from_value(serde_json::json!({ "apartmentId": 0 })).unwrap();
        let update: ResidentUpdate = req.into();
        assert_eq!(update.apartment_id, None);
    }
}
