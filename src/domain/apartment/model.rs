//! Apartment domain entity and its read model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::resident::Resident;
use crate::domain::vehicle::{Vehicle, VehicleCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ApartmentStatus {
    Business,
    Residential,
    Vacant,
}

impl Default for ApartmentStatus {
    fn default() -> Self {
        Self::Vacant
    }
}

impl std::fmt::Display for ApartmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Business => write!(f, "Business"),
            Self::Residential => write!(f, "Residential"),
            Self::Vacant => write!(f, "Vacant"),
        }
    }
}

/// A unit in the building, keyed by its address number.
#[derive(Debug, Clone, PartialEq)]
pub struct Apartment {
    pub address_number: i64,
    pub area: Decimal,
    pub status: ApartmentStatus,
    pub owner_id: Option<i64>,
    pub owner_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Apartment {
    /// Drop the owner and the owner's contact number.
    pub fn clear_owner(&mut self) {
        self.owner_id = None;
        self.owner_phone = None;
        self.updated_at = Utc::now();
    }
}

/// Apartment together with the records that hang off it.
#[derive(Debug, Clone)]
pub struct ApartmentDetails {
    pub apartment: Apartment,
    pub owner: Option<Resident>,
    pub members: Vec<Resident>,
    pub vehicles: Vec<Vehicle>,
}

impl ApartmentDetails {
    /// Members still living in the apartment.
    pub fn number_of_members(&self) -> usize {
        self.members.iter().filter(|r| !r.is_moved()).count()
    }

    pub fn number_of_cars(&self) -> usize {
        self.count_vehicles(VehicleCategory::Car)
    }

    pub fn number_of_motorbikes(&self) -> usize {
        self.count_vehicles(VehicleCategory::Motorbike)
    }

    fn count_vehicles(&self, category: VehicleCategory) -> usize {
        self.vehicles
            .iter()
            .filter(|v| v.category == category)
            .count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApartmentFilter {
    pub status: Option<ApartmentStatus>,
    pub owner_id: Option<i64>,
    pub min_area: Option<Decimal>,
    pub max_area: Option<Decimal>,
}

impl ApartmentFilter {
    pub fn matches(&self, apartment: &Apartment) -> bool {
        if let Some(status) = self.status {
            if apartment.status != status {
                return false;
            }
        }
        if let Some(owner_id) = self.owner_id {
            if apartment.owner_id != Some(owner_id) {
                return false;
            }
        }
        if let Some(min) = self.min_area {
            if apartment.area < min {
                return false;
            }
        }
        if let Some(max) = self.max_area {
            if apartment.area > max {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resident::ResidentStatus;
    use rust_decimal_macros::dec;

    fn sample_apartment() -> Apartment {
        Apartment {
            address_number: 101,
            area: dec!(50),
            status: ApartmentStatus::Residential,
            owner_id: Some(1),
            owner_phone: Some("0900000000".into()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn member(id: i64, status: ResidentStatus) -> Resident {
        Resident {
            id,
            name: format!("Resident {id}"),
            dob: None,
            gender: None,
            cic: None,
            status,
            apartment_id: Some(101),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn vehicle(id: &str, category: VehicleCategory) -> Vehicle {
        Vehicle {
            id: id.into(),
            category,
            apartment_id: 101,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn clear_owner_drops_phone() {
        let mut apartment = sample_apartment();
        apartment.clear_owner();
        assert_eq!(apartment.owner_id, None);
        assert_eq!(apartment.owner_phone, None);
    }

    #[test]
    fn details_counts() {
        let details = ApartmentDetails {
            apartment: sample_apartment(),
            owner: Some(member(1, ResidentStatus::Active)),
            members: vec![
                member(1, ResidentStatus::Active),
                member(2, ResidentStatus::Absent),
                member(3, ResidentStatus::Moved),
            ],
            vehicles: vec![
                vehicle("29A-001", VehicleCategory::Car),
                vehicle("29B-002", VehicleCategory::Motorbike),
                vehicle("29B-003", VehicleCategory::Motorbike),
            ],
        };
        assert_eq!(details.number_of_members(), 2);
        assert_eq!(details.number_of_cars(), 1);
        assert_eq!(details.number_of_motorbikes(), 2);
    }

    #[test]
    fn filter_by_area_range() {
        let filter = ApartmentFilter {
            min_area: Some(dec!(40)),
            max_area: Some(dec!(60)),
            ..Default::default()
        };
        assert!(filter.matches(&sample_apartment()));

        let too_small = ApartmentFilter {
            min_area: Some(dec!(51)),
            ..Default::default()
        };
        assert!(!too_small.matches(&sample_apartment()));
    }
}
