//! Fixtures shared by the service tests

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use crate::domain::apartment::{Apartment, ApartmentStatus};
use crate::domain::resident::{Resident, ResidentStatus};
use crate::domain::vehicle::{Vehicle, VehicleCategory};
use crate::domain::RepositoryProvider;
use crate::infrastructure::InMemoryStore;

pub fn store() -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::new())
}

pub async fn seed_resident(store: &InMemoryStore, id: i64, apartment_id: Option<i64>) -> Resident {
    store
        .residents()
        .insert(Resident {
            id,
            name: format!("Resident {id}"),
            dob: None,
            gender: None,
            cic: Some(id.to_string()),
            status: ResidentStatus::Active,
            apartment_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
        .await
        .unwrap()
}

pub async fn seed_apartment(
    store: &InMemoryStore,
    address_number: i64,
    area: Decimal,
    owner_id: Option<i64>,
) -> Apartment {
    store
        .apartments()
        .insert(Apartment {
            address_number,
            area,
            status: ApartmentStatus::Residential,
            owner_id,
            owner_phone: owner_id.map(|_| "0900000000".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
        .await
        .unwrap()
}

pub async fn seed_vehicle(
    store: &InMemoryStore,
    id: &str,
    category: VehicleCategory,
    apartment_id: i64,
) -> Vehicle {
    store
        .vehicles()
        .insert(Vehicle {
            id: id.to_string(),
            category,
            apartment_id,
            created_at: Utc::now(),
        })
        .await
        .unwrap()
}
