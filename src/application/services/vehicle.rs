//! Vehicle registration

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::vehicle::{Vehicle, VehicleCategory, VehicleFilter};
use crate::domain::{DomainError, DomainResult, Store};
use crate::shared::{Page, PageRequest};

use super::lookups::require_apartment;

#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub id: String,
    pub category: VehicleCategory,
    pub apartment_id: i64,
}

pub struct VehicleService {
    store: Arc<dyn Store>,
}

impl VehicleService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self, filter: &VehicleFilter, page: PageRequest) -> DomainResult<Page<Vehicle>> {
        self.store.vehicles().list(filter, page).await
    }

    pub async fn get(&self, id: &str) -> DomainResult<Vehicle> {
        self.store
            .vehicles()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Vehicle", "id", id))
    }

    pub async fn for_apartment(&self, apartment_id: i64) -> DomainResult<Vec<Vehicle>> {
        require_apartment(&*self.store, apartment_id).await?;
        self.store.vehicles().find_by_apartment(apartment_id).await
    }

    /// Register a vehicle. The apartment must exist and have an owner.
    pub async fn register(&self, req: NewVehicle) -> DomainResult<Vehicle> {
        let id = req.id.trim().to_string();
        if id.is_empty() {
            return Err(DomainError::Validation("Vehicle id is null".into()));
        }

        let uow = self.store.begin().await?;
        if uow.vehicles().find_by_id(&id).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "Vehicle with id = {} already exists",
                id
            )));
        }

        let apartment = require_apartment(&*uow, req.apartment_id).await?;
        if apartment.owner_id.is_none() {
            return Err(DomainError::Validation(format!(
                "Apartment with id {} doesn't have an owner yet. Please assign an owner before registering vehicles.",
                apartment.address_number
            )));
        }

        let vehicle = uow
            .vehicles()
            .insert(Vehicle {
                id,
                category: req.category,
                apartment_id: apartment.address_number,
                created_at: Utc::now(),
            })
            .await?;
        uow.commit().await?;
        info!(vehicle_id = %vehicle.id, apartment = vehicle.apartment_id, "Vehicle registered");
        Ok(vehicle)
    }

    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        let uow = self.store.begin().await?;
        if uow.vehicles().find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("Vehicle", "id", id));
        }
        uow.vehicles().delete(id).await?;
        uow.commit().await?;
        info!(vehicle_id = %id, "Vehicle deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::*;
    use rust_decimal_macros::dec;

    fn car(id: &str, apartment_id: i64) -> NewVehicle {
        NewVehicle {
            id: id.into(),
            category: VehicleCategory::Car,
            apartment_id,
        }
    }

    #[tokio::test]
    async fn register_requires_owner() {
        let store = store();
        seed_apartment(&store, 101, dec!(50), None).await;
        let svc = VehicleService::new(store.clone());

        let err = svc.register(car("V001", 101)).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Apartment with id 101 doesn't have an owner yet. Please assign an owner before registering vehicles."
        );
    }

    #[tokio::test]
    async fn register_rejects_blank_and_duplicate_ids() {
        let store = store();
        seed_apartment(&store, 101, dec!(50), Some(1)).await;
        let svc = VehicleService::new(store.clone());

        assert!(matches!(
            svc.register(car("  ", 101)).await.unwrap_err(),
            DomainError::Validation(_)
        ));

        svc.register(car("V001", 101)).await.unwrap();
        let dup = svc.register(car("V001", 101)).await.unwrap_err();
        assert_eq!(dup.to_string(), "Vehicle with id = V001 already exists");

        assert!(matches!(
            svc.register(car("V002", 999)).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn delete_and_lookup() {
        let store = store();
        seed_apartment(&store, 101, dec!(50), Some(1)).await;
        let svc = VehicleService::new(store.clone());
        svc.register(car("V001", 101)).await.unwrap();

        assert_eq!(svc.for_apartment(101).await.unwrap().len(), 1);
        svc.delete("V001").await.unwrap();
        assert!(matches!(
            svc.get("V001").await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }
}
