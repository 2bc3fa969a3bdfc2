use async_trait::async_trait;

use super::model::{Vehicle, VehicleFilter};
use crate::domain::DomainResult;
use crate::shared::{Page, PageRequest};

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Vehicle>>;
    async fn find_by_apartment(&self, apartment_id: i64) -> DomainResult<Vec<Vehicle>>;
    async fn list(&self, filter: &VehicleFilter, page: PageRequest)
        -> DomainResult<Page<Vehicle>>;
    async fn insert(&self, vehicle: Vehicle) -> DomainResult<Vehicle>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
    /// Remove every vehicle of an apartment, returning how many were removed.
    async fn delete_by_apartment(&self, apartment_id: i64) -> DomainResult<u64>;
}
