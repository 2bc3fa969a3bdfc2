use async_trait::async_trait;

use super::model::{Apartment, ApartmentFilter};
use crate::domain::DomainResult;
use crate::shared::{Page, PageRequest};

#[async_trait]
pub trait ApartmentRepository: Send + Sync {
    async fn find_by_id(&self, address_number: i64) -> DomainResult<Option<Apartment>>;
    /// The apartment owned by `resident_id`, if any.
    async fn find_by_owner(&self, resident_id: i64) -> DomainResult<Option<Apartment>>;
    async fn find_all(&self) -> DomainResult<Vec<Apartment>>;
    async fn list(
        &self,
        filter: &ApartmentFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Apartment>>;
    async fn insert(&self, apartment: Apartment) -> DomainResult<Apartment>;
    async fn update(&self, apartment: Apartment) -> DomainResult<Apartment>;
    async fn delete(&self, address_number: i64) -> DomainResult<()>;
}
