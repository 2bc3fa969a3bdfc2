use async_trait::async_trait;

use super::model::{Resident, ResidentFilter};
use crate::domain::DomainResult;
use crate::shared::{Page, PageRequest};

#[async_trait]
pub trait ResidentRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Resident>>;
    /// Residents whose id is in `ids`; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[i64]) -> DomainResult<Vec<Resident>>;
    /// Current members of an apartment, the owner included.
    async fn find_by_apartment(&self, apartment_id: i64) -> DomainResult<Vec<Resident>>;
    async fn list(&self, filter: &ResidentFilter, page: PageRequest)
        -> DomainResult<Page<Resident>>;
    async fn insert(&self, resident: Resident) -> DomainResult<Resident>;
    async fn update(&self, resident: Resident) -> DomainResult<Resident>;
    async fn delete(&self, id: i64) -> DomainResult<()>;
}
