use async_trait::async_trait;

use super::model::{Fee, FeeFilter, NewFee};
use crate::domain::DomainResult;
use crate::shared::{Page, PageRequest};

#[async_trait]
pub trait FeeRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Fee>>;
    async fn find_by_ids(&self, ids: &[i64]) -> DomainResult<Vec<Fee>>;
    async fn list(&self, filter: &FeeFilter, page: PageRequest) -> DomainResult<Page<Fee>>;
    async fn insert(&self, fee: NewFee) -> DomainResult<Fee>;
    async fn update(&self, fee: Fee) -> DomainResult<Fee>;
    async fn delete(&self, id: i64) -> DomainResult<()>;
}
