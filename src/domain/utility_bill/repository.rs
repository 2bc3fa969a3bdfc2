use async_trait::async_trait;

use super::model::{NewUtilityBill, UtilityBill, UtilityBillFilter};
use crate::domain::DomainResult;
use crate::shared::{Page, PageRequest};

#[async_trait]
pub trait UtilityBillRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<UtilityBill>>;
    async fn find_by_apartment(&self, apartment_id: i64) -> DomainResult<Vec<UtilityBill>>;
    async fn list(
        &self,
        filter: &UtilityBillFilter,
        page: PageRequest,
    ) -> DomainResult<Page<UtilityBill>>;
    async fn insert_many(&self, bills: Vec<NewUtilityBill>) -> DomainResult<Vec<UtilityBill>>;
    async fn update(&self, bill: UtilityBill) -> DomainResult<UtilityBill>;
    async fn delete(&self, id: i64) -> DomainResult<()>;
    async fn delete_by_apartment(&self, apartment_id: i64) -> DomainResult<()>;
}
