use async_trait::async_trait;

use super::model::{NewUser, User, UserFilter};
use crate::domain::DomainResult;
use crate::shared::{Page, PageRequest};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn list(&self, filter: &UserFilter, page: PageRequest) -> DomainResult<Page<User>>;
    async fn count(&self) -> DomainResult<u64>;
    async fn insert(&self, user: NewUser) -> DomainResult<User>;
    async fn update(&self, user: User) -> DomainResult<User>;
}
