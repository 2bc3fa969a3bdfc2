use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use super::{db_err, fetch_page};
use crate::domain::user::{NewUser, User, UserFilter, UserRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::user;
use crate::shared::{Page, PageRequest};

fn entity_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        name: model.name,
        email: model.email,
        password_hash: model.password_hash,
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub struct SeaOrmUserRepository<C> {
    conn: Arc<C>,
}

impl<C> SeaOrmUserRepository<C> {
    pub fn new(conn: Arc<C>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C> UserRepository for SeaOrmUserRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn list(&self, filter: &UserFilter, page: PageRequest) -> DomainResult<Page<User>> {
        let mut query = user::Entity::find().order_by_asc(user::Column::Id);
        if let Some(email) = &filter.email {
            query = query.filter(user::Column::Email.contains(email.as_str()));
        }
        if let Some(active) = filter.is_active {
            query = query.filter(user::Column::IsActive.eq(active));
        }
        let page = fetch_page(self.conn.as_ref(), query, page).await?;
        Ok(page.map(entity_to_domain))
    }

    async fn count(&self) -> DomainResult<u64> {
        user::Entity::find()
            .count(self.conn.as_ref())
            .await
            .map_err(db_err)
    }

    async fn insert(&self, new_user: NewUser) -> DomainResult<User> {
        let now = Utc::now();
        let model = user::ActiveModel {
            id: NotSet,
            name: Set(new_user.name),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model.insert(self.conn.as_ref()).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") || e.to_string().contains("duplicate") {
                DomainError::Conflict("Email already exists".to_string())
            } else {
                db_err(e)
            }
        })?;
        info!("User created: {} ({})", result.email, result.id);
        Ok(entity_to_domain(result))
    }

    async fn update(&self, u: User) -> DomainResult<User> {
        let model = user::ActiveModel {
            id: Set(u.id),
            name: Set(u.name),
            email: Set(u.email),
            password_hash: Set(u.password_hash),
            is_active: Set(u.is_active),
            created_at: Set(u.created_at),
            updated_at: Set(Utc::now()),
        };
        let result = model.update(self.conn.as_ref()).await.map_err(db_err)?;
        Ok(entity_to_domain(result))
    }
}
