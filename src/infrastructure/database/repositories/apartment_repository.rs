use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::{db_err, fetch_page};
use crate::domain::apartment::{Apartment, ApartmentFilter, ApartmentRepository, ApartmentStatus};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::apartment;
use crate::shared::{Page, PageRequest};

fn status_to_domain(s: apartment::ApartmentStatus) -> ApartmentStatus {
    match s {
        apartment::ApartmentStatus::Business => ApartmentStatus::Business,
        apartment::ApartmentStatus::Residential => ApartmentStatus::Residential,
        apartment::ApartmentStatus::Vacant => ApartmentStatus::Vacant,
    }
}

fn status_to_entity(s: ApartmentStatus) -> apartment::ApartmentStatus {
    match s {
        ApartmentStatus::Business => apartment::ApartmentStatus::Business,
        ApartmentStatus::Residential => apartment::ApartmentStatus::Residential,
        ApartmentStatus::Vacant => apartment::ApartmentStatus::Vacant,
    }
}

fn entity_to_domain(m: apartment::Model) -> Apartment {
    Apartment {
        address_number: m.address_number,
        area: m.area,
        status: status_to_domain(m.status),
        owner_id: m.owner_id,
        owner_phone: m.owner_phone,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn domain_to_active(a: Apartment) -> apartment::ActiveModel {
    apartment::ActiveModel {
        address_number: Set(a.address_number),
        area: Set(a.area),
        status: Set(status_to_entity(a.status)),
        owner_id: Set(a.owner_id),
        owner_phone: Set(a.owner_phone),
        created_at: Set(a.created_at),
        updated_at: Set(a.updated_at),
    }
}

pub struct SeaOrmApartmentRepository<C> {
    conn: Arc<C>,
}

impl<C> SeaOrmApartmentRepository<C> {
    pub fn new(conn: Arc<C>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C> ApartmentRepository for SeaOrmApartmentRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, address_number: i64) -> DomainResult<Option<Apartment>> {
        let model = apartment::Entity::find_by_id(address_number)
            .one(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_by_owner(&self, resident_id: i64) -> DomainResult<Option<Apartment>> {
        let model = apartment::Entity::find()
            .filter(apartment::Column::OwnerId.eq(resident_id))
            .one(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Apartment>> {
        let models = apartment::Entity::find()
            .order_by_asc(apartment::Column::AddressNumber)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn list(
        &self,
        filter: &ApartmentFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Apartment>> {
        let mut query = apartment::Entity::find().order_by_asc(apartment::Column::AddressNumber);
        if let Some(status) = filter.status {
            query = query.filter(apartment::Column::Status.eq(status_to_entity(status)));
        }
        if let Some(owner_id) = filter.owner_id {
            query = query.filter(apartment::Column::OwnerId.eq(owner_id));
        }
        if let Some(min) = filter.min_area {
            query = query.filter(apartment::Column::Area.gte(min));
        }
        if let Some(max) = filter.max_area {
            query = query.filter(apartment::Column::Area.lte(max));
        }
        let page = fetch_page(self.conn.as_ref(), query, page).await?;
        Ok(page.map(entity_to_domain))
    }

    async fn insert(&self, a: Apartment) -> DomainResult<Apartment> {
        let result = domain_to_active(a)
            .insert(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        info!("Apartment created: {}", result.address_number);
        Ok(entity_to_domain(result))
    }

    async fn update(&self, mut a: Apartment) -> DomainResult<Apartment> {
        a.updated_at = Utc::now();
        let result = domain_to_active(a)
            .update(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(entity_to_domain(result))
    }

    async fn delete(&self, address_number: i64) -> DomainResult<()> {
        apartment::Entity::delete_by_id(address_number)
            .exec(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        info!("Apartment deleted: {}", address_number);
        Ok(())
    }
}
