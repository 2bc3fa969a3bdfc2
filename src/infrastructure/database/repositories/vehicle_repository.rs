use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::{db_err, fetch_page};
use crate::domain::vehicle::{Vehicle, VehicleCategory, VehicleFilter, VehicleRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::vehicle;
use crate::shared::{Page, PageRequest};

fn category_to_domain(c: vehicle::VehicleCategory) -> VehicleCategory {
    match c {
        vehicle::VehicleCategory::Car => VehicleCategory::Car,
        vehicle::VehicleCategory::Motorbike => VehicleCategory::Motorbike,
    }
}

fn category_to_entity(c: VehicleCategory) -> vehicle::VehicleCategory {
    match c {
        VehicleCategory::Car => vehicle::VehicleCategory::Car,
        VehicleCategory::Motorbike => vehicle::VehicleCategory::Motorbike,
    }
}

fn entity_to_domain(m: vehicle::Model) -> Vehicle {
    Vehicle {
        id: m.id,
        category: category_to_domain(m.category),
        apartment_id: m.apartment_id,
        created_at: m.created_at,
    }
}

pub struct SeaOrmVehicleRepository<C> {
    conn: Arc<C>,
}

impl<C> SeaOrmVehicleRepository<C> {
    pub fn new(conn: Arc<C>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C> VehicleRepository for SeaOrmVehicleRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Vehicle>> {
        let model = vehicle::Entity::find_by_id(id.to_string())
            .one(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_by_apartment(&self, apartment_id: i64) -> DomainResult<Vec<Vehicle>> {
        let models = vehicle::Entity::find()
            .filter(vehicle::Column::ApartmentId.eq(apartment_id))
            .order_by_asc(vehicle::Column::Id)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn list(&self, filter: &VehicleFilter, page: PageRequest) -> DomainResult<Page<Vehicle>> {
        let mut query = vehicle::Entity::find().order_by_asc(vehicle::Column::Id);
        if let Some(category) = filter.category {
            query = query.filter(vehicle::Column::Category.eq(category_to_entity(category)));
        }
        if let Some(apartment_id) = filter.apartment_id {
            query = query.filter(vehicle::Column::ApartmentId.eq(apartment_id));
        }
        let page = fetch_page(self.conn.as_ref(), query, page).await?;
        Ok(page.map(entity_to_domain))
    }

    async fn insert(&self, v: Vehicle) -> DomainResult<Vehicle> {
        let model = vehicle::ActiveModel {
            id: Set(v.id),
            category: Set(category_to_entity(v.category)),
            apartment_id: Set(v.apartment_id),
            created_at: Set(v.created_at),
        };
        let result = model.insert(self.conn.as_ref()).await.map_err(db_err)?;
        info!("Vehicle registered: {} -> {}", result.id, result.apartment_id);
        Ok(entity_to_domain(result))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        vehicle::Entity::delete_by_id(id.to_string())
            .exec(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn delete_by_apartment(&self, apartment_id: i64) -> DomainResult<u64> {
        let result = vehicle::Entity::delete_many()
            .filter(vehicle::Column::ApartmentId.eq(apartment_id))
            .exec(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        info!(
            "Deleted {} vehicles of apartment {}",
            result.rows_affected, apartment_id
        );
        Ok(result.rows_affected)
    }
}
