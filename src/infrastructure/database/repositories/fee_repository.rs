use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use super::{db_err, fetch_page};
use crate::domain::fee::{Fee, FeeFilter, FeeRepository, FeeType, NewFee};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::fee;
use crate::shared::{Page, PageRequest};

fn type_to_domain(t: fee::FeeType) -> FeeType {
    match t {
        fee::FeeType::DepartmentFee => FeeType::DepartmentFee,
        fee::FeeType::VehicleFee => FeeType::VehicleFee,
        fee::FeeType::ContributionFund => FeeType::ContributionFund,
    }
}

fn type_to_entity(t: FeeType) -> fee::FeeType {
    match t {
        FeeType::DepartmentFee => fee::FeeType::DepartmentFee,
        FeeType::VehicleFee => fee::FeeType::VehicleFee,
        FeeType::ContributionFund => fee::FeeType::ContributionFund,
    }
}

fn entity_to_domain(m: fee::Model) -> Fee {
    Fee {
        id: m.id,
        name: m.name,
        description: m.description,
        fee_type: type_to_domain(m.fee_type),
        unit_price: m.unit_price,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

pub struct SeaOrmFeeRepository<C> {
    conn: Arc<C>,
}

impl<C> SeaOrmFeeRepository<C> {
    pub fn new(conn: Arc<C>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C> FeeRepository for SeaOrmFeeRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Fee>> {
        let model = fee::Entity::find_by_id(id)
            .one(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> DomainResult<Vec<Fee>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = fee::Entity::find()
            .filter(fee::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(fee::Column::Id)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn list(&self, filter: &FeeFilter, page: PageRequest) -> DomainResult<Page<Fee>> {
        let mut query = fee::Entity::find().order_by_asc(fee::Column::Id);
        if let Some(name) = &filter.name {
            query = query.filter(fee::Column::Name.contains(name.as_str()));
        }
        if let Some(fee_type) = filter.fee_type {
            query = query.filter(fee::Column::FeeType.eq(type_to_entity(fee_type)));
        }
        let page = fetch_page(self.conn.as_ref(), query, page).await?;
        Ok(page.map(entity_to_domain))
    }

    async fn insert(&self, f: NewFee) -> DomainResult<Fee> {
        let now = Utc::now();
        let model = fee::ActiveModel {
            id: NotSet,
            name: Set(f.name),
            description: Set(f.description),
            fee_type: Set(type_to_entity(f.fee_type)),
            unit_price: Set(f.unit_price),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let result = model.insert(self.conn.as_ref()).await.map_err(db_err)?;
        info!("Fee created: {} ({})", result.name, result.id);
        Ok(entity_to_domain(result))
    }

    async fn update(&self, f: Fee) -> DomainResult<Fee> {
        let model = fee::ActiveModel {
            id: Set(f.id),
            name: Set(f.name),
            description: Set(f.description),
            fee_type: Set(type_to_entity(f.fee_type)),
            unit_price: Set(f.unit_price),
            created_at: Set(f.created_at),
            updated_at: Set(Utc::now()),
        };
        let result = model.update(self.conn.as_ref()).await.map_err(db_err)?;
        Ok(entity_to_domain(result))
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        fee::Entity::delete_by_id(id)
            .exec(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        info!("Fee deleted: {}", id);
        Ok(())
    }
}
