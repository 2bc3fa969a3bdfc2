use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use super::invoice_repository::{status_to_domain, status_to_entity};
use super::{db_err, fetch_page};
use crate::domain::utility_bill::{
    NewUtilityBill, UtilityBill, UtilityBillFilter, UtilityBillRepository,
};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{invoice_apartment, utility_bill};
use crate::shared::{Page, PageRequest};

fn entity_to_domain(m: utility_bill::Model) -> UtilityBill {
    UtilityBill {
        id: m.id,
        apartment_id: m.apartment_id,
        name: m.name,
        electricity: m.electricity,
        water: m.water,
        internet: m.internet,
        payment_status: status_to_domain(m.payment_status),
        created_at: m.created_at,
    }
}

pub struct SeaOrmUtilityBillRepository<C> {
    conn: Arc<C>,
}

impl<C> SeaOrmUtilityBillRepository<C> {
    pub fn new(conn: Arc<C>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C> UtilityBillRepository for SeaOrmUtilityBillRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<UtilityBill>> {
        let model = utility_bill::Entity::find_by_id(id)
            .one(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_by_apartment(&self, apartment_id: i64) -> DomainResult<Vec<UtilityBill>> {
        let models = utility_bill::Entity::find()
            .filter(utility_bill::Column::ApartmentId.eq(apartment_id))
            .order_by_asc(utility_bill::Column::Id)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn list(
        &self,
        filter: &UtilityBillFilter,
        page: PageRequest,
    ) -> DomainResult<Page<UtilityBill>> {
        let mut query = utility_bill::Entity::find().order_by_asc(utility_bill::Column::Id);
        if let Some(apartment_id) = filter.apartment_id {
            query = query.filter(utility_bill::Column::ApartmentId.eq(apartment_id));
        }
        if let Some(name) = &filter.name {
            query = query.filter(utility_bill::Column::Name.contains(name.as_str()));
        }
        if let Some(status) = filter.payment_status {
            query = query.filter(utility_bill::Column::PaymentStatus.eq(status_to_entity(status)));
        }
        let page = fetch_page(self.conn.as_ref(), query, page).await?;
        Ok(page.map(entity_to_domain))
    }

    async fn insert_many(&self, bills: Vec<NewUtilityBill>) -> DomainResult<Vec<UtilityBill>> {
        let now = Utc::now();
        let mut saved = Vec::with_capacity(bills.len());
        for bill in bills {
            let model = utility_bill::ActiveModel {
                id: NotSet,
                apartment_id: Set(bill.apartment_id),
                name: Set(bill.name),
                electricity: Set(bill.electricity),
                water: Set(bill.water),
                internet: Set(bill.internet),
                payment_status: Set(invoice_apartment::PaymentStatus::Unpaid),
                created_at: Set(now),
            };
            let result = model.insert(self.conn.as_ref()).await.map_err(db_err)?;
            saved.push(entity_to_domain(result));
        }
        info!("Imported {} utility bills", saved.len());
        Ok(saved)
    }

    async fn update(&self, bill: UtilityBill) -> DomainResult<UtilityBill> {
        let model = utility_bill::ActiveModel {
            id: Set(bill.id),
            apartment_id: Set(bill.apartment_id),
            name: Set(bill.name),
            electricity: Set(bill.electricity),
            water: Set(bill.water),
            internet: Set(bill.internet),
            payment_status: Set(status_to_entity(bill.payment_status)),
            created_at: Set(bill.created_at),
        };
        let result = model.update(self.conn.as_ref()).await.map_err(db_err)?;
        Ok(entity_to_domain(result))
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        utility_bill::Entity::delete_by_id(id)
            .exec(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn delete_by_apartment(&self, apartment_id: i64) -> DomainResult<()> {
        utility_bill::Entity::delete_many()
            .filter(utility_bill::Column::ApartmentId.eq(apartment_id))
            .exec(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
