//! SeaORM implementations of InvoiceRepository and InvoiceApartmentRepository

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use super::{db_err, fetch_page};
use crate::domain::invoice::{
    FeeAmounts, Invoice, InvoiceApartment, InvoiceApartmentRepository, InvoiceFilter,
    InvoiceRepository, NewInvoiceApartment, PaymentStatus,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{fee_invoice, invoice, invoice_apartment};
use crate::shared::{Page, PageRequest};

// ── Conversion helpers ──────────────────────────────────────────

fn invoice_to_domain(m: invoice::Model) -> Invoice {
    Invoice {
        id: m.id,
        name: m.name,
        description: m.description,
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn invoice_to_active(i: Invoice) -> invoice::ActiveModel {
    invoice::ActiveModel {
        id: Set(i.id),
        name: Set(i.name),
        description: Set(i.description),
        is_active: Set(i.is_active),
        created_at: Set(i.created_at),
        updated_at: Set(i.updated_at),
    }
}

pub(crate) fn status_to_domain(s: invoice_apartment::PaymentStatus) -> PaymentStatus {
    match s {
        invoice_apartment::PaymentStatus::Unpaid => PaymentStatus::Unpaid,
        invoice_apartment::PaymentStatus::Paid => PaymentStatus::Paid,
    }
}

pub(crate) fn status_to_entity(s: PaymentStatus) -> invoice_apartment::PaymentStatus {
    match s {
        PaymentStatus::Unpaid => invoice_apartment::PaymentStatus::Unpaid,
        PaymentStatus::Paid => invoice_apartment::PaymentStatus::Paid,
    }
}

fn encode_amounts(amounts: &FeeAmounts) -> DomainResult<String> {
    serde_json::to_string(amounts)
        .map_err(|e| DomainError::Internal(format!("Failed to encode fee amounts: {}", e)))
}

fn link_to_domain(m: invoice_apartment::Model) -> DomainResult<InvoiceApartment> {
    let fee_amounts: FeeAmounts = serde_json::from_str(&m.fee_amounts).map_err(|e| {
        DomainError::Internal(format!("Corrupt fee amounts on link {}: {}", m.id, e))
    })?;
    Ok(InvoiceApartment {
        id: m.id,
        invoice_id: m.invoice_id,
        apartment_id: m.apartment_id,
        payment_status: status_to_domain(m.payment_status),
        fee_amounts,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn links_to_domain(models: Vec<invoice_apartment::Model>) -> DomainResult<Vec<InvoiceApartment>> {
    models.into_iter().map(link_to_domain).collect()
}

// ── SeaOrmInvoiceRepository ─────────────────────────────────────

pub struct SeaOrmInvoiceRepository<C> {
    conn: Arc<C>,
}

impl<C> SeaOrmInvoiceRepository<C> {
    pub fn new(conn: Arc<C>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C> InvoiceRepository for SeaOrmInvoiceRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Invoice>> {
        let model = invoice::Entity::find_by_id(id.to_string())
            .one(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(model.map(invoice_to_domain))
    }

    async fn find_active(&self) -> DomainResult<Vec<Invoice>> {
        let models = invoice::Entity::find()
            .filter(invoice::Column::IsActive.eq(true))
            .order_by_asc(invoice::Column::Id)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(invoice_to_domain).collect())
    }

    async fn list(&self, filter: &InvoiceFilter, page: PageRequest) -> DomainResult<Page<Invoice>> {
        let mut query = invoice::Entity::find().order_by_asc(invoice::Column::Id);
        if let Some(name) = &filter.name {
            query = query.filter(invoice::Column::Name.contains(name.as_str()));
        }
        if let Some(active) = filter.is_active {
            query = query.filter(invoice::Column::IsActive.eq(active));
        }
        let page = fetch_page(self.conn.as_ref(), query, page).await?;
        Ok(page.map(invoice_to_domain))
    }

    async fn insert(&self, i: Invoice) -> DomainResult<Invoice> {
        let result = invoice_to_active(i)
            .insert(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        info!("Invoice created: {}", result.id);
        Ok(invoice_to_domain(result))
    }

    async fn update(&self, mut i: Invoice) -> DomainResult<Invoice> {
        i.updated_at = Utc::now();
        let result = invoice_to_active(i)
            .update(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(invoice_to_domain(result))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        fee_invoice::Entity::delete_many()
            .filter(fee_invoice::Column::InvoiceId.eq(id))
            .exec(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        invoice::Entity::delete_by_id(id.to_string())
            .exec(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        info!("Invoice deleted: {}", id);
        Ok(())
    }

    async fn fee_ids(&self, invoice_id: &str) -> DomainResult<Vec<i64>> {
        let models = fee_invoice::Entity::find()
            .filter(fee_invoice::Column::InvoiceId.eq(invoice_id))
            .order_by_asc(fee_invoice::Column::FeeId)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(|m| m.fee_id).collect())
    }

    async fn replace_fees(&self, invoice_id: &str, fee_ids: &[i64]) -> DomainResult<()> {
        fee_invoice::Entity::delete_many()
            .filter(fee_invoice::Column::InvoiceId.eq(invoice_id))
            .exec(self.conn.as_ref())
            .await
            .map_err(db_err)?;

        if fee_ids.is_empty() {
            return Ok(());
        }

        let rows = fee_ids.iter().map(|fee_id| fee_invoice::ActiveModel {
            fee_id: Set(*fee_id),
            invoice_id: Set(invoice_id.to_string()),
        });
        fee_invoice::Entity::insert_many(rows)
            .exec_without_returning(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn remove_fee(&self, fee_id: i64) -> DomainResult<()> {
        fee_invoice::Entity::delete_many()
            .filter(fee_invoice::Column::FeeId.eq(fee_id))
            .exec(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

// ── SeaOrmInvoiceApartmentRepository ────────────────────────────

pub struct SeaOrmInvoiceApartmentRepository<C> {
    conn: Arc<C>,
}

impl<C> SeaOrmInvoiceApartmentRepository<C> {
    pub fn new(conn: Arc<C>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C> InvoiceApartmentRepository for SeaOrmInvoiceApartmentRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<InvoiceApartment>> {
        let model = invoice_apartment::Entity::find_by_id(id)
            .one(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        model.map(link_to_domain).transpose()
    }

    async fn find(
        &self,
        invoice_id: &str,
        apartment_id: i64,
    ) -> DomainResult<Option<InvoiceApartment>> {
        let model = invoice_apartment::Entity::find()
            .filter(invoice_apartment::Column::InvoiceId.eq(invoice_id))
            .filter(invoice_apartment::Column::ApartmentId.eq(apartment_id))
            .one(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        model.map(link_to_domain).transpose()
    }

    async fn for_apartment(&self, apartment_id: i64) -> DomainResult<Vec<InvoiceApartment>> {
        let models = invoice_apartment::Entity::find()
            .filter(invoice_apartment::Column::ApartmentId.eq(apartment_id))
            .order_by_asc(invoice_apartment::Column::Id)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        links_to_domain(models)
    }

    async fn for_invoice(&self, invoice_id: &str) -> DomainResult<Vec<InvoiceApartment>> {
        let models = invoice_apartment::Entity::find()
            .filter(invoice_apartment::Column::InvoiceId.eq(invoice_id))
            .order_by_asc(invoice_apartment::Column::Id)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        links_to_domain(models)
    }

    async fn insert(&self, link: NewInvoiceApartment) -> DomainResult<InvoiceApartment> {
        let now = Utc::now();
        let model = invoice_apartment::ActiveModel {
            id: NotSet,
            invoice_id: Set(link.invoice_id),
            apartment_id: Set(link.apartment_id),
            payment_status: Set(invoice_apartment::PaymentStatus::Unpaid),
            fee_amounts: Set(encode_amounts(&FeeAmounts::new())?),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let result = model.insert(self.conn.as_ref()).await.map_err(db_err)?;
        link_to_domain(result)
    }

    async fn update(&self, link: InvoiceApartment) -> DomainResult<InvoiceApartment> {
        let model = invoice_apartment::ActiveModel {
            id: Set(link.id),
            invoice_id: Set(link.invoice_id),
            apartment_id: Set(link.apartment_id),
            payment_status: Set(status_to_entity(link.payment_status)),
            fee_amounts: Set(encode_amounts(&link.fee_amounts)?),
            created_at: Set(link.created_at),
            updated_at: Set(Utc::now()),
        };
        let result = model.update(self.conn.as_ref()).await.map_err(db_err)?;
        link_to_domain(result)
    }

    async fn delete_for_invoice(&self, invoice_id: &str) -> DomainResult<()> {
        invoice_apartment::Entity::delete_many()
            .filter(invoice_apartment::Column::InvoiceId.eq(invoice_id))
            .exec(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn delete_for_apartment(&self, apartment_id: i64) -> DomainResult<()> {
        invoice_apartment::Entity::delete_many()
            .filter(invoice_apartment::Column::ApartmentId.eq(apartment_id))
            .exec(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
