//! Invoice entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fee_invoice::Entity")]
    FeeInvoices,
    #[sea_orm(has_many = "super::invoice_apartment::Entity")]
    InvoiceApartments,
}

impl Related<super::fee_invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeInvoices.def()
    }
}

impl Related<super::invoice_apartment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceApartments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
