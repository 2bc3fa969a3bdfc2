//! Fee entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum FeeType {
    #[sea_orm(string_value = "DepartmentFee")]
    DepartmentFee,
    #[sea_orm(string_value = "VehicleFee")]
    VehicleFee,
    #[sea_orm(string_value = "ContributionFund")]
    ContributionFund,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub fee_type: FeeType,
    /// 0 for contribution funds
    pub unit_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fee_invoice::Entity")]
    FeeInvoices,
}

impl Related<super::fee_invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeInvoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
