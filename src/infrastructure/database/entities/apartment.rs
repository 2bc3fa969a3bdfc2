//! Apartment entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ApartmentStatus {
    #[sea_orm(string_value = "Business")]
    Business,
    #[sea_orm(string_value = "Residential")]
    Residential,
    #[sea_orm(string_value = "Vacant")]
    Vacant,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "apartments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub address_number: i64,
    pub area: Decimal,
    pub status: ApartmentStatus,
    /// Owning resident; unique so a resident owns at most one apartment
    #[sea_orm(unique)]
    pub owner_id: Option<i64>,
    pub owner_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::resident::Entity")]
    Residents,
    #[sea_orm(has_many = "super::vehicle::Entity")]
    Vehicles,
}

impl Related<super::resident::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Residents.def()
    }
}

impl Related<super::vehicle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
