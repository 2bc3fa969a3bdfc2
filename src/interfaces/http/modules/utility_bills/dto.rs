use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{PaymentStatus, UtilityBill, UtilityBillFilter};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UtilityBillDto {
    pub id: i64,
    pub apartment_id: i64,
    /// Billing period label
    pub name: String,
    pub electricity: Decimal,
    pub water: Decimal,
    pub internet: Decimal,
    pub total: Decimal,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl From<UtilityBill> for UtilityBillDto {
    fn from(b: UtilityBill) -> Self {
        Self {
            total: b.total(),
            id: b.id,
            apartment_id: b.apartment_id,
            name: b.name,
            electricity: b.electricity,
            water: b.water,
            internet: b.internet,
            payment_status: b.payment_status,
            created_at: b.created_at,
        }
    }
}

/// Multipart form of the import endpoint.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct UtilityBillUpload {
    /// Billing period label stored on every imported bill
    pub name: String,
    /// CSV with columns apartment id, electricity, water, internet
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListUtilityBillsParams {
    pub apartment_id: Option<i64>,
    /// Substring of the billing period label
    pub name: Option<String>,
    pub payment_status: Option<PaymentStatus>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

impl ListUtilityBillsParams {
    pub fn filter(&self) -> UtilityBillFilter {
        UtilityBillFilter {
            apartment_id: self.apartment_id,
            name: self.name.clone(),
            payment_status: self.payment_status,
        }
    }
}
