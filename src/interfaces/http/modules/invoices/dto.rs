use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::services::{
    ApartmentInvoice, FeeCharge, InvoiceTotal, InvoiceUpdate, InvoiceWithFees, NewInvoice,
};
use crate::domain::{FeeAmounts, FeeType, InvoiceFilter, PaymentStatus};
use crate::interfaces::http::modules::fees::FeeDto;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub fees: Vec<FeeDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InvoiceWithFees> for InvoiceDto {
    fn from(i: InvoiceWithFees) -> Self {
        Self {
            id: i.invoice.id,
            name: i.invoice.name,
            description: i.invoice.description,
            is_active: i.invoice.is_active,
            fees: i.fees.into_iter().map(FeeDto::from).collect(),
            created_at: i.invoice.created_at,
            updated_at: i.invoice.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    /// Caller-chosen code such as `INV001`
    #[validate(length(min = 1, max = 50, message = "id must be 1-50 characters"))]
    pub id: String,
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub fee_ids: Vec<i64>,
    /// Link a single apartment instead of every apartment
    pub apartment_id: Option<i64>,
}

impl From<CreateInvoiceRequest> for NewInvoice {
    fn from(r: CreateInvoiceRequest) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            fee_ids: r.fee_ids,
            apartment_id: r.apartment_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoiceRequest {
    #[validate(length(min = 1, max = 100, message = "name must not be blank"))]
    pub name: Option<String>,
    pub description: Option<String>,
    /// Replaces the whole fee set
    pub fee_ids: Option<Vec<i64>>,
}

impl From<UpdateInvoiceRequest> for InvoiceUpdate {
    fn from(r: UpdateInvoiceRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            fee_ids: r.fee_ids,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListInvoicesParams {
    /// Substring of the name
    pub name: Option<String>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

impl ListInvoicesParams {
    pub fn filter(&self) -> InvoiceFilter {
        InvoiceFilter {
            name: self.name.clone(),
            is_active: Some(true),
        }
    }
}

/// Amount one apartment owes for one fee.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeeChargeDto {
    pub fee_id: i64,
    pub name: String,
    pub fee_type: FeeType,
    pub unit_price: Decimal,
    pub amount: Decimal,
}

impl From<FeeCharge> for FeeChargeDto {
    fn from(c: FeeCharge) -> Self {
        Self {
            fee_id: c.fee.id,
            name: c.fee.name,
            fee_type: c.fee.fee_type,
            unit_price: c.fee.unit_price,
            amount: c.amount,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApartmentInvoiceDto {
    /// Id used to mark this apartment's invoice as paid
    pub invoice_apartment_id: i64,
    pub apartment_id: i64,
    pub invoice_id: String,
    pub name: String,
    pub description: Option<String>,
    pub payment_status: PaymentStatus,
    pub fees: Vec<FeeChargeDto>,
    pub total_amount: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl From<ApartmentInvoice> for ApartmentInvoiceDto {
    fn from(a: ApartmentInvoice) -> Self {
        Self {
            invoice_apartment_id: a.link.id,
            apartment_id: a.link.apartment_id,
            invoice_id: a.invoice.id,
            name: a.invoice.name,
            description: a.invoice.description,
            payment_status: a.link.payment_status,
            fees: a.charges.into_iter().map(FeeChargeDto::from).collect(),
            total_amount: a.total,
            updated_at: a.link.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotalDto {
    pub invoice_id: String,
    pub name: String,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub contribution_amount: Decimal,
}

impl From<InvoiceTotal> for InvoiceTotalDto {
    fn from(t: InvoiceTotal) -> Self {
        Self {
            invoice_id: t.invoice.id,
            name: t.invoice.name,
            total_amount: t.total_amount,
            paid_amount: t.paid_amount,
            contribution_amount: t.contribution_amount,
        }
    }
}

/// Contribution amounts keyed by fee id, e.g. `{ "amounts": { "3": "150000" } }`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ContributionRequest {
    #[schema(value_type = Object)]
    pub amounts: FeeAmounts,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn contribution_keys_are_fee_ids() {
        let req: ContributionRequest = serde_json::from_value(serde_json::json!({
            "amounts": { "3": "150000", "4": 2500 }
        }))
        .unwrap();
        assert_eq!(req.amounts.get(&3), Some(&dec!(150000)));
        assert_eq!(req.amounts.get(&4), Some(&dec!(2500)));
    }
}
