use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::services::{FeeUpdate, NewFeeRequest};
use crate::domain::{Fee, FeeFilter, FeeType};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeeDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub fee_type: FeeType,
    /// Always 0 for `ContributionFund`
    pub unit_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Fee> for FeeDto {
    fn from(f: Fee) -> Self {
        Self {
            id: f.id,
            name: f.name,
            description: f.description,
            fee_type: f.fee_type,
            unit_price: f.unit_price,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeeRequest {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,
    #[serde(alias = "feeTypeEnum")]
    pub fee_type: FeeType,
    /// Required and positive unless `feeType` is `ContributionFund`
    pub unit_price: Option<Decimal>,
}

impl From<CreateFeeRequest> for NewFeeRequest {
    fn from(r: CreateFeeRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            fee_type: r.fee_type,
            unit_price: r.unit_price,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeeRequest {
    #[validate(length(min = 1, max = 100, message = "name must not be blank"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,
    #[serde(alias = "feeTypeEnum")]
    pub fee_type: Option<FeeType>,
    pub unit_price: Option<Decimal>,
}

impl From<UpdateFeeRequest> for FeeUpdate {
    fn from(r: UpdateFeeRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            fee_type: r.fee_type,
            unit_price: r.unit_price,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListFeesParams {
    /// Substring of the name
    pub name: Option<String>,
    pub fee_type: Option<FeeType>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

impl ListFeesParams {
    pub fn filter(&self) -> FeeFilter {
        FeeFilter {
            name: self.name.clone(),
            fee_type: self.fee_type,
        }
    }
}
