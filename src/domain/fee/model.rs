//! Fee domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How a fee is charged to an apartment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum FeeType {
    /// unit price × apartment area
    DepartmentFee,
    /// configured rate × number of vehicles per category
    VehicleFee,
    /// amount assigned per apartment by hand
    ContributionFund,
}

impl FeeType {
    /// Whether this fee type is priced from its unit price.
    pub fn requires_unit_price(&self) -> bool {
        !matches!(self, Self::ContributionFund)
    }
}

impl std::fmt::Display for FeeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DepartmentFee => write!(f, "DepartmentFee"),
            Self::VehicleFee => write!(f, "VehicleFee"),
            Self::ContributionFund => write!(f, "ContributionFund"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fee {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub fee_type: FeeType,
    pub unit_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFee {
    pub name: String,
    pub description: Option<String>,
    pub fee_type: FeeType,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct FeeFilter {
    pub name: Option<String>,
    pub fee_type: Option<FeeType>,
}

impl FeeFilter {
    pub fn matches(&self, fee: &Fee) -> bool {
        if let Some(name) = &self.name {
            if !fee.name.contains(name.as_str()) {
                return false;
            }
        }
        self.fee_type.map_or(true, |t| fee.fee_type == t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contribution_fund_has_no_unit_price() {
        assert!(FeeType::DepartmentFee.requires_unit_price());
        assert!(FeeType::VehicleFee.requires_unit_price());
        assert!(!FeeType::ContributionFund.requires_unit_price());
    }
}
