//! Fee catalogue

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use crate::domain::fee::{Fee, FeeFilter, FeeType, NewFee};
use crate::domain::{DomainResult, Store};
use crate::shared::{require_positive, Page, PageRequest};

use super::lookups::require_fee;

const UNIT_PRICE_REQUIRED: &str =
    "Unit price must be provided and greater than 0 for DepartmentFee or VehicleFee";

#[derive(Debug, Clone)]
pub struct NewFeeRequest {
    pub name: String,
    pub description: Option<String>,
    pub fee_type: FeeType,
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Clone, Default)]
pub struct FeeUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub fee_type: Option<FeeType>,
    pub unit_price: Option<Decimal>,
}

/// Contribution funds are priced per apartment, so their unit price is 0.
fn effective_unit_price(fee_type: FeeType, unit_price: Option<Decimal>) -> DomainResult<Decimal> {
    if fee_type.requires_unit_price() {
        require_positive(unit_price, UNIT_PRICE_REQUIRED)
    } else {
        Ok(Decimal::ZERO)
    }
}

pub struct FeeService {
    store: Arc<dyn Store>,
}

impl FeeService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self, filter: &FeeFilter, page: PageRequest) -> DomainResult<Page<Fee>> {
        self.store.fees().list(filter, page).await
    }

    pub async fn get(&self, id: i64) -> DomainResult<Fee> {
        require_fee(&*self.store, id).await
    }

    pub async fn create(&self, req: NewFeeRequest) -> DomainResult<Fee> {
        let unit_price = effective_unit_price(req.fee_type, req.unit_price)?;

        let uow = self.store.begin().await?;
        let fee = uow
            .fees()
            .insert(NewFee {
                name: req.name,
                description: req.description,
                fee_type: req.fee_type,
                unit_price,
            })
            .await?;
        uow.commit().await?;
        info!(fee_id = fee.id, fee_type = %fee.fee_type, "Fee created");
        Ok(fee)
    }

    pub async fn update(&self, id: i64, changes: FeeUpdate) -> DomainResult<Fee> {
        let uow = self.store.begin().await?;
        let mut fee = require_fee(&*uow, id).await?;

        if let Some(name) = changes.name {
            fee.name = name;
        }
        if changes.description.is_some() {
            fee.description = changes.description;
        }
        let fee_type = changes.fee_type.unwrap_or(fee.fee_type);
        let unit_price = changes.unit_price.or(Some(fee.unit_price));
        fee.unit_price = effective_unit_price(fee_type, unit_price)?;
        fee.fee_type = fee_type;

        let fee = uow.fees().update(fee).await?;
        uow.commit().await?;
        info!(fee_id = id, "Fee updated");
        Ok(fee)
    }

    /// Delete a fee together with its invoice associations.
    pub async fn delete(&self, id: i64) -> DomainResult<()> {
        let uow = self.store.begin().await?;
        require_fee(&*uow, id).await?;
        uow.invoices().remove_fee(id).await?;
        uow.fees().delete(id).await?;
        uow.commit().await?;
        info!(fee_id = id, "Fee deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::store;
    use crate::domain::DomainError;
    use rust_decimal_macros::dec;

    fn request(fee_type: FeeType, unit_price: Option<Decimal>) -> NewFeeRequest {
        NewFeeRequest {
            name: "Management".into(),
            description: None,
            fee_type,
            unit_price,
        }
    }

    #[tokio::test]
    async fn priced_fees_need_positive_unit_price() {
        let svc = FeeService::new(store());
        for fee_type in [FeeType::DepartmentFee, FeeType::VehicleFee] {
            for price in [None, Some(Decimal::ZERO), Some(dec!(-5))] {
                let err = svc.create(request(fee_type, price)).await.unwrap_err();
                assert_eq!(err.to_string(), UNIT_PRICE_REQUIRED);
            }
        }
        let fee = svc
            .create(request(FeeType::DepartmentFee, Some(dec!(1000))))
            .await
            .unwrap();
        assert_eq!(fee.unit_price, dec!(1000));
    }

    #[tokio::test]
    async fn contribution_fund_price_is_forced_to_zero() {
        let svc = FeeService::new(store());
        let fee = svc
            .create(request(FeeType::ContributionFund, Some(dec!(500))))
            .await
            .unwrap();
        assert_eq!(fee.unit_price, Decimal::ZERO);
    }

    #[tokio::test]
    async fn update_revalidates_price_against_new_type() {
        let svc = FeeService::new(store());
        let fund = svc
            .create(request(FeeType::ContributionFund, None))
            .await
            .unwrap();

        let err = svc
            .update(
                fund.id,
                FeeUpdate {
                    fee_type: Some(FeeType::DepartmentFee),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let priced = svc
            .update(
                fund.id,
                FeeUpdate {
                    fee_type: Some(FeeType::DepartmentFee),
                    unit_price: Some(dec!(1200)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(priced.unit_price, dec!(1200));
    }

    #[tokio::test]
    async fn delete_missing_fee_is_not_found() {
        let svc = FeeService::new(store());
        let err = svc.delete(42).await.unwrap_err();
        assert_eq!(err.to_string(), "Fee with id = 42 is not found");
    }
}
