//! Utility bills: bulk import per billing period and payment tracking

use std::collections::BTreeSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::domain::invoice::PaymentStatus;
use crate::domain::utility_bill::{NewUtilityBill, UtilityBill, UtilityBillFilter};
use crate::domain::{DomainError, DomainResult, Store};
use crate::shared::{Page, PageRequest};

use super::lookups::require_apartment;

/// One parsed import row. `line` is the 1-based line in the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct UtilityBillRow {
    pub line: usize,
    pub apartment_id: i64,
    pub electricity: Decimal,
    pub water: Decimal,
    pub internet: Decimal,
}

pub struct UtilityBillService {
    store: Arc<dyn Store>,
}

impl UtilityBillService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(
        &self,
        filter: &UtilityBillFilter,
        page: PageRequest,
    ) -> DomainResult<Page<UtilityBill>> {
        self.store.utility_bills().list(filter, page).await
    }

    pub async fn get(&self, id: i64) -> DomainResult<UtilityBill> {
        self.store
            .utility_bills()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("UtilityBill", "id", id))
    }

    pub async fn for_apartment(&self, apartment_id: i64) -> DomainResult<Vec<UtilityBill>> {
        require_apartment(&*self.store, apartment_id).await?;
        self.store.utility_bills().find_by_apartment(apartment_id).await
    }

    /// Store one bill per row under the period `name`. Nothing is stored
    /// unless every row is valid.
    pub async fn import(
        &self,
        name: &str,
        rows: Vec<UtilityBillRow>,
    ) -> DomainResult<Vec<UtilityBill>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("Bill name is required".into()));
        }
        if rows.is_empty() {
            return Err(DomainError::Validation(
                "The uploaded file contains no bill rows".into(),
            ));
        }

        let uow = self.store.begin().await?;
        let mut known = BTreeSet::new();
        let mut bills = Vec::with_capacity(rows.len());
        for row in rows {
            if [row.electricity, row.water, row.internet]
                .iter()
                .any(|v| *v < Decimal::ZERO)
            {
                return Err(DomainError::Validation(format!(
                    "Row {}: amounts must not be negative",
                    row.line
                )));
            }
            if !known.contains(&row.apartment_id) {
                if uow.apartments().find_by_id(row.apartment_id).await?.is_none() {
                    warn!(
                        line = row.line,
                        apartment_id = row.apartment_id,
                        "Import row names an unknown apartment"
                    );
                    return Err(DomainError::not_found("Apartment", "id", row.apartment_id));
                }
                known.insert(row.apartment_id);
            }
            bills.push(NewUtilityBill {
                apartment_id: row.apartment_id,
                name: name.to_string(),
                electricity: row.electricity,
                water: row.water,
                internet: row.internet,
            });
        }

        let stored = uow.utility_bills().insert_many(bills).await?;
        uow.commit().await?;
        info!(name, bills = stored.len(), "Utility bills imported");
        Ok(stored)
    }

    pub async fn mark_paid(&self, id: i64) -> DomainResult<UtilityBill> {
        let mut bill = self.get(id).await?;
        if bill.payment_status == PaymentStatus::Paid {
            return Ok(bill);
        }
        bill.payment_status = PaymentStatus::Paid;
        let bill = self.store.utility_bills().update(bill).await?;
        info!(bill_id = id, "Utility bill marked as paid");
        Ok(bill)
    }

    pub async fn delete(&self, id: i64) -> DomainResult<()> {
        self.get(id).await?;
        self.store.utility_bills().delete(id).await?;
        info!(bill_id = id, "Utility bill deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::*;
    use crate::domain::RepositoryProvider;
    use rust_decimal_macros::dec;

    fn row(line: usize, apartment_id: i64) -> UtilityBillRow {
        UtilityBillRow {
            line,
            apartment_id,
            electricity: dec!(350000),
            water: dec!(120000),
            internet: dec!(200000),
        }
    }

    #[tokio::test]
    async fn import_stores_unpaid_bills() {
        let store = store();
        seed_apartment(&store, 101, dec!(50), None).await;
        seed_apartment(&store, 102, dec!(60), None).await;
        let service = UtilityBillService::new(store.clone());

        let bills = service
            .import("2024-05", vec![row(2, 101), row(3, 102)])
            .await
            .unwrap();
        assert_eq!(bills.len(), 2);
        assert!(bills.iter().all(|b| b.payment_status == PaymentStatus::Unpaid));
        assert_eq!(bills[0].total(), dec!(670000));

        let for_101 = service.for_apartment(101).await.unwrap();
        assert_eq!(for_101.len(), 1);
        assert_eq!(for_101[0].name, "2024-05");
    }

    #[tokio::test]
    async fn import_is_all_or_nothing() {
        let store = store();
        seed_apartment(&store, 101, dec!(50), None).await;
        let service = UtilityBillService::new(store.clone());

        let err = service
            .import("2024-05", vec![row(2, 101), row(3, 999)])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Apartment", .. }));
        assert_eq!(err.to_string(), "Apartment with id = 999 is not found");
        assert!(store.utility_bills().find_by_apartment(101).await.unwrap().is_empty());

        let err = service.import("  ", vec![row(2, 101)]).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn mark_paid_and_delete() {
        let store = store();
        seed_apartment(&store, 101, dec!(50), None).await;
        let service = UtilityBillService::new(store.clone());
        let bills = service.import("2024-06", vec![row(2, 101)]).await.unwrap();
        let id = bills[0].id;

        let paid = service.mark_paid(id).await.unwrap();
        assert_eq!(paid.payment_status, PaymentStatus::Paid);

        service.delete(id).await.unwrap();
        assert!(matches!(
            service.get(id).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }
}
