//! Invoices: fee sets, apartment links, computed charges and totals

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::apartment::Apartment;
use crate::domain::fee::{Fee, FeeType};
use crate::domain::invoice::{
    fee_amount, ApartmentUsage, FeeAmounts, Invoice, InvoiceApartment, InvoiceFilter,
    NewInvoiceApartment, VehicleRates,
};
use crate::domain::vehicle::VehicleCategory;
use crate::domain::{DomainError, DomainResult, RepositoryProvider, Store};
use crate::shared::{Page, PageRequest};

use super::lookups::{require_apartment, require_invoice};

#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub fee_ids: Vec<i64>,
    /// Link only this apartment; every apartment when `None`.
    pub apartment_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct InvoiceUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Replaces the whole fee set when present.
    pub fee_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone)]
pub struct InvoiceWithFees {
    pub invoice: Invoice,
    pub fees: Vec<Fee>,
}

#[derive(Debug, Clone)]
pub struct FeeCharge {
    pub fee: Fee,
    pub amount: Decimal,
}

/// One invoice as seen by one apartment.
#[derive(Debug, Clone)]
pub struct ApartmentInvoice {
    pub link: InvoiceApartment,
    pub invoice: Invoice,
    pub charges: Vec<FeeCharge>,
    pub total: Decimal,
}

/// Amounts of one invoice summed over its apartments.
#[derive(Debug, Clone)]
pub struct InvoiceTotal {
    pub invoice: Invoice,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub contribution_amount: Decimal,
}

pub struct InvoiceService {
    store: Arc<dyn Store>,
    rates: VehicleRates,
}

// ── Helpers ─────────────────────────────────────────────────────

async fn require_fees<R>(repos: &R, ids: &[i64]) -> DomainResult<Vec<Fee>>
where
    R: RepositoryProvider + ?Sized,
{
    let unique: Vec<i64> = ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
    let fees = repos.fees().find_by_ids(&unique).await?;
    let missing: Vec<i64> = unique
        .iter()
        .copied()
        .filter(|id| !fees.iter().any(|f| f.id == *id))
        .collect();
    if !missing.is_empty() {
        return Err(DomainError::not_found("Fee", "id", format!("{:?}", missing)));
    }
    Ok(fees)
}

async fn invoice_fees<R>(repos: &R, invoice_id: &str) -> DomainResult<Vec<Fee>>
where
    R: RepositoryProvider + ?Sized,
{
    let ids = repos.invoices().fee_ids(invoice_id).await?;
    repos.fees().find_by_ids(&ids).await
}

async fn with_fees<R>(repos: &R, invoice: Invoice) -> DomainResult<InvoiceWithFees>
where
    R: RepositoryProvider + ?Sized,
{
    let fees = invoice_fees(repos, &invoice.id).await?;
    Ok(InvoiceWithFees { invoice, fees })
}

async fn usage_of<R>(repos: &R, apartment: &Apartment) -> DomainResult<ApartmentUsage>
where
    R: RepositoryProvider + ?Sized,
{
    let vehicles = repos
        .vehicles()
        .find_by_apartment(apartment.address_number)
        .await?;
    let count = |category: VehicleCategory| vehicles.iter().filter(|v| v.category == category).count() as u32;
    Ok(ApartmentUsage {
        area: apartment.area,
        cars: count(VehicleCategory::Car),
        motorbikes: count(VehicleCategory::Motorbike),
    })
}

fn charges_for(
    fees: &[Fee],
    usage: &ApartmentUsage,
    amounts: &FeeAmounts,
    rates: &VehicleRates,
) -> Vec<FeeCharge> {
    fees.iter()
        .map(|fee| FeeCharge {
            fee: fee.clone(),
            amount: fee_amount(fee, usage, amounts, rates),
        })
        .collect()
}

impl InvoiceService {
    pub fn new(store: Arc<dyn Store>, rates: VehicleRates) -> Self {
        Self { store, rates }
    }

    async fn apartment_invoice<R>(
        &self,
        repos: &R,
        link: InvoiceApartment,
        invoice: Invoice,
        usage: &ApartmentUsage,
    ) -> DomainResult<ApartmentInvoice>
    where
        R: RepositoryProvider + ?Sized,
    {
        let fees = invoice_fees(repos, &invoice.id).await?;
        let charges = charges_for(&fees, usage, &link.fee_amounts, &self.rates);
        let total = charges.iter().map(|c| c.amount).sum();
        Ok(ApartmentInvoice {
            link,
            invoice,
            charges,
            total,
        })
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Active invoices with their fees.
    pub async fn list(
        &self,
        filter: &InvoiceFilter,
        page: PageRequest,
    ) -> DomainResult<Page<InvoiceWithFees>> {
        let filter = InvoiceFilter {
            is_active: Some(true),
            ..filter.clone()
        };
        let page = self.store.invoices().list(&filter, page).await?;
        let mut items = Vec::with_capacity(page.items.len());
        for invoice in &page.items {
            items.push(with_fees(&*self.store, invoice.clone()).await?);
        }
        Ok(Page {
            items,
            total_elements: page.total_elements,
            page: page.page,
            size: page.size,
            total_pages: page.total_pages,
        })
    }

    pub async fn get(&self, id: &str) -> DomainResult<InvoiceWithFees> {
        let invoice = require_invoice(&*self.store, id).await?;
        with_fees(&*self.store, invoice).await
    }

    /// Active invoices linked to an apartment, with the amount of each fee.
    pub async fn for_apartment(&self, apartment_id: i64) -> DomainResult<Vec<ApartmentInvoice>> {
        let repos = &*self.store;
        let apartment = require_apartment(repos, apartment_id).await?;
        let usage = usage_of(repos, &apartment).await?;

        let mut result = Vec::new();
        for link in repos.invoice_apartments().for_apartment(apartment_id).await? {
            let Some(invoice) = repos.invoices().find_by_id(&link.invoice_id).await? else {
                continue;
            };
            if !invoice.is_active {
                continue;
            }
            result.push(self.apartment_invoice(repos, link, invoice, &usage).await?);
        }
        Ok(result)
    }

    /// Per active invoice: everything charged, what has been paid, and the
    /// share coming from contribution funds.
    pub async fn totals(&self) -> DomainResult<Vec<InvoiceTotal>> {
        let repos = &*self.store;
        let mut usages: HashMap<i64, ApartmentUsage> = HashMap::new();
        let mut totals = Vec::new();

        for invoice in repos.invoices().find_active().await? {
            let fees = invoice_fees(repos, &invoice.id).await?;
            let mut total = InvoiceTotal {
                invoice,
                total_amount: Decimal::ZERO,
                paid_amount: Decimal::ZERO,
                contribution_amount: Decimal::ZERO,
            };

            for link in repos.invoice_apartments().for_invoice(&total.invoice.id).await? {
                let usage = match usages.get(&link.apartment_id) {
                    Some(usage) => *usage,
                    None => {
                        let Some(apartment) =
                            repos.apartments().find_by_id(link.apartment_id).await?
                        else {
                            continue;
                        };
                        let usage = usage_of(repos, &apartment).await?;
                        usages.insert(link.apartment_id, usage);
                        usage
                    }
                };

                for charge in charges_for(&fees, &usage, &link.fee_amounts, &self.rates) {
                    total.total_amount += charge.amount;
                    if link.is_paid() {
                        total.paid_amount += charge.amount;
                    }
                    if charge.fee.fee_type == FeeType::ContributionFund {
                        total.contribution_amount += charge.amount;
                    }
                }
            }
            totals.push(total);
        }
        Ok(totals)
    }

    // ── Mutations ───────────────────────────────────────────────

    /// Create an invoice and link it to one or all apartments. An inactive
    /// invoice with the same id is reactivated with the new values.
    ///
    /// No route deactivates an invoice (delete removes the row), so inactive
    /// rows only come from data written before deletes became hard deletes.
    pub async fn create(&self, req: NewInvoice) -> DomainResult<InvoiceWithFees> {
        let id = req.id.trim().to_string();
        if id.is_empty() {
            return Err(DomainError::Validation("Invoice id is required".into()));
        }

        let uow = self.store.begin().await?;
        let fees = require_fees(&*uow, &req.fee_ids).await?;
        let now = Utc::now();

        let invoice = match uow.invoices().find_by_id(&id).await? {
            Some(existing) if existing.is_active => {
                return Err(DomainError::Conflict(format!(
                    "Invoice with id = {} is already active",
                    id
                )));
            }
            Some(mut inactive) => {
                inactive.name = req.name;
                inactive.description = req.description;
                inactive.is_active = true;
                uow.invoice_apartments().delete_for_invoice(&id).await?;
                info!(invoice_id = %id, "Reactivating invoice");
                uow.invoices().update(inactive).await?
            }
            None => {
                uow.invoices()
                    .insert(Invoice {
                        id: id.clone(),
                        name: req.name,
                        description: req.description,
                        is_active: true,
                        created_at: now,
                        updated_at: now,
                    })
                    .await?
            }
        };

        let fee_ids: Vec<i64> = fees.iter().map(|f| f.id).collect();
        uow.invoices().replace_fees(&id, &fee_ids).await?;

        let apartments = match req.apartment_id {
            Some(apartment_id) => vec![require_apartment(&*uow, apartment_id).await?],
            None => uow.apartments().find_all().await?,
        };
        for apartment in &apartments {
            uow.invoice_apartments()
                .insert(NewInvoiceApartment {
                    invoice_id: id.clone(),
                    apartment_id: apartment.address_number,
                })
                .await?;
        }

        uow.commit().await?;
        info!(
            invoice_id = %id,
            fees = fees.len(),
            apartments = apartments.len(),
            "Invoice created"
        );
        Ok(InvoiceWithFees { invoice, fees })
    }

    pub async fn update(&self, id: &str, changes: InvoiceUpdate) -> DomainResult<InvoiceWithFees> {
        let uow = self.store.begin().await?;
        let mut invoice = require_invoice(&*uow, id).await?;

        if let Some(name) = changes.name {
            invoice.name = name;
        }
        if changes.description.is_some() {
            invoice.description = changes.description;
        }
        if let Some(fee_ids) = changes.fee_ids {
            let fees = require_fees(&*uow, &fee_ids).await?;
            let ids: Vec<i64> = fees.iter().map(|f| f.id).collect();
            uow.invoices().replace_fees(id, &ids).await?;
        }

        let invoice = uow.invoices().update(invoice).await?;
        let result = with_fees(&*uow, invoice).await?;
        uow.commit().await?;
        info!(invoice_id = %id, "Invoice updated");
        Ok(result)
    }

    /// Remove an invoice, its fee set and its apartment links.
    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        let uow = self.store.begin().await?;
        if uow.invoices().find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("Invoice", "id", id));
        }
        uow.invoice_apartments().delete_for_invoice(id).await?;
        uow.invoices().delete(id).await?;
        uow.commit().await?;
        info!(invoice_id = %id, "Invoice deleted");
        Ok(())
    }

    /// Set the amounts an apartment owes for the contribution funds of an
    /// invoice. Amounts are merged into the ones already stored.
    pub async fn update_contributions(
        &self,
        apartment_id: i64,
        invoice_id: &str,
        amounts: FeeAmounts,
    ) -> DomainResult<ApartmentInvoice> {
        if amounts.is_empty() {
            return Err(DomainError::Validation(
                "At least one contribution amount is required".into(),
            ));
        }

        let uow = self.store.begin().await?;
        let invoice = require_invoice(&*uow, invoice_id).await?;
        let apartment = require_apartment(&*uow, apartment_id).await?;
        let Some(mut link) = uow.invoice_apartments().find(invoice_id, apartment_id).await? else {
            return Err(DomainError::NotFound {
                entity: "InvoiceApartment",
                field: "invoice/apartment",
                value: format!("{}/{}", invoice_id, apartment_id),
            });
        };

        let fees = invoice_fees(&*uow, invoice_id).await?;
        for (fee_id, amount) in &amounts {
            let Some(fee) = fees.iter().find(|f| f.id == *fee_id) else {
                return Err(DomainError::Validation(format!(
                    "Fee {} is not part of invoice {}",
                    fee_id, invoice_id
                )));
            };
            if fee.fee_type != FeeType::ContributionFund {
                return Err(DomainError::Validation(format!(
                    "Fee {} is not a contribution fund",
                    fee_id
                )));
            }
            if *amount < Decimal::ZERO {
                return Err(DomainError::Validation(format!(
                    "Contribution amount for fee {} must not be negative",
                    fee_id
                )));
            }
        }

        link.set_amounts(&amounts);
        let link = uow.invoice_apartments().update(link).await?;
        let usage = usage_of(&*uow, &apartment).await?;
        let result = self.apartment_invoice(&*uow, link, invoice, &usage).await?;
        uow.commit().await?;
        info!(invoice_id = %invoice_id, apartment_id, "Contribution amounts updated");
        Ok(result)
    }

    /// Mark one apartment's invoice as paid.
    pub async fn mark_paid(&self, invoice_apartment_id: i64) -> DomainResult<ApartmentInvoice> {
        let uow = self.store.begin().await?;
        let Some(mut link) = uow
            .invoice_apartments()
            .find_by_id(invoice_apartment_id)
            .await?
        else {
            return Err(DomainError::not_found(
                "InvoiceApartment",
                "id",
                invoice_apartment_id,
            ));
        };
        let invoice = require_invoice(&*uow, &link.invoice_id).await?;
        let apartment = require_apartment(&*uow, link.apartment_id).await?;

        link.mark_paid();
        let link = uow.invoice_apartments().update(link).await?;
        let usage = usage_of(&*uow, &apartment).await?;
        let result = self.apartment_invoice(&*uow, link, invoice, &usage).await?;
        uow.commit().await?;
        info!(invoice_apartment_id, "Invoice marked as paid");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::fee::{FeeService, NewFeeRequest};
    use crate::application::services::test_support::*;
    use rust_decimal_macros::dec;

    struct Fixture {
        store: Arc<crate::infrastructure::InMemoryStore>,
        invoices: InvoiceService,
        department: Fee,
        vehicle: Fee,
        fund: Fee,
    }

    async fn fixture() -> Fixture {
        let store = store();
        seed_apartment(&store, 101, dec!(50), Some(1)).await;
        seed_apartment(&store, 102, dec!(80), Some(2)).await;
        seed_vehicle(&store, "29A-001", VehicleCategory::Car, 101).await;
        seed_vehicle(&store, "29B-002", VehicleCategory::Motorbike, 101).await;
        seed_vehicle(&store, "29B-003", VehicleCategory::Motorbike, 101).await;

        let fees = FeeService::new(store.clone());
        let create = |name: &str, fee_type: FeeType, unit_price: Option<Decimal>| NewFeeRequest {
            name: name.to_string(),
            description: None,
            fee_type,
            unit_price,
        };
        let department = fees
            .create(create("Management", FeeType::DepartmentFee, Some(dec!(1000))))
            .await
            .unwrap();
        let vehicle = fees
            .create(create("Parking", FeeType::VehicleFee, Some(dec!(1))))
            .await
            .unwrap();
        let fund = fees
            .create(create("Charity", FeeType::ContributionFund, None))
            .await
            .unwrap();

        Fixture {
            invoices: InvoiceService::new(store.clone(), VehicleRates::default()),
            store,
            department,
            vehicle,
            fund,
        }
    }

    fn new_invoice(f: &Fixture, apartment_id: Option<i64>) -> NewInvoice {
        NewInvoice {
            id: "INV001".into(),
            name: "May 2024".into(),
            description: None,
            fee_ids: vec![f.department.id, f.vehicle.id, f.fund.id],
            apartment_id,
        }
    }

    #[tokio::test]
    async fn create_links_every_apartment_by_default() {
        let f = fixture().await;
        let created = f.invoices.create(new_invoice(&f, None)).await.unwrap();
        assert_eq!(created.fees.len(), 3);

        let links = f.store.invoice_apartments().for_invoice("INV001").await.unwrap();
        assert_eq!(links.len(), 2);

        let err = f.invoices.create(new_invoice(&f, None)).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn create_rejects_unknown_fees() {
        let f = fixture().await;
        let mut req = new_invoice(&f, None);
        req.fee_ids.push(99);
        let err = f.invoices.create(req).await.unwrap_err();
        assert_eq!(err.to_string(), "Fee with id = [99] is not found");
        assert!(f.store.invoices().find_by_id("INV001").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn apartment_view_computes_each_fee() {
        let f = fixture().await;
        f.invoices.create(new_invoice(&f, Some(101))).await.unwrap();
        f.invoices
            .update_contributions(101, "INV001", FeeAmounts::from([(f.fund.id, dec!(200000))]))
            .await
            .unwrap();

        let views = f.invoices.for_apartment(101).await.unwrap();
        assert_eq!(views.len(), 1);
        let amount = |fee_id: i64| {
            views[0]
                .charges
                .iter()
                .find(|c| c.fee.id == fee_id)
                .map(|c| c.amount)
                .unwrap()
        };
        assert_eq!(amount(f.department.id), dec!(50000));
        assert_eq!(amount(f.vehicle.id), dec!(1340000));
        assert_eq!(amount(f.fund.id), dec!(200000));
        assert_eq!(views[0].total, dec!(1590000));

        assert!(f.invoices.for_apartment(102).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn contributions_only_accept_fund_fees_of_the_invoice() {
        let f = fixture().await;
        f.invoices.create(new_invoice(&f, Some(101))).await.unwrap();

        let err = f
            .invoices
            .update_contributions(101, "INV001", FeeAmounts::from([(f.department.id, dec!(1))]))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = f
            .invoices
            .update_contributions(101, "INV001", FeeAmounts::from([(f.fund.id, dec!(-1))]))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = f
            .invoices
            .update_contributions(102, "INV001", FeeAmounts::from([(f.fund.id, dec!(1))]))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn totals_split_paid_and_contribution_amounts() {
        let f = fixture().await;
        f.invoices.create(new_invoice(&f, None)).await.unwrap();
        f.invoices
            .update_contributions(102, "INV001", FeeAmounts::from([(f.fund.id, dec!(30000))]))
            .await
            .unwrap();

        let link = f
            .store
            .invoice_apartments()
            .find("INV001", 101)
            .await
            .unwrap()
            .unwrap();
        let paid = f.invoices.mark_paid(link.id).await.unwrap();
        assert!(paid.link.is_paid());

        let totals = f.invoices.totals().await.unwrap();
        assert_eq!(totals.len(), 1);
        // 101: 50000 + 1340000; 102: 80000 + 0 vehicles + 30000 fund
        assert_eq!(totals[0].total_amount, dec!(1500000));
        assert_eq!(totals[0].paid_amount, dec!(1390000));
        assert_eq!(totals[0].contribution_amount, dec!(30000));
    }

    #[tokio::test]
    async fn inactive_invoice_is_reactivated_on_create() {
        let f = fixture().await;
        f.store
            .invoices()
            .insert(Invoice {
                id: "INV001".into(),
                name: "Old".into(),
                description: None,
                is_active: false,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap();
        assert!(f.invoices.get("INV001").await.is_err());

        let created = f.invoices.create(new_invoice(&f, Some(102))).await.unwrap();
        assert!(created.invoice.is_active);
        assert_eq!(created.invoice.name, "May 2024");
        assert!(f.invoices.get("INV001").await.is_ok());
    }

    #[tokio::test]
    async fn update_replaces_fee_set_and_delete_removes_links() {
        let f = fixture().await;
        f.invoices.create(new_invoice(&f, None)).await.unwrap();

        let updated = f
            .invoices
            .update(
                "INV001",
                InvoiceUpdate {
                    fee_ids: Some(vec![f.department.id]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.fees.len(), 1);
        assert_eq!(updated.invoice.name, "May 2024");

        f.invoices.delete("INV001").await.unwrap();
        assert!(f.store.invoice_apartments().for_invoice("INV001").await.unwrap().is_empty());
        assert!(f.store.invoices().fee_ids("INV001").await.unwrap().is_empty());
    }
}
