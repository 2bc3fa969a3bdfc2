//! In-memory store for development and testing
//!
//! A unit of work operates on a snapshot of the tables and copies it back on
//! commit. Concurrent units of work are not isolated from each other: the
//! last one to commit wins.

use std::hash::Hash;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use crate::domain::apartment::{Apartment, ApartmentFilter, ApartmentRepository};
use crate::domain::fee::{Fee, FeeFilter, FeeRepository, NewFee};
use crate::domain::invoice::{
    FeeAmounts, Invoice, InvoiceApartment, InvoiceApartmentRepository, InvoiceFilter,
    InvoiceRepository, NewInvoiceApartment, PaymentStatus,
};
use crate::domain::repositories::{RepositoryProvider, Store, UnitOfWork};
use crate::domain::resident::{Resident, ResidentFilter, ResidentRepository};
use crate::domain::user::{NewUser, User, UserFilter, UserRepository};
use crate::domain::utility_bill::{
    NewUtilityBill, UtilityBill, UtilityBillFilter, UtilityBillRepository,
};
use crate::domain::vehicle::{Vehicle, VehicleFilter, VehicleRepository};
use crate::domain::{DomainError, DomainResult};
use crate::shared::{Page, PageRequest};

#[derive(Default)]
struct Tables {
    users: DashMap<i64, User>,
    residents: DashMap<i64, Resident>,
    apartments: DashMap<i64, Apartment>,
    vehicles: DashMap<String, Vehicle>,
    fees: DashMap<i64, Fee>,
    invoices: DashMap<String, Invoice>,
    fee_invoices: DashMap<(i64, String), ()>,
    invoice_apartments: DashMap<i64, InvoiceApartment>,
    utility_bills: DashMap<i64, UtilityBill>,
    user_seq: AtomicI64,
    fee_seq: AtomicI64,
    link_seq: AtomicI64,
    bill_seq: AtomicI64,
}

fn copy_map<K, V>(from: &DashMap<K, V>, to: &DashMap<K, V>)
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    to.clear();
    for entry in from.iter() {
        to.insert(entry.key().clone(), entry.value().clone());
    }
}

/// Values of `map` that satisfy `keep`, ordered by key.
fn sorted_values<K, V>(map: &DashMap<K, V>, keep: impl Fn(&V) -> bool) -> Vec<V>
where
    K: Eq + Hash + Ord + Clone,
    V: Clone,
{
    let mut rows: Vec<(K, V)> = map
        .iter()
        .filter(|e| keep(e.value()))
        .map(|e| (e.key().clone(), e.value().clone()))
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0));
    rows.into_iter().map(|(_, v)| v).collect()
}

fn next_id(seq: &AtomicI64) -> i64 {
    seq.fetch_add(1, Ordering::SeqCst) + 1
}

impl Tables {
    fn copy_into(&self, target: &Tables) {
        copy_map(&self.users, &target.users);
        copy_map(&self.residents, &target.residents);
        copy_map(&self.apartments, &target.apartments);
        copy_map(&self.vehicles, &target.vehicles);
        copy_map(&self.fees, &target.fees);
        copy_map(&self.invoices, &target.invoices);
        copy_map(&self.fee_invoices, &target.fee_invoices);
        copy_map(&self.invoice_apartments, &target.invoice_apartments);
        copy_map(&self.utility_bills, &target.utility_bills);
        for (from, to) in [
            (&self.user_seq, &target.user_seq),
            (&self.fee_seq, &target.fee_seq),
            (&self.link_seq, &target.link_seq),
            (&self.bill_seq, &target.bill_seq),
        ] {
            to.store(from.load(Ordering::SeqCst), Ordering::SeqCst);
        }
    }

    fn snapshot(&self) -> Tables {
        let copy = Tables::default();
        self.copy_into(&copy);
        copy
    }
}

/// DashMap-backed store implementing every repository trait.
pub struct InMemoryStore {
    tables: Arc<Tables>,
    /// Set on units of work: the tables a commit writes back to.
    parent: Option<Arc<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(Tables::default()),
            parent: None,
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryStore {
    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn residents(&self) -> &dyn ResidentRepository {
        self
    }

    fn apartments(&self) -> &dyn ApartmentRepository {
        self
    }

    fn vehicles(&self) -> &dyn VehicleRepository {
        self
    }

    fn fees(&self) -> &dyn FeeRepository {
        self
    }

    fn invoices(&self) -> &dyn InvoiceRepository {
        self
    }

    fn invoice_apartments(&self) -> &dyn InvoiceApartmentRepository {
        self
    }

    fn utility_bills(&self) -> &dyn UtilityBillRepository {
        self
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        Ok(Box::new(InMemoryStore {
            tables: Arc::new(self.tables.snapshot()),
            parent: Some(self.tables.clone()),
        }))
    }

    async fn ping(&self) -> DomainResult<()> {
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for InMemoryStore {
    async fn commit(self: Box<Self>) -> DomainResult<()> {
        match &self.parent {
            Some(parent) => {
                self.tables.copy_into(parent);
                Ok(())
            }
            None => Err(DomainError::Internal(
                "commit called outside a unit of work".to_string(),
            )),
        }
    }
}

// ── Users ───────────────────────────────────────────────────────

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        Ok(self.tables.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .tables
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.clone()))
    }

    async fn list(&self, filter: &UserFilter, page: PageRequest) -> DomainResult<Page<User>> {
        let rows = sorted_values(&self.tables.users, |u| filter.matches(u));
        Ok(Page::from_vec(rows, page))
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.tables.users.len() as u64)
    }

    async fn insert(&self, new_user: NewUser) -> DomainResult<User> {
        if self.tables.users.iter().any(|u| u.email == new_user.email) {
            return Err(DomainError::Conflict("Email already exists".to_string()));
        }
        let now = Utc::now();
        let user = User {
            id: next_id(&self.tables.user_seq),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, mut user: User) -> DomainResult<User> {
        if !self.tables.users.contains_key(&user.id) {
            return Err(DomainError::not_found("User", "id", user.id));
        }
        user.updated_at = Utc::now();
        self.tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}

// ── Residents ───────────────────────────────────────────────────

#[async_trait]
impl ResidentRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Resident>> {
        Ok(self.tables.residents.get(&id).map(|r| r.clone()))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> DomainResult<Vec<Resident>> {
        Ok(sorted_values(&self.tables.residents, |r| ids.contains(&r.id)))
    }

    async fn find_by_apartment(&self, apartment_id: i64) -> DomainResult<Vec<Resident>> {
        Ok(sorted_values(&self.tables.residents, |r| {
            r.apartment_id == Some(apartment_id)
        }))
    }

    async fn list(
        &self,
        filter: &ResidentFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Resident>> {
        let rows = sorted_values(&self.tables.residents, |r| filter.matches(r));
        Ok(Page::from_vec(rows, page))
    }

    async fn insert(&self, resident: Resident) -> DomainResult<Resident> {
        if self.tables.residents.contains_key(&resident.id) {
            return Err(DomainError::Conflict(format!(
                "Resident with id = {} already exists",
                resident.id
            )));
        }
        self.tables.residents.insert(resident.id, resident.clone());
        Ok(resident)
    }

    async fn update(&self, mut resident: Resident) -> DomainResult<Resident> {
        if !self.tables.residents.contains_key(&resident.id) {
            return Err(DomainError::not_found("Resident", "id", resident.id));
        }
        resident.updated_at = Utc::now();
        self.tables.residents.insert(resident.id, resident.clone());
        Ok(resident)
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        self.tables.residents.remove(&id);
        Ok(())
    }
}

// ── Apartments ──────────────────────────────────────────────────

#[async_trait]
impl ApartmentRepository for InMemoryStore {
    async fn find_by_id(&self, address_number: i64) -> DomainResult<Option<Apartment>> {
        Ok(self.tables.apartments.get(&address_number).map(|a| a.clone()))
    }

    async fn find_by_owner(&self, resident_id: i64) -> DomainResult<Option<Apartment>> {
        Ok(self
            .tables
            .apartments
            .iter()
            .find(|a| a.owner_id == Some(resident_id))
            .map(|a| a.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Apartment>> {
        Ok(sorted_values(&self.tables.apartments, |_| true))
    }

    async fn list(
        &self,
        filter: &ApartmentFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Apartment>> {
        let rows = sorted_values(&self.tables.apartments, |a| filter.matches(a));
        Ok(Page::from_vec(rows, page))
    }

    async fn insert(&self, apartment: Apartment) -> DomainResult<Apartment> {
        if self.tables.apartments.contains_key(&apartment.address_number) {
            return Err(DomainError::Conflict(format!(
                "Apartment with address number = {} already exists",
                apartment.address_number
            )));
        }
        self.tables
            .apartments
            .insert(apartment.address_number, apartment.clone());
        Ok(apartment)
    }

    async fn update(&self, mut apartment: Apartment) -> DomainResult<Apartment> {
        if !self.tables.apartments.contains_key(&apartment.address_number) {
            return Err(DomainError::not_found(
                "Apartment",
                "address number",
                apartment.address_number,
            ));
        }
        apartment.updated_at = Utc::now();
        self.tables
            .apartments
            .insert(apartment.address_number, apartment.clone());
        Ok(apartment)
    }

    async fn delete(&self, address_number: i64) -> DomainResult<()> {
        self.tables.apartments.remove(&address_number);
        Ok(())
    }
}

// ── Vehicles ────────────────────────────────────────────────────

#[async_trait]
impl VehicleRepository for InMemoryStore {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Vehicle>> {
        Ok(self.tables.vehicles.get(id).map(|v| v.clone()))
    }

    async fn find_by_apartment(&self, apartment_id: i64) -> DomainResult<Vec<Vehicle>> {
        Ok(sorted_values(&self.tables.vehicles, |v| {
            v.apartment_id == apartment_id
        }))
    }

    async fn list(&self, filter: &VehicleFilter, page: PageRequest) -> DomainResult<Page<Vehicle>> {
        let rows = sorted_values(&self.tables.vehicles, |v| filter.matches(v));
        Ok(Page::from_vec(rows, page))
    }

    async fn insert(&self, vehicle: Vehicle) -> DomainResult<Vehicle> {
        self.tables
            .vehicles
            .insert(vehicle.id.clone(), vehicle.clone());
        Ok(vehicle)
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.tables.vehicles.remove(id);
        Ok(())
    }

    async fn delete_by_apartment(&self, apartment_id: i64) -> DomainResult<u64> {
        let before = self.tables.vehicles.len();
        self.tables
            .vehicles
            .retain(|_, v| v.apartment_id != apartment_id);
        Ok((before - self.tables.vehicles.len()) as u64)
    }
}

// ── Fees ────────────────────────────────────────────────────────

#[async_trait]
impl FeeRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Fee>> {
        Ok(self.tables.fees.get(&id).map(|f| f.clone()))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> DomainResult<Vec<Fee>> {
        Ok(sorted_values(&self.tables.fees, |f| ids.contains(&f.id)))
    }

    async fn list(&self, filter: &FeeFilter, page: PageRequest) -> DomainResult<Page<Fee>> {
        let rows = sorted_values(&self.tables.fees, |f| filter.matches(f));
        Ok(Page::from_vec(rows, page))
    }

    async fn insert(&self, new_fee: NewFee) -> DomainResult<Fee> {
        let now = Utc::now();
        let fee = Fee {
            id: next_id(&self.tables.fee_seq),
            name: new_fee.name,
            description: new_fee.description,
            fee_type: new_fee.fee_type,
            unit_price: new_fee.unit_price,
            created_at: now,
            updated_at: now,
        };
        self.tables.fees.insert(fee.id, fee.clone());
        Ok(fee)
    }

    async fn update(&self, mut fee: Fee) -> DomainResult<Fee> {
        if !self.tables.fees.contains_key(&fee.id) {
            return Err(DomainError::not_found("Fee", "id", fee.id));
        }
        fee.updated_at = Utc::now();
        self.tables.fees.insert(fee.id, fee.clone());
        Ok(fee)
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        self.tables.fees.remove(&id);
        Ok(())
    }
}

// ── Invoices ────────────────────────────────────────────────────

#[async_trait]
impl InvoiceRepository for InMemoryStore {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Invoice>> {
        Ok(self.tables.invoices.get(id).map(|i| i.clone()))
    }

    async fn find_active(&self) -> DomainResult<Vec<Invoice>> {
        Ok(sorted_values(&self.tables.invoices, |i| i.is_active))
    }

    async fn list(&self, filter: &InvoiceFilter, page: PageRequest) -> DomainResult<Page<Invoice>> {
        let rows = sorted_values(&self.tables.invoices, |i| filter.matches(i));
        Ok(Page::from_vec(rows, page))
    }

    async fn insert(&self, invoice: Invoice) -> DomainResult<Invoice> {
        self.tables
            .invoices
            .insert(invoice.id.clone(), invoice.clone());
        Ok(invoice)
    }

    async fn update(&self, mut invoice: Invoice) -> DomainResult<Invoice> {
        if !self.tables.invoices.contains_key(&invoice.id) {
            return Err(DomainError::not_found("Invoice", "id", &invoice.id));
        }
        invoice.updated_at = Utc::now();
        self.tables
            .invoices
            .insert(invoice.id.clone(), invoice.clone());
        Ok(invoice)
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.tables.fee_invoices.retain(|(_, invoice_id), _| invoice_id != id);
        self.tables.invoices.remove(id);
        Ok(())
    }

    async fn fee_ids(&self, invoice_id: &str) -> DomainResult<Vec<i64>> {
        let mut ids: Vec<i64> = self
            .tables
            .fee_invoices
            .iter()
            .filter(|e| e.key().1 == invoice_id)
            .map(|e| e.key().0)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn replace_fees(&self, invoice_id: &str, fee_ids: &[i64]) -> DomainResult<()> {
        self.tables
            .fee_invoices
            .retain(|(_, linked), _| linked != invoice_id);
        for fee_id in fee_ids {
            self.tables
                .fee_invoices
                .insert((*fee_id, invoice_id.to_string()), ());
        }
        Ok(())
    }

    async fn remove_fee(&self, fee_id: i64) -> DomainResult<()> {
        self.tables.fee_invoices.retain(|(linked, _), _| *linked != fee_id);
        Ok(())
    }
}

#[async_trait]
impl InvoiceApartmentRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<InvoiceApartment>> {
        Ok(self.tables.invoice_apartments.get(&id).map(|l| l.clone()))
    }

    async fn find(
        &self,
        invoice_id: &str,
        apartment_id: i64,
    ) -> DomainResult<Option<InvoiceApartment>> {
        Ok(self
            .tables
            .invoice_apartments
            .iter()
            .find(|l| l.invoice_id == invoice_id && l.apartment_id == apartment_id)
            .map(|l| l.clone()))
    }

    async fn for_apartment(&self, apartment_id: i64) -> DomainResult<Vec<InvoiceApartment>> {
        Ok(sorted_values(&self.tables.invoice_apartments, |l| {
            l.apartment_id == apartment_id
        }))
    }

    async fn for_invoice(&self, invoice_id: &str) -> DomainResult<Vec<InvoiceApartment>> {
        Ok(sorted_values(&self.tables.invoice_apartments, |l| {
            l.invoice_id == invoice_id
        }))
    }

    async fn insert(&self, link: NewInvoiceApartment) -> DomainResult<InvoiceApartment> {
        let now = Utc::now();
        let link = InvoiceApartment {
            id: next_id(&self.tables.link_seq),
            invoice_id: link.invoice_id,
            apartment_id: link.apartment_id,
            payment_status: PaymentStatus::Unpaid,
            fee_amounts: FeeAmounts::new(),
            created_at: now,
            updated_at: now,
        };
        self.tables.invoice_apartments.insert(link.id, link.clone());
        Ok(link)
    }

    async fn update(&self, mut link: InvoiceApartment) -> DomainResult<InvoiceApartment> {
        if !self.tables.invoice_apartments.contains_key(&link.id) {
            return Err(DomainError::not_found("InvoiceApartment", "id", link.id));
        }
        link.updated_at = Utc::now();
        self.tables.invoice_apartments.insert(link.id, link.clone());
        Ok(link)
    }

    async fn delete_for_invoice(&self, invoice_id: &str) -> DomainResult<()> {
        self.tables
            .invoice_apartments
            .retain(|_, l| l.invoice_id != invoice_id);
        Ok(())
    }

    async fn delete_for_apartment(&self, apartment_id: i64) -> DomainResult<()> {
        self.tables
            .invoice_apartments
            .retain(|_, l| l.apartment_id != apartment_id);
        Ok(())
    }
}

// ── Utility bills ───────────────────────────────────────────────

#[async_trait]
impl UtilityBillRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<UtilityBill>> {
        Ok(self.tables.utility_bills.get(&id).map(|b| b.clone()))
    }

    async fn find_by_apartment(&self, apartment_id: i64) -> DomainResult<Vec<UtilityBill>> {
        Ok(sorted_values(&self.tables.utility_bills, |b| {
            b.apartment_id == apartment_id
        }))
    }

    async fn list(
        &self,
        filter: &UtilityBillFilter,
        page: PageRequest,
    ) -> DomainResult<Page<UtilityBill>> {
        let rows = sorted_values(&self.tables.utility_bills, |b| filter.matches(b));
        Ok(Page::from_vec(rows, page))
    }

    async fn insert_many(&self, bills: Vec<NewUtilityBill>) -> DomainResult<Vec<UtilityBill>> {
        let now = Utc::now();
        let saved: Vec<UtilityBill> = bills
            .into_iter()
            .map(|b| UtilityBill {
                id: next_id(&self.tables.bill_seq),
                apartment_id: b.apartment_id,
                name: b.name,
                electricity: b.electricity,
                water: b.water,
                internet: b.internet,
                payment_status: PaymentStatus::Unpaid,
                created_at: now,
            })
            .collect();
        for bill in &saved {
            self.tables.utility_bills.insert(bill.id, bill.clone());
        }
        Ok(saved)
    }

    async fn update(&self, bill: UtilityBill) -> DomainResult<UtilityBill> {
        if !self.tables.utility_bills.contains_key(&bill.id) {
            return Err(DomainError::not_found("UtilityBill", "id", bill.id));
        }
        self.tables.utility_bills.insert(bill.id, bill.clone());
        Ok(bill)
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        self.tables.utility_bills.remove(&id);
        Ok(())
    }

    async fn delete_by_apartment(&self, apartment_id: i64) -> DomainResult<()> {
        self.tables
            .utility_bills
            .retain(|_, b| b.apartment_id != apartment_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(email: &str) -> NewUser {
        NewUser {
            name: "Admin".into(),
            email: email.into(),
            password_hash: "hash".into(),
        }
    }

    #[tokio::test]
    async fn committed_work_is_visible() {
        let store = InMemoryStore::new();
        let uow = store.begin().await.unwrap();
        uow.users().insert(sample_user("a@b.c")).await.unwrap();
        assert_eq!(store.users().count().await.unwrap(), 0);

        uow.commit().await.unwrap();
        assert_eq!(store.users().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn dropped_work_is_discarded() {
        let store = InMemoryStore::new();
        {
            let uow = store.begin().await.unwrap();
            uow.users().insert(sample_user("a@b.c")).await.unwrap();
        }
        assert_eq!(store.users().count().await.unwrap(), 0);

        let uow = store.begin().await.unwrap();
        let user = uow.users().insert(sample_user("x@y.z")).await.unwrap();
        assert_eq!(user.id, 1);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = InMemoryStore::new();
        store.users().insert(sample_user("a@b.c")).await.unwrap();
        let err = store.users().insert(sample_user("a@b.c")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn fee_links_follow_replacement() {
        let store = InMemoryStore::new();
        store.invoices().replace_fees("INV001", &[3, 1]).await.unwrap();
        assert_eq!(store.invoices().fee_ids("INV001").await.unwrap(), vec![1, 3]);

        store.invoices().replace_fees("INV001", &[2]).await.unwrap();
        assert_eq!(store.invoices().fee_ids("INV001").await.unwrap(), vec![2]);

        store.invoices().remove_fee(2).await.unwrap();
        assert!(store.invoices().fee_ids("INV001").await.unwrap().is_empty());
    }
}
