//! SeaORM implementation of RepositoryProvider, Store and UnitOfWork

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, Statement, TransactionTrait,
};

use crate::domain::apartment::ApartmentRepository;
use crate::domain::fee::FeeRepository;
use crate::domain::invoice::{InvoiceApartmentRepository, InvoiceRepository};
use crate::domain::repositories::{RepositoryProvider, Store, UnitOfWork};
use crate::domain::resident::ResidentRepository;
use crate::domain::user::UserRepository;
use crate::domain::utility_bill::UtilityBillRepository;
use crate::domain::vehicle::VehicleRepository;
use crate::domain::{DomainError, DomainResult};

use super::apartment_repository::SeaOrmApartmentRepository;
use super::db_err;
use super::fee_repository::SeaOrmFeeRepository;
use super::invoice_repository::{SeaOrmInvoiceApartmentRepository, SeaOrmInvoiceRepository};
use super::resident_repository::SeaOrmResidentRepository;
use super::user_repository::SeaOrmUserRepository;
use super::utility_bill_repository::SeaOrmUtilityBillRepository;
use super::vehicle_repository::SeaOrmVehicleRepository;

/// Unified repository provider backed by SeaORM.
///
/// Over a `DatabaseConnection` it is the long-lived [`Store`]; over a
/// `DatabaseTransaction` it is a [`UnitOfWork`].
///
/// ```ignore
/// let store = SeaOrmRepositoryProvider::new(db.clone());
/// let uow = store.begin().await?;
/// uow.residents().update(resident).await?;
/// uow.commit().await?;
/// ```
pub struct SeaOrmRepositoryProvider<C> {
    conn: Arc<C>,
    users: SeaOrmUserRepository<C>,
    residents: SeaOrmResidentRepository<C>,
    apartments: SeaOrmApartmentRepository<C>,
    vehicles: SeaOrmVehicleRepository<C>,
    fees: SeaOrmFeeRepository<C>,
    invoices: SeaOrmInvoiceRepository<C>,
    invoice_apartments: SeaOrmInvoiceApartmentRepository<C>,
    utility_bills: SeaOrmUtilityBillRepository<C>,
}

impl<C> SeaOrmRepositoryProvider<C> {
    pub fn new(conn: C) -> Self {
        let conn = Arc::new(conn);
        Self {
            users: SeaOrmUserRepository::new(conn.clone()),
            residents: SeaOrmResidentRepository::new(conn.clone()),
            apartments: SeaOrmApartmentRepository::new(conn.clone()),
            vehicles: SeaOrmVehicleRepository::new(conn.clone()),
            fees: SeaOrmFeeRepository::new(conn.clone()),
            invoices: SeaOrmInvoiceRepository::new(conn.clone()),
            invoice_apartments: SeaOrmInvoiceApartmentRepository::new(conn.clone()),
            utility_bills: SeaOrmUtilityBillRepository::new(conn.clone()),
            conn,
        }
    }
}

impl<C> RepositoryProvider for SeaOrmRepositoryProvider<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn residents(&self) -> &dyn ResidentRepository {
        &self.residents
    }

    fn apartments(&self) -> &dyn ApartmentRepository {
        &self.apartments
    }

    fn vehicles(&self) -> &dyn VehicleRepository {
        &self.vehicles
    }

    fn fees(&self) -> &dyn FeeRepository {
        &self.fees
    }

    fn invoices(&self) -> &dyn InvoiceRepository {
        &self.invoices
    }

    fn invoice_apartments(&self) -> &dyn InvoiceApartmentRepository {
        &self.invoice_apartments
    }

    fn utility_bills(&self) -> &dyn UtilityBillRepository {
        &self.utility_bills
    }
}

#[async_trait]
impl Store for SeaOrmRepositoryProvider<DatabaseConnection> {
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        let txn = self.conn.begin().await.map_err(db_err)?;
        Ok(Box::new(SeaOrmRepositoryProvider::new(txn)))
    }

    async fn ping(&self) -> DomainResult<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .execute(Statement::from_string(backend, "SELECT 1".to_string()))
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for SeaOrmRepositoryProvider<DatabaseTransaction> {
    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let SeaOrmRepositoryProvider {
            conn,
            users,
            residents,
            apartments,
            vehicles,
            fees,
            invoices,
            invoice_apartments,
            utility_bills,
        } = *self;
        drop((
            users,
            residents,
            apartments,
            vehicles,
            fees,
            invoices,
            invoice_apartments,
            utility_bills,
        ));

        let txn = Arc::try_unwrap(conn)
            .map_err(|_| DomainError::Internal("Transaction is still in use".to_string()))?;
        txn.commit().await.map_err(db_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use sea_orm::{ConnectOptions, Database};

    use crate::domain::apartment::{Apartment, ApartmentStatus};
    use crate::domain::fee::{FeeType, NewFee};
    use crate::domain::invoice::PaymentStatus;
    use crate::domain::utility_bill::NewUtilityBill;
    use crate::domain::resident::{Resident, ResidentStatus};
    use crate::domain::vehicle::{Vehicle, VehicleCategory, VehicleFilter};
    use crate::infrastructure::database::run_migrations;
    use crate::shared::PageRequest;

    async fn sqlite_store() -> SeaOrmRepositoryProvider<DatabaseConnection> {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();
        run_migrations(&db).await.unwrap();
        SeaOrmRepositoryProvider::new(db)
    }

    fn apartment(address_number: i64) -> Apartment {
        let now = Utc::now();
        Apartment {
            address_number,
            area: Decimal::from(80),
            status: ApartmentStatus::Residential,
            owner_id: None,
            owner_phone: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn vehicle(plate: &str, category: VehicleCategory, apartment_id: i64) -> Vehicle {
        Vehicle {
            id: plate.to_string(),
            category,
            apartment_id,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn migrated_schema_supports_crud_and_paging() {
        let store = sqlite_store().await;
        store.ping().await.unwrap();

        store.apartments().insert(apartment(101)).await.unwrap();
        let now = Utc::now();
        store
            .residents()
            .insert(Resident {
                id: 1001,
                name: "Nguyen Van A".to_string(),
                dob: None,
                gender: None,
                cic: None,
                status: ResidentStatus::Active,
                apartment_id: Some(101),
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        let mut flat = store.apartments().find_by_id(101).await.unwrap().unwrap();
        assert_eq!(flat.area, Decimal::from(80));
        flat.owner_id = Some(1001);
        store.apartments().update(flat).await.unwrap();
        let owned = store.apartments().find_by_owner(1001).await.unwrap();
        assert_eq!(owned.map(|a| a.address_number), Some(101));

        for (plate, category) in [
            ("29A-001", VehicleCategory::Car),
            ("29A-002", VehicleCategory::Car),
            ("29B-100", VehicleCategory::Motorbike),
        ] {
            store.vehicles().insert(vehicle(plate, category, 101)).await.unwrap();
        }

        let cars = VehicleFilter {
            category: Some(VehicleCategory::Car),
            apartment_id: None,
        };
        let page = store
            .vehicles()
            .list(&cars, PageRequest::new(1, 1))
            .await
            .unwrap();
        assert_eq!(page.total_elements, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "29A-001");

        assert_eq!(store.vehicles().delete_by_apartment(101).await.unwrap(), 3);
        assert!(store.vehicles().find_by_apartment(101).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn money_columns_store_fees_and_utility_bills() {
        let store = sqlite_store().await;
        store.apartments().insert(apartment(301)).await.unwrap();

        let fee = store
            .fees()
            .insert(NewFee {
                name: "Management".to_string(),
                description: None,
                fee_type: FeeType::DepartmentFee,
                unit_price: Decimal::new(15005, 1),
            })
            .await
            .unwrap();
        let stored = store.fees().find_by_id(fee.id).await.unwrap().unwrap();
        assert_eq!(stored.unit_price, Decimal::new(15005, 1));

        let bills = store
            .utility_bills()
            .insert_many(vec![NewUtilityBill {
                apartment_id: 301,
                name: "2024-05".to_string(),
                electricity: Decimal::from(350_000),
                water: Decimal::from(120_000),
                internet: Decimal::from(200_000),
            }])
            .await
            .unwrap();
        let stored = store.utility_bills().find_by_apartment(301).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, bills[0].id);
        assert_eq!(stored[0].total(), Decimal::from(670_000));
        assert_eq!(stored[0].payment_status, PaymentStatus::Unpaid);
    }

    #[tokio::test]
    async fn commit_persists_and_dropped_unit_of_work_rolls_back() {
        let store = sqlite_store().await;

        let uow = store.begin().await.unwrap();
        uow.apartments().insert(apartment(201)).await.unwrap();
        uow.commit().await.unwrap();
        assert!(store.apartments().find_by_id(201).await.unwrap().is_some());

        let uow = store.begin().await.unwrap();
        uow.apartments().insert(apartment(202)).await.unwrap();
        drop(uow);
        assert!(store.apartments().find_by_id(202).await.unwrap().is_none());
    }
}
