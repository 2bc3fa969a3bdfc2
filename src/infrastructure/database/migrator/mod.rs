//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users;
mod m20240101_000002_create_apartments;
mod m20240101_000003_create_residents;
mod m20240101_000004_create_vehicles;
mod m20240101_000005_create_fees;
mod m20240101_000006_create_invoices;
mod m20240101_000007_create_fee_invoices;
mod m20240101_000008_create_invoice_apartments;
mod m20240101_000009_create_utility_bills;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users::Migration),
            Box::new(m20240101_000002_create_apartments::Migration),
            Box::new(m20240101_000003_create_residents::Migration),
            Box::new(m20240101_000004_create_vehicles::Migration),
            Box::new(m20240101_000005_create_fees::Migration),
            Box::new(m20240101_000006_create_invoices::Migration),
            Box::new(m20240101_000007_create_fee_invoices::Migration),
            Box::new(m20240101_000008_create_invoice_apartments::Migration),
            Box::new(m20240101_000009_create_utility_bills::Migration),
        ]
    }
}
