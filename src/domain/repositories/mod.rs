//! Repository access for the domain layer
//!
//! - `RepositoryProvider`: per-aggregate repository accessors
//! - `UnitOfWork`: a provider bound to one transaction
//! - `Store`: the long-lived provider services hold, able to open units of work

use async_trait::async_trait;

use super::apartment::ApartmentRepository;
use super::fee::FeeRepository;
use super::invoice::{InvoiceApartmentRepository, InvoiceRepository};
use super::resident::ResidentRepository;
use super::user::UserRepository;
use super::utility_bill::UtilityBillRepository;
use super::vehicle::VehicleRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// ```ignore
/// let owner = repos.residents().find_by_id(42).await?;
/// let apartment = repos.apartments().find_by_owner(42).await?;
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn residents(&self) -> &dyn ResidentRepository;
    fn apartments(&self) -> &dyn ApartmentRepository;
    fn vehicles(&self) -> &dyn VehicleRepository;
    fn fees(&self) -> &dyn FeeRepository;
    fn invoices(&self) -> &dyn InvoiceRepository;
    fn invoice_apartments(&self) -> &dyn InvoiceApartmentRepository;
    fn utility_bills(&self) -> &dyn UtilityBillRepository;
}

/// Repositories bound to a single transaction.
///
/// Dropping a unit of work without calling `commit` discards every change
/// made through it.
#[async_trait]
pub trait UnitOfWork: RepositoryProvider {
    async fn commit(self: Box<Self>) -> DomainResult<()>;
}

/// Long-lived repository provider that can open units of work.
#[async_trait]
pub trait Store: RepositoryProvider {
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>>;

    /// Round trip to the backing storage, used by the health check.
    async fn ping(&self) -> DomainResult<()>;
}
