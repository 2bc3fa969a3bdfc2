//! Domain layer
//!
//! Plain records with foreign-key fields, their enums, fee-charge rules and
//! the repository traits the application layer depends on.

pub mod apartment;
pub mod fee;
pub mod invoice;
pub mod repositories;
pub mod resident;
pub mod user;
pub mod utility_bill;
pub mod vehicle;

pub use apartment::{Apartment, ApartmentDetails, ApartmentFilter, ApartmentStatus};
pub use fee::{Fee, FeeFilter, FeeType};
pub use invoice::{
    ApartmentUsage, FeeAmounts, Invoice, InvoiceApartment, InvoiceFilter, PaymentStatus,
    VehicleRates,
};
pub use repositories::{DomainResult, RepositoryProvider, Store, UnitOfWork};
pub use resident::{Gender, Resident, ResidentFilter, ResidentStatus};
pub use user::{User, UserFilter};
pub use utility_bill::{UtilityBill, UtilityBillFilter};
pub use vehicle::{Vehicle, VehicleCategory, VehicleFilter};

pub use crate::shared::errors::DomainError;
