//! Application services
//!
//! Each service owns the use cases of one resource. Reads go straight to the
//! store; mutations spanning several records run inside one unit of work and
//! commit only when all of their steps succeeded.

pub mod apartment;
pub mod fee;
pub mod invoice;
mod lookups;
pub mod resident;
pub mod user;
pub mod utility_bill;
pub mod vehicle;

pub use apartment::{ApartmentService, ApartmentUpdate, NewApartment};
pub use fee::{FeeService, FeeUpdate, NewFeeRequest};
pub use invoice::{
    ApartmentInvoice, FeeCharge, InvoiceService, InvoiceTotal, InvoiceUpdate, InvoiceWithFees,
    NewInvoice,
};
pub use resident::{NewResident, ResidentService, ResidentUpdate};
pub use user::{AuthResult, UserService, UserUpdate};
pub use utility_bill::{UtilityBillRow, UtilityBillService};
pub use vehicle::{NewVehicle, VehicleService};

#[cfg(test)]
pub(crate) mod test_support;
