//! Database entities module

pub mod apartment;
pub mod fee;
pub mod fee_invoice;
pub mod invoice;
pub mod invoice_apartment;
pub mod resident;
pub mod user;
pub mod utility_bill;
pub mod vehicle;

pub use apartment::Entity as Apartment;
pub use fee::Entity as Fee;
pub use fee_invoice::Entity as FeeInvoice;
pub use invoice::Entity as Invoice;
pub use invoice_apartment::Entity as InvoiceApartment;
pub use resident::Entity as Resident;
pub use user::Entity as User;
pub use utility_bill::Entity as UtilityBill;
pub use vehicle::Entity as Vehicle;
