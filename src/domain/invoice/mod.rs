//! Invoice aggregate: invoices, their per-apartment links and fee charges

pub mod charges;
pub mod model;
pub mod repository;

pub use charges::{fee_amount, ApartmentUsage, VehicleRates};
pub use model::{
    FeeAmounts, Invoice, InvoiceApartment, InvoiceFilter, NewInvoiceApartment, PaymentStatus,
};
pub use repository::{InvoiceApartmentRepository, InvoiceRepository};
