pub mod apartments;
pub mod auth;
pub mod fees;
pub mod health;
pub mod invoices;
pub mod metrics;
pub mod request_id;
pub mod residents;
pub mod users;
pub mod utility_bills;
pub mod vehicles;
