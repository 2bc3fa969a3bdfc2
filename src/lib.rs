//! # Department Manager
//!
//! REST backend for running an apartment building: residents, apartments,
//! vehicles, fees, invoices and imported utility bills.
//!
//! ## Architecture
//!
//! - **domain**: records, enums, fee-charge rules and repository traits
//! - **application**: services implementing the use cases
//! - **infrastructure**: SeaORM persistence, in-memory store, JWT and passwords
//! - **interfaces**: the axum HTTP API with Swagger documentation
//! - **shared**: errors, pagination, validation helpers, shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{
    init_database, run_migrations, DatabaseConfig, InMemoryStore, SeaOrmRepositoryProvider,
};

pub use interfaces::http::{create_api_router, AppState};
