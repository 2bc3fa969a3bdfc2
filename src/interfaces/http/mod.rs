//! HTTP REST API
//!
//! - `common`: response envelopes, error mapping, validated JSON extractor
//! - `middleware`: JWT bearer authentication
//! - `modules`: one module per resource (DTOs + handlers)
//! - `router`: route table, middleware stack and OpenAPI document

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;

pub use router::{create_api_router, ApiDoc};
pub use state::AppState;
