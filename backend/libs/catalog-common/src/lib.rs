//! # Catalog Common
//!
//! Plumbing shared by the catalog services: the JSON error body, request
//! extractor configs, validation error formatting, CORS and tracing setup.

pub mod cors;
pub mod error;
pub mod extract;
pub mod telemetry;
pub mod validation;

pub use cors::cors;
pub use error::{error_response, ErrorResponse};
pub use extract::{json_config, query_config};
pub use telemetry::init_tracing;
pub use validation::describe_validation;
