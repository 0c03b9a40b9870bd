//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! image handlers: query parsing and response builders.

pub mod query;
pub mod response;

// Re-export commonly used types
pub use query::QueryMap;
pub use response::{
    build_405_response, build_error_response, build_health_response, build_image_response,
    build_json_response, build_not_found_response, build_options_response,
};
