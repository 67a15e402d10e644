//! Funil API Library
//!
//! This crate provides the HTTP handlers, authentication middleware, and
//! application setup of the Funil CRM.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
pub mod setup;

// Public modules
pub mod auth;
pub mod error;
pub mod state;

// Re-exports
pub use api_doc::get_openapi_spec;
pub use error::ErrorResponse;
