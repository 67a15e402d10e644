//! Funil Core Library
//!
//! This crate provides the domain models, error types, configuration and the
//! pure CRM logic (key hashing, card ordering, dashboard aggregation) shared
//! by all Funil components.

pub mod api_key;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod ordering;
pub mod validation;

// Re-export commonly used types
pub use api_key::IssuedKey;
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel, INTERNAL_ERROR_MESSAGE};
pub use ordering::{DropTarget, MovePlan};
