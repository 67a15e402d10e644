//! Data models for the application
//!
//! This module contains all data structures used throughout the application,
//! organized by domain. Each sub-module represents a specific feature area.

mod admin;
mod api_key;
mod board;
mod card;
mod contact;
mod custom_field;
mod dashboard;
pub mod patch;
mod plan;
mod profile;
mod stage;
mod tag;
mod tenant;

// Re-export all models for convenient imports
pub use admin::*;
pub use api_key::*;
pub use board::*;
pub use card::*;
pub use contact::*;
pub use custom_field::*;
pub use dashboard::*;
pub use plan::*;
pub use profile::*;
pub use stage::*;
pub use tag::*;
pub use tenant::*;
