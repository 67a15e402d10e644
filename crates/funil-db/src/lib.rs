//! Funil Database Layer
//!
//! This crate provides the PostgreSQL repositories of the control plane
//! (tenants, profiles, plans, API keys) and of the tenant-scoped CRM
//! (boards, stages, cards, contacts, tags, custom fields, dashboard reads).
//!
// Module declarations
pub mod db;

use sqlx::migrate::Migrator;

/// Embedded schema migrations, applied at startup and by the integration tests.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

// Re-exports: Control plane repositories
pub use db::{AdminRepository, ApiKeyRepository, PlanRepository, ProfileRepository, TenantRepository};

// Re-exports: Tenant-scoped CRM access
pub use db::{CardChanges, ContactChanges, CrmRepository, NewCard, NewContact, TenantCrm};

// Re-exports: Transaction utilities
pub use db::transaction::TransactionGuard;
