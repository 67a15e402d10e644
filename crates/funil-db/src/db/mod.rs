//! Database repositories for data access layer
//!
//! Repositories are organized into control/ (tenants, profiles, plans, API
//! keys, platform stats) and crm/ (everything owned by a tenant). CRM tables
//! are only reachable through [`crm::TenantCrm`], which binds the tenant id
//! into every query.
//
// Control plane repositories
pub mod control;
//
// Tenant-scoped CRM repositories
pub mod crm;
//
// Transaction utilities
pub mod transaction;

pub use control::{
    AdminRepository, ApiKeyRepository, PlanRepository, ProfileRepository, TenantRepository,
};
pub use crm::{CardChanges, ContactChanges, CrmRepository, NewCard, NewContact, TenantCrm};
