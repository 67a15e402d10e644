//! Tenant-scoped CRM repositories.
//!
//! Every query on boards, stages, cards, contacts, tags and custom fields is
//! a method of [`TenantCrm`], which carries the authenticated tenant id and
//! binds it into each statement. Rows of another tenant are indistinguishable
//! from missing rows.

mod board;
mod card;
mod contact;
mod custom_field;
mod dashboard;
mod stage;
mod tag;

pub use card::{CardChanges, NewCard};
pub use contact::{ContactChanges, NewContact};

use sqlx::PgPool;
use uuid::Uuid;

/// Entry point to the CRM tables
#[derive(Clone)]
pub struct CrmRepository {
    pool: PgPool,
}

impl CrmRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Scope all CRM access to one tenant
    pub fn for_tenant(&self, tenant_id: Uuid) -> TenantCrm {
        TenantCrm {
            pool: self.pool.clone(),
            tenant_id,
        }
    }
}

/// CRM access bound to a single tenant
#[derive(Clone)]
pub struct TenantCrm {
    pool: PgPool,
    tenant_id: Uuid,
}

impl TenantCrm {
    pub fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }
}

impl std::fmt::Debug for TenantCrm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantCrm")
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}
