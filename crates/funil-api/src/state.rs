//! Application state shared by all handlers.

use funil_core::Config;
use funil_db::{
    AdminRepository, ApiKeyRepository, CrmRepository, PlanRepository, ProfileRepository,
    TenantRepository,
};
use sqlx::PgPool;

/// Repositories and configuration, cloned into handlers behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: DbState,
}

/// Database repositories. All CRM access goes through [`CrmRepository::for_tenant`].
#[derive(Clone)]
pub struct DbState {
    pub pool: PgPool,
    pub api_key_repository: ApiKeyRepository,
    pub tenant_repository: TenantRepository,
    pub profile_repository: ProfileRepository,
    pub plan_repository: PlanRepository,
    pub admin_repository: AdminRepository,
    pub crm: CrmRepository,
}

impl DbState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            api_key_repository: ApiKeyRepository::new(pool.clone()),
            tenant_repository: TenantRepository::new(pool.clone()),
            profile_repository: ProfileRepository::new(pool.clone()),
            plan_repository: PlanRepository::new(pool.clone()),
            admin_repository: AdminRepository::new(pool.clone()),
            crm: CrmRepository::new(pool.clone()),
            pool,
        }
    }
}
