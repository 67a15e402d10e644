//! Request authentication and tenant resolution
//!
//! Two credentials lead to a [`models::TenantContext`]:
//! tenant API keys on `/api/v1` and identity-provider session tokens on `/api`.

pub mod audit;
pub mod middleware;
pub mod models;
pub mod session;

pub use middleware::{
    api_key_middleware, session_middleware, session_tenant_middleware, AuthState,
};
pub use models::{Principal, SessionContext, SuperAdmin, TenantContext};
