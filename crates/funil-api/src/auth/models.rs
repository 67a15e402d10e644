use crate::error::HttpAppError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use funil_core::models::{Profile, UserRole};
use funil_core::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const UNAUTHENTICATED: &str = "Não autenticado";
pub const FORBIDDEN: &str = "Acesso negado";

/// Claims of a session token issued by the identity provider.
///
/// Only `sub`, `email` and `exp` are required; the display name is taken from
/// `name` or `user_metadata.full_name` when present. The role is never read
/// from the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_metadata: Option<UserMetadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
}

impl JwtClaims {
    pub fn full_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or_else(|| {
                self.user_metadata
                    .as_ref()
                    .and_then(|m| m.full_name.as_deref())
            })
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

/// Who made an authenticated request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    ApiKey { key_id: Uuid },
    User { user_id: Uuid, role: UserRole },
}

/// Tenant seen by session users that have not written anything yet. No row
/// carries it, so reads come back empty.
pub const UNPROVISIONED_TENANT: Uuid = Uuid::nil();

/// Tenant context resolved by the API-key or session middleware and stored in
/// request extensions
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub tenant_id: Uuid,
    pub principal: Principal,
}

impl TenantContext {
    /// User to record as `created_by`; API keys create anonymously
    pub fn user_id(&self) -> Option<Uuid> {
        match self.principal {
            Principal::User { user_id, .. } => Some(user_id),
            Principal::ApiKey { .. } => None,
        }
    }
}

/// Authenticated session user, present on every session route
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub profile: Profile,
}

/// Session user holding the `super_admin` role
#[derive(Debug, Clone)]
pub struct SuperAdmin(pub Profile);

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantContext>()
            .cloned()
            .ok_or_else(|| HttpAppError(AppError::Unauthorized(UNAUTHENTICATED.to_string())))
    }
}

impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionContext>()
            .cloned()
            .ok_or_else(|| HttpAppError(AppError::Unauthorized(UNAUTHENTICATED.to_string())))
    }
}

impl<S> FromRequestParts<S> for SuperAdmin
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = SessionContext::from_request_parts(parts, state).await?;
        if !session.profile.is_super_admin() {
            tracing::warn!(user_id = %session.profile.id, "Super-admin route denied");
            return Err(HttpAppError(AppError::Forbidden(FORBIDDEN.to_string())));
        }
        Ok(SuperAdmin(session.profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(json: serde_json::Value) -> JwtClaims {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_full_name_prefers_name_claim() {
        let c = claims(serde_json::json!({
            "sub": Uuid::nil(),
            "email": "ana@example.com",
            "exp": 0,
            "name": "Ana",
            "user_metadata": { "full_name": "Ana Souza" }
        }));
        assert_eq!(c.full_name(), Some("Ana"));
    }

    #[test]
    fn test_full_name_from_user_metadata() {
        let c = claims(serde_json::json!({
            "sub": Uuid::nil(),
            "email": "ana@example.com",
            "exp": 0,
            "user_metadata": { "full_name": " Ana Souza " }
        }));
        assert_eq!(c.full_name(), Some("Ana Souza"));
    }

    #[test]
    fn test_blank_name_is_ignored() {
        let c = claims(serde_json::json!({
            "sub": Uuid::nil(),
            "email": "ana@example.com",
            "exp": 0,
            "name": "  "
        }));
        assert_eq!(c.full_name(), None);
    }

    #[test]
    fn test_api_key_principal_has_no_user() {
        let ctx = TenantContext {
            tenant_id: Uuid::new_v4(),
            principal: Principal::ApiKey {
                key_id: Uuid::new_v4(),
            },
        };
        assert_eq!(ctx.user_id(), None);
    }
}
