use crate::auth::audit::{self, AuthMethod};
use crate::auth::models::{
    Principal, SessionContext, TenantContext, UNAUTHENTICATED, UNPROVISIONED_TENANT,
};
use crate::auth::session::SessionVerifier;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use funil_core::api_key::hash_secret;
use funil_core::models::default_tenant_name;
use funil_core::AppError;
use funil_db::{ApiKeyRepository, ProfileRepository, TenantRepository};
use std::sync::Arc;

pub const MISSING_API_KEY: &str = "API key não fornecida";
pub const INVALID_API_KEY: &str = "API key inválida";

#[derive(Clone)]
pub struct AuthState {
    pub api_key_repository: ApiKeyRepository,
    pub profile_repository: ProfileRepository,
    pub tenant_repository: TenantRepository,
    pub session_verifier: SessionVerifier,
}

/// Token of an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn unauthorized(method: AuthMethod, path: &str, message: &str) -> Response {
    audit::log_authentication_failure(method, path, message);
    HttpAppError(AppError::Unauthorized(message.to_string())).into_response()
}

/// Authenticate `/api/v1` requests with a tenant API key.
///
/// Unknown and revoked keys get the same answer. On success the key's
/// last-used timestamp is recorded in a detached task.
pub async fn api_key_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let key_hash = match bearer_token(request.headers()) {
        Some(secret) => hash_secret(secret),
        None => return unauthorized(AuthMethod::ApiKey, &path, MISSING_API_KEY),
    };

    let api_key = match auth_state
        .api_key_repository
        .get_active_by_hash(&key_hash)
        .await
    {
        Ok(Some(api_key)) => api_key,
        Ok(None) => return unauthorized(AuthMethod::ApiKey, &path, INVALID_API_KEY),
        Err(e) => return HttpAppError(e).into_response(),
    };

    let api_key_repo = auth_state.api_key_repository.clone();
    let key_id = api_key.id;
    tokio::spawn(async move {
        if let Err(e) = api_key_repo.update_last_used(key_id).await {
            tracing::warn!(error = %e, api_key_id = %key_id, "Failed to record API key usage");
        }
    });

    audit::log_authentication_success(
        AuthMethod::ApiKey,
        Some(api_key.tenant_id),
        None,
        Some((api_key.id, &api_key.key_prefix)),
    );

    request.extensions_mut().insert(TenantContext {
        tenant_id: api_key.tenant_id,
        principal: Principal::ApiKey { key_id: api_key.id },
    });
    next.run(request).await
}

/// Authenticate session requests with a provider-issued JWT and upsert the
/// caller's profile.
pub async fn session_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let claims = match bearer_token(request.headers())
        .map(|token| auth_state.session_verifier.verify(token))
    {
        Some(Ok(claims)) => claims,
        _ => return unauthorized(AuthMethod::Session, &path, UNAUTHENTICATED),
    };

    let profile = match auth_state
        .profile_repository
        .upsert_from_identity(claims.sub, &claims.email, claims.full_name())
        .await
    {
        Ok(profile) => profile,
        Err(e) => return HttpAppError(e).into_response(),
    };

    request.extensions_mut().insert(SessionContext { profile });
    next.run(request).await
}

/// Resolve the session user's tenant, provisioning one on the first write.
///
/// Safe methods from a user without a tenant run against [`UNPROVISIONED_TENANT`].
///
/// Must run inside [`session_middleware`].
pub async fn session_tenant_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(session) = request.extensions().get::<SessionContext>().cloned() else {
        let path = request.uri().path().to_string();
        return unauthorized(AuthMethod::Session, &path, UNAUTHENTICATED);
    };
    let profile = session.profile;

    let tenant_id = match profile.tenant_id {
        Some(tenant_id) => tenant_id,
        None if request.method().is_safe() => UNPROVISIONED_TENANT,
        None => {
            let name = default_tenant_name(profile.full_name.as_deref(), &profile.email);
            match auth_state
                .tenant_repository
                .provision_for_profile(profile.id, &name)
                .await
            {
                Ok(tenant_id) => {
                    audit::log_tenant_provisioned(tenant_id, profile.id);
                    tenant_id
                }
                Err(e) => return HttpAppError(e).into_response(),
            }
        }
    };

    audit::log_authentication_success(AuthMethod::Session, Some(tenant_id), Some(profile.id), None);

    request.extensions_mut().insert(TenantContext {
        tenant_id,
        principal: Principal::User {
            user_id: profile.id,
            role: profile.role,
        },
    });
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer fbn_abc")), Some("fbn_abc"));
        assert_eq!(bearer_token(&headers("Bearer   fbn_abc ")), Some("fbn_abc"));
        assert_eq!(bearer_token(&headers("Basic Zm9vOmJhcg==")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
