//! API key management for the session user's tenant

use super::{not_found, required_name};
use crate::auth::audit;
use crate::auth::TenantContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use funil_core::models::{
    ApiKeyListResponse, CreateApiKeyRequest, CreateApiKeyResponse, SuccessResponse,
};
use funil_core::IssuedKey;
use std::sync::Arc;
use uuid::Uuid;

const API_KEY_NOT_FOUND: &str = "API key não encontrada";

/// Active keys of the tenant, newest first. Secrets are never listed.
#[utoipa::path(
    get,
    path = "/api/api-keys",
    responses(
        (status = 200, description = "Active API keys", body = ApiKeyListResponse)
    ),
    tag = "api-keys",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(tenant_id = %ctx.tenant_id))]
pub async fn list_api_keys(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let api_keys = state
        .db
        .api_key_repository
        .list_active(ctx.tenant_id)
        .await?;
    Ok(Json(ApiKeyListResponse { api_keys }))
}

/// Issue a key. The secret is returned in this response only.
#[utoipa::path(
    post,
    path = "/api/api-keys",
    request_body = CreateApiKeyRequest,
    responses(
        (status = 201, description = "API key issued", body = CreateApiKeyResponse),
        (status = 400, description = "Missing name", body = ErrorResponse)
    ),
    tag = "api-keys",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(tenant_id = %ctx.tenant_id))]
pub async fn create_api_key(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    ValidatedJson(request): ValidatedJson<CreateApiKeyRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let name = required_name("name", request.name, "name é obrigatório")?;

    let issued = IssuedKey::generate();
    let api_key = state
        .db
        .api_key_repository
        .create_api_key(
            ctx.tenant_id,
            &name,
            ctx.user_id(),
            &issued.hash,
            &issued.prefix,
        )
        .await?;

    audit::log_api_key_created(ctx.tenant_id, ctx.user_id(), api_key.id, &api_key.key_prefix);

    Ok((
        StatusCode::CREATED,
        Json(CreateApiKeyResponse {
            id: api_key.id,
            api_key: issued.secret,
            name: api_key.name,
            key_prefix: api_key.key_prefix,
            created_at: api_key.created_at,
        }),
    ))
}

/// Revoke a key. Revoking an already revoked key succeeds again.
#[utoipa::path(
    delete,
    path = "/api/api-keys/{key_id}",
    params(("key_id" = Uuid, Path, description = "API key ID")),
    responses(
        (status = 200, description = "API key revoked", body = SuccessResponse),
        (status = 404, description = "API key not found", body = ErrorResponse)
    ),
    tag = "api-keys",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(tenant_id = %ctx.tenant_id))]
pub async fn revoke_api_key(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path(key_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let api_key = state
        .db
        .api_key_repository
        .revoke_api_key(ctx.tenant_id, key_id)
        .await?
        .ok_or_else(|| not_found(API_KEY_NOT_FOUND))?;

    audit::log_api_key_revoked(ctx.tenant_id, ctx.user_id(), api_key.id, &api_key.key_prefix);

    Ok(Json(SuccessResponse::ok()))
}
