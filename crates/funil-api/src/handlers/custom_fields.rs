//! Contact custom field definitions

use super::{not_found, required_name};
use crate::auth::TenantContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use funil_core::models::{
    CreateCustomFieldRequest, CustomFieldListResponse, CustomFieldResponse, SuccessResponse,
};
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/custom-fields",
    responses(
        (status = 200, description = "Field definitions ordered by name", body = CustomFieldListResponse)
    ),
    tag = "custom-fields",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(tenant_id = %ctx.tenant_id))]
pub async fn list_custom_fields(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let custom_fields = state
        .db
        .crm
        .for_tenant(ctx.tenant_id)
        .list_custom_fields()
        .await?;
    Ok(Json(CustomFieldListResponse { custom_fields }))
}

#[utoipa::path(
    post,
    path = "/api/custom-fields",
    request_body = CreateCustomFieldRequest,
    responses(
        (status = 201, description = "Field created", body = CustomFieldResponse),
        (status = 400, description = "Missing name or unknown type", body = ErrorResponse)
    ),
    tag = "custom-fields",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(tenant_id = %ctx.tenant_id))]
pub async fn create_custom_field(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    ValidatedJson(request): ValidatedJson<CreateCustomFieldRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let name = required_name("name", request.name, "name é obrigatório")?;

    let custom_field = state
        .db
        .crm
        .for_tenant(ctx.tenant_id)
        .create_custom_field(&name, request.field_type)
        .await?;

    Ok((StatusCode::CREATED, Json(CustomFieldResponse { custom_field })))
}

#[utoipa::path(
    delete,
    path = "/api/custom-fields/{field_id}",
    params(("field_id" = Uuid, Path, description = "Custom field ID")),
    responses(
        (status = 200, description = "Field and its values deleted", body = SuccessResponse),
        (status = 404, description = "Field not found", body = ErrorResponse)
    ),
    tag = "custom-fields",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(tenant_id = %ctx.tenant_id))]
pub async fn delete_custom_field(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path(field_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let deleted = state
        .db
        .crm
        .for_tenant(ctx.tenant_id)
        .delete_custom_field(field_id)
        .await?;

    if !deleted {
        return Err(not_found("Campo não encontrado"));
    }

    Ok(Json(SuccessResponse::ok()))
}
