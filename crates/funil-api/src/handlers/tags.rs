//! Tag handlers

use super::{check_color, not_found, required_name};
use crate::auth::TenantContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use funil_core::models::patch::clean_text;
use funil_core::models::{
    CreateTagRequest, SuccessResponse, TagListResponse, TagResponse, UpdateTagRequest,
    DEFAULT_TAG_COLOR,
};
use std::sync::Arc;
use uuid::Uuid;

const NAME_REQUIRED: &str = "name é obrigatório";
const TAG_NOT_FOUND: &str = "Tag não encontrada";

#[utoipa::path(
    get,
    path = "/api/tags",
    responses(
        (status = 200, description = "Tags ordered by name", body = TagListResponse)
    ),
    tag = "tags",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(tenant_id = %ctx.tenant_id))]
pub async fn list_tags(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let tags = state.db.crm.for_tenant(ctx.tenant_id).list_tags().await?;
    Ok(Json(TagListResponse { tags }))
}

#[utoipa::path(
    post,
    path = "/api/tags",
    request_body = CreateTagRequest,
    responses(
        (status = 201, description = "Tag created", body = TagResponse),
        (status = 400, description = "Missing name or invalid color", body = ErrorResponse),
        (status = 409, description = "Name already used", body = ErrorResponse)
    ),
    tag = "tags",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(tenant_id = %ctx.tenant_id))]
pub async fn create_tag(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    ValidatedJson(request): ValidatedJson<CreateTagRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let name = required_name("name", request.name, NAME_REQUIRED)?;
    let color = clean_text(request.color).unwrap_or_else(|| DEFAULT_TAG_COLOR.to_string());
    check_color(&color)?;

    let tag = state
        .db
        .crm
        .for_tenant(ctx.tenant_id)
        .create_tag(&name, &color)
        .await?;

    Ok((StatusCode::CREATED, Json(TagResponse { tag })))
}

#[utoipa::path(
    patch,
    path = "/api/tags/{tag_id}",
    params(("tag_id" = Uuid, Path, description = "Tag ID")),
    request_body = UpdateTagRequest,
    responses(
        (status = 200, description = "Tag updated", body = TagResponse),
        (status = 404, description = "Tag not found", body = ErrorResponse),
        (status = 409, description = "Name already used", body = ErrorResponse)
    ),
    tag = "tags",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(tenant_id = %ctx.tenant_id))]
pub async fn update_tag(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path(tag_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateTagRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let name = match request.name {
        Some(name) => Some(required_name("name", Some(name), NAME_REQUIRED)?),
        None => None,
    };
    let color = clean_text(request.color);
    if let Some(color) = &color {
        check_color(color)?;
    }

    let tag = state
        .db
        .crm
        .for_tenant(ctx.tenant_id)
        .update_tag(tag_id, name.as_deref(), color.as_deref())
        .await?
        .ok_or_else(|| not_found(TAG_NOT_FOUND))?;

    Ok(Json(TagResponse { tag }))
}

#[utoipa::path(
    delete,
    path = "/api/tags/{tag_id}",
    params(("tag_id" = Uuid, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Tag deleted", body = SuccessResponse),
        (status = 404, description = "Tag not found", body = ErrorResponse)
    ),
    tag = "tags",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(tenant_id = %ctx.tenant_id))]
pub async fn delete_tag(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path(tag_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    if !state
        .db
        .crm
        .for_tenant(ctx.tenant_id)
        .delete_tag(tag_id)
        .await?
    {
        return Err(not_found(TAG_NOT_FOUND));
    }

    Ok(Json(SuccessResponse::ok()))
}
