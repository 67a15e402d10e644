//! Stage (kanban column) handlers

use super::{check_color, not_found, require_board, required_name, STAGE_NOT_FOUND};
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
    CreateStageRequest, NormalizeStageResponse, StageListResponse, StageResponse,
    SuccessResponse, UpdateStageRequest,
};
use std::sync::Arc;
use uuid::Uuid;

const NAME_REQUIRED: &str = "name é obrigatório";

#[utoipa::path(
    get,
    path = "/api/boards/{board_id}/stages",
    params(("board_id" = Uuid, Path, description = "Board ID")),
    responses(
        (status = 200, description = "Stages of the board, left to right", body = StageListResponse),
        (status = 404, description = "Board not found", body = ErrorResponse)
    ),
    tag = "stages",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(tenant_id = %ctx.tenant_id))]
pub async fn list_stages(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path(board_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let crm = state.db.crm.for_tenant(ctx.tenant_id);
    require_board(&crm, board_id).await?;

    let stages = crm.list_stages(board_id).await?;
    Ok(Json(StageListResponse { stages }))
}

/// Append a stage to the right end of the board
#[utoipa::path(
    post,
    path = "/api/boards/{board_id}/stages",
    params(("board_id" = Uuid, Path, description = "Board ID")),
    request_body = CreateStageRequest,
    responses(
        (status = 201, description = "Stage created", body = StageResponse),
        (status = 400, description = "Missing name or invalid color", body = ErrorResponse),
        (status = 404, description = "Board not found", body = ErrorResponse)
    ),
    tag = "stages",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(tenant_id = %ctx.tenant_id))]
pub async fn create_stage(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path(board_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<CreateStageRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let name = required_name("name", request.name, NAME_REQUIRED)?;
    let color = clean_text(request.color);
    if let Some(color) = &color {
        check_color(color)?;
    }

    let crm = state.db.crm.for_tenant(ctx.tenant_id);
    require_board(&crm, board_id).await?;

    let stage = crm
        .create_stage(board_id, &name, color.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(StageResponse { stage })))
}

/// Rename, recolor or reposition a stage
#[utoipa::path(
    patch,
    path = "/api/boards/{board_id}/stages/{stage_id}",
    params(
        ("board_id" = Uuid, Path, description = "Board ID"),
        ("stage_id" = Uuid, Path, description = "Stage ID")
    ),
    request_body = UpdateStageRequest,
    responses(
        (status = 200, description = "Stage updated", body = StageResponse),
        (status = 400, description = "Blank name or invalid color", body = ErrorResponse),
        (status = 404, description = "Board or stage not found", body = ErrorResponse)
    ),
    tag = "stages",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(tenant_id = %ctx.tenant_id))]
pub async fn update_stage(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path((board_id, stage_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(request): ValidatedJson<UpdateStageRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let name = match request.name {
        Some(name) => Some(required_name("name", Some(name), NAME_REQUIRED)?),
        None => None,
    };
    let color = request.color.map(clean_text);
    if let Some(Some(color)) = &color {
        check_color(color)?;
    }

    let crm = state.db.crm.for_tenant(ctx.tenant_id);
    require_board(&crm, board_id).await?;

    let stage = crm
        .update_stage(
            board_id,
            stage_id,
            name.as_deref(),
            color.as_ref().map(|c| c.as_deref()),
            request.position,
        )
        .await?
        .ok_or_else(|| not_found(STAGE_NOT_FOUND))?;

    Ok(Json(StageResponse { stage }))
}

/// Delete a stage together with its cards
#[utoipa::path(
    delete,
    path = "/api/boards/{board_id}/stages/{stage_id}",
    params(
        ("board_id" = Uuid, Path, description = "Board ID"),
        ("stage_id" = Uuid, Path, description = "Stage ID")
    ),
    responses(
        (status = 200, description = "Stage deleted", body = SuccessResponse),
        (status = 404, description = "Board or stage not found", body = ErrorResponse)
    ),
    tag = "stages",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(tenant_id = %ctx.tenant_id))]
pub async fn delete_stage(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path((board_id, stage_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, HttpAppError> {
    let crm = state.db.crm.for_tenant(ctx.tenant_id);
    require_board(&crm, board_id).await?;

    if !crm.delete_stage(board_id, stage_id).await? {
        return Err(not_found(STAGE_NOT_FOUND));
    }

    tracing::info!(stage_id = %stage_id, "Stage deleted");
    Ok(Json(SuccessResponse::ok()))
}

/// Renumber the stage's cards to consecutive positions starting at 0
#[utoipa::path(
    post,
    path = "/api/boards/{board_id}/stages/{stage_id}/normalize",
    params(
        ("board_id" = Uuid, Path, description = "Board ID"),
        ("stage_id" = Uuid, Path, description = "Stage ID")
    ),
    responses(
        (status = 200, description = "Cards of the stage in read order", body = NormalizeStageResponse),
        (status = 404, description = "Board or stage not found", body = ErrorResponse)
    ),
    tag = "stages",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(tenant_id = %ctx.tenant_id))]
pub async fn normalize_stage(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path((board_id, stage_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, HttpAppError> {
    let crm = state.db.crm.for_tenant(ctx.tenant_id);
    require_board(&crm, board_id).await?;

    let cards = crm
        .normalize_stage(board_id, stage_id)
        .await?
        .ok_or_else(|| not_found(STAGE_NOT_FOUND))?;

    Ok(Json(NormalizeStageResponse { cards }))
}
