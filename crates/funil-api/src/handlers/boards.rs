//! Board handlers

use super::{not_found, required_name, BOARD_NOT_FOUND};
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
    BoardDetailResponse, BoardListResponse, BoardResponse, CreateBoardRequest, SuccessResponse,
    UpdateBoardRequest,
};
use std::sync::Arc;
use uuid::Uuid;

const NAME_REQUIRED: &str = "name é obrigatório";

/// List the tenant's boards, newest first
#[utoipa::path(
    get,
    path = "/api/v1/boards",
    responses(
        (status = 200, description = "Boards of the tenant", body = BoardListResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse)
    ),
    tag = "boards",
    security(("api_key" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(tenant_id = %ctx.tenant_id))]
pub async fn list_boards(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let boards = state.db.crm.for_tenant(ctx.tenant_id).list_boards().await?;
    Ok(Json(BoardListResponse { boards }))
}

/// Create a board with the default stages
#[utoipa::path(
    post,
    path = "/api/v1/boards",
    request_body = CreateBoardRequest,
    responses(
        (status = 201, description = "Board created", body = BoardResponse),
        (status = 400, description = "Missing name", body = ErrorResponse)
    ),
    tag = "boards",
    security(("api_key" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(tenant_id = %ctx.tenant_id))]
pub async fn create_board(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    ValidatedJson(request): ValidatedJson<CreateBoardRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let name = required_name("name", request.name, NAME_REQUIRED)?;
    let description = clean_text(request.description);

    let board = state
        .db
        .crm
        .for_tenant(ctx.tenant_id)
        .create_board(&name, description.as_deref(), ctx.user_id())
        .await?;

    Ok((StatusCode::CREATED, Json(BoardResponse { board })))
}

/// Board with its stages and cards
#[utoipa::path(
    get,
    path = "/api/v1/boards/{board_id}",
    params(("board_id" = Uuid, Path, description = "Board ID")),
    responses(
        (status = 200, description = "Board detail", body = BoardDetailResponse),
        (status = 404, description = "Board not found", body = ErrorResponse)
    ),
    tag = "boards",
    security(("api_key" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(tenant_id = %ctx.tenant_id))]
pub async fn get_board(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path(board_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let board = state
        .db
        .crm
        .for_tenant(ctx.tenant_id)
        .board_detail(board_id)
        .await?
        .ok_or_else(|| not_found(BOARD_NOT_FOUND))?;

    Ok(Json(BoardDetailResponse { board }))
}

#[utoipa::path(
    patch,
    path = "/api/v1/boards/{board_id}",
    params(("board_id" = Uuid, Path, description = "Board ID")),
    request_body = UpdateBoardRequest,
    responses(
        (status = 200, description = "Board updated", body = BoardResponse),
        (status = 400, description = "Blank name", body = ErrorResponse),
        (status = 404, description = "Board not found", body = ErrorResponse)
    ),
    tag = "boards",
    security(("api_key" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(tenant_id = %ctx.tenant_id))]
pub async fn update_board(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path(board_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateBoardRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let name = match request.name {
        Some(name) => Some(required_name("name", Some(name), NAME_REQUIRED)?),
        None => None,
    };
    let description = request.description.map(clean_text);

    let board = state
        .db
        .crm
        .for_tenant(ctx.tenant_id)
        .update_board(
            board_id,
            name.as_deref(),
            description.as_ref().map(|d| d.as_deref()),
        )
        .await?
        .ok_or_else(|| not_found(BOARD_NOT_FOUND))?;

    Ok(Json(BoardResponse { board }))
}

/// Delete a board with its stages and cards
#[utoipa::path(
    delete,
    path = "/api/v1/boards/{board_id}",
    params(("board_id" = Uuid, Path, description = "Board ID")),
    responses(
        (status = 200, description = "Board deleted", body = SuccessResponse),
        (status = 404, description = "Board not found", body = ErrorResponse)
    ),
    tag = "boards",
    security(("api_key" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(tenant_id = %ctx.tenant_id))]
pub async fn delete_board(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path(board_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let deleted = state
        .db
        .crm
        .for_tenant(ctx.tenant_id)
        .delete_board(board_id)
        .await?;

    if !deleted {
        return Err(not_found(BOARD_NOT_FOUND));
    }

    tracing::info!(board_id = %board_id, "Board deleted");
    Ok(Json(SuccessResponse::ok()))
}
