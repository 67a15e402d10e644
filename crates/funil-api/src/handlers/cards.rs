//! Card (lead) handlers, including drag-and-drop moves

use super::{bad_request, not_found, require_board, CARD_NOT_FOUND, STAGE_NOT_FOUND};
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
    CardListResponse, CardResponse, CreateCardRequest, MoveCardRequest, SetCardTagsRequest,
    SuccessResponse, TagListResponse, UpdateCardRequest, DEFAULT_CARD_STATUS,
};
use funil_core::validation::validate_name;
use funil_core::DropTarget;
use funil_db::{CardChanges, NewCard};
use std::sync::Arc;
use uuid::Uuid;

const STAGE_AND_TITLE_REQUIRED: &str = "stageId e title são obrigatórios";

fn checked_title(title: &str) -> Result<(), HttpAppError> {
    validate_name("title", title).map_err(|e| bad_request(e.to_string()))
}

/// Cards of a board with their stage, newest first
#[utoipa::path(
    get,
    path = "/api/v1/boards/{board_id}/cards",
    params(("board_id" = Uuid, Path, description = "Board ID")),
    responses(
        (status = 200, description = "Cards of the board", body = CardListResponse),
        (status = 404, description = "Board not found", body = ErrorResponse)
    ),
    tag = "cards",
    security(("api_key" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(tenant_id = %ctx.tenant_id))]
pub async fn list_cards(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path(board_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let crm = state.db.crm.for_tenant(ctx.tenant_id);
    require_board(&crm, board_id).await?;

    let cards = crm.list_cards(board_id).await?;
    Ok(Json(CardListResponse { cards }))
}

/// Create a card at the end of a stage
#[utoipa::path(
    post,
    path = "/api/v1/boards/{board_id}/cards",
    params(("board_id" = Uuid, Path, description = "Board ID")),
    request_body = CreateCardRequest,
    responses(
        (status = 201, description = "Card created", body = CardResponse),
        (status = 400, description = "Missing stageId or title", body = ErrorResponse),
        (status = 404, description = "Board or stage not found", body = ErrorResponse)
    ),
    tag = "cards",
    security(("api_key" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(tenant_id = %ctx.tenant_id))]
pub async fn create_card(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path(board_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<CreateCardRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let (Some(stage_id), Some(title)) = (request.stage_id, clean_text(request.title)) else {
        return Err(bad_request(STAGE_AND_TITLE_REQUIRED));
    };
    checked_title(&title)?;

    let crm = state.db.crm.for_tenant(ctx.tenant_id);
    require_board(&crm, board_id).await?;

    let stage = crm
        .get_stage(board_id, stage_id)
        .await?
        .ok_or_else(|| not_found(STAGE_NOT_FOUND))?;

    let card = NewCard {
        title,
        description: clean_text(request.description),
        email: clean_text(request.email),
        phone: clean_text(request.phone),
        status: clean_text(request.status).unwrap_or_else(|| DEFAULT_CARD_STATUS.to_string()),
        contact_id: request.contact_id,
    };

    let card = crm.create_card(&stage, card, ctx.user_id()).await?;
    Ok((StatusCode::CREATED, Json(CardResponse { card })))
}

#[utoipa::path(
    get,
    path = "/api/v1/boards/{board_id}/cards/{card_id}",
    params(
        ("board_id" = Uuid, Path, description = "Board ID"),
        ("card_id" = Uuid, Path, description = "Card ID")
    ),
    responses(
        (status = 200, description = "Card with its stage", body = CardResponse),
        (status = 404, description = "Board or card not found", body = ErrorResponse)
    ),
    tag = "cards",
    security(("api_key" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(tenant_id = %ctx.tenant_id))]
pub async fn get_card(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path((board_id, card_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, HttpAppError> {
    let crm = state.db.crm.for_tenant(ctx.tenant_id);
    require_board(&crm, board_id).await?;

    let card = crm
        .get_card(board_id, card_id)
        .await?
        .ok_or_else(|| not_found(CARD_NOT_FOUND))?;

    Ok(Json(CardResponse { card }))
}

/// Update card fields; a different `stageId` moves the card to the end of that stage
#[utoipa::path(
    patch,
    path = "/api/v1/boards/{board_id}/cards/{card_id}",
    params(
        ("board_id" = Uuid, Path, description = "Board ID"),
        ("card_id" = Uuid, Path, description = "Card ID")
    ),
    request_body = UpdateCardRequest,
    responses(
        (status = 200, description = "Card updated", body = CardResponse),
        (status = 400, description = "Blank title", body = ErrorResponse),
        (status = 404, description = "Board, card or stage not found", body = ErrorResponse)
    ),
    tag = "cards",
    security(("api_key" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(tenant_id = %ctx.tenant_id))]
pub async fn update_card(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path((board_id, card_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(request): ValidatedJson<UpdateCardRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let crm = state.db.crm.for_tenant(ctx.tenant_id);
    require_board(&crm, board_id).await?;

    let mut card = crm
        .get_card(board_id, card_id)
        .await?
        .ok_or_else(|| not_found(CARD_NOT_FOUND))?;

    // Resolve the destination before writing anything.
    let target_stage = match request.stage_id {
        Some(stage_id) if stage_id != card.card.stage_id => {
            crm.get_stage(board_id, stage_id)
                .await?
                .ok_or_else(|| not_found(STAGE_NOT_FOUND))?;
            Some(stage_id)
        }
        _ => None,
    };

    if request.has_field_changes() {
        let title = match request.title {
            Some(title) => {
                let title = clean_text(Some(title))
                    .ok_or_else(|| bad_request("title não pode ser vazio"))?;
                checked_title(&title)?;
                Some(title)
            }
            None => None,
        };

        let changes = CardChanges {
            title,
            description: request.description.map(clean_text),
            email: request.email.map(clean_text),
            phone: request.phone.map(clean_text),
            status: clean_text(request.status),
            contact_id: request.contact_id,
        };

        card = crm
            .update_card(board_id, card_id, &changes)
            .await?
            .ok_or_else(|| not_found(CARD_NOT_FOUND))?;
    }

    if let Some(stage_id) = target_stage {
        card = crm
            .move_card(board_id, card_id, stage_id, DropTarget::Header)
            .await?;
    }

    Ok(Json(CardResponse { card }))
}

/// Drop a card on a stage header (`index` absent) or before the card at `index`
#[utoipa::path(
    post,
    path = "/api/v1/boards/{board_id}/cards/{card_id}/move",
    params(
        ("board_id" = Uuid, Path, description = "Board ID"),
        ("card_id" = Uuid, Path, description = "Card ID")
    ),
    request_body = MoveCardRequest,
    responses(
        (status = 200, description = "Card moved", body = CardResponse),
        (status = 404, description = "Board, card or stage not found", body = ErrorResponse)
    ),
    tag = "cards",
    security(("api_key" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(tenant_id = %ctx.tenant_id))]
pub async fn move_card(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path((board_id, card_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(request): ValidatedJson<MoveCardRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let crm = state.db.crm.for_tenant(ctx.tenant_id);
    require_board(&crm, board_id).await?;

    let card = crm
        .move_card(
            board_id,
            card_id,
            request.stage_id,
            DropTarget::from(request.index),
        )
        .await?;

    Ok(Json(CardResponse { card }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/boards/{board_id}/cards/{card_id}",
    params(
        ("board_id" = Uuid, Path, description = "Board ID"),
        ("card_id" = Uuid, Path, description = "Card ID")
    ),
    responses(
        (status = 200, description = "Card deleted", body = SuccessResponse),
        (status = 404, description = "Board or card not found", body = ErrorResponse)
    ),
    tag = "cards",
    security(("api_key" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(tenant_id = %ctx.tenant_id))]
pub async fn delete_card(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path((board_id, card_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, HttpAppError> {
    let crm = state.db.crm.for_tenant(ctx.tenant_id);
    require_board(&crm, board_id).await?;

    if !crm.delete_card(board_id, card_id).await? {
        return Err(not_found(CARD_NOT_FOUND));
    }

    Ok(Json(SuccessResponse::ok()))
}

/// Replace the tags of a card
#[utoipa::path(
    put,
    path = "/api/boards/{board_id}/cards/{card_id}/tags",
    params(
        ("board_id" = Uuid, Path, description = "Board ID"),
        ("card_id" = Uuid, Path, description = "Card ID")
    ),
    request_body = SetCardTagsRequest,
    responses(
        (status = 200, description = "Tags now linked to the card", body = TagListResponse),
        (status = 404, description = "Board or card not found", body = ErrorResponse)
    ),
    tag = "cards",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(tenant_id = %ctx.tenant_id))]
pub async fn set_card_tags(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path((board_id, card_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(request): ValidatedJson<SetCardTagsRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let crm = state.db.crm.for_tenant(ctx.tenant_id);
    require_board(&crm, board_id).await?;

    let tags = crm.set_card_tags(board_id, card_id, &request.tag_ids).await?;
    Ok(Json(TagListResponse { tags }))
}
