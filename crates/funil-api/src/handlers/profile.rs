use super::check_request;
use crate::auth::SessionContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use funil_core::models::patch::clean_text;
use funil_core::models::{ProfileResponse, UpdateProfileRequest};
use funil_core::AppError;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile of the session user", body = ProfileResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "profile",
    security(("session" = []))
)]
pub async fn get_profile(session: SessionContext) -> impl IntoResponse {
    Json(ProfileResponse {
        profile: session.profile,
    })
}

#[utoipa::path(
    patch,
    path = "/api/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Invalid name", body = ErrorResponse)
    ),
    tag = "profile",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, session, request), fields(user_id = %session.profile.id))]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    check_request(&request)?;
    let full_name = clean_text(request.full_name);

    let profile = state
        .db
        .profile_repository
        .update_full_name(session.profile.id, full_name.as_deref())
        .await?
        .ok_or_else(|| AppError::Internal("Profile vanished after upsert".to_string()))?;

    Ok(Json(ProfileResponse { profile }))
}
