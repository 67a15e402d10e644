//! HTTP handlers
//!
//! Board and card handlers serve both `/api/v1` (API key) and `/api`
//! (session); the other modules are session-only.

pub mod admin;
pub mod api_keys;
pub mod boards;
pub mod cards;
pub mod contacts;
pub mod custom_fields;
pub mod dashboard;
pub mod profile;
pub mod stages;
pub mod tags;

use crate::error::HttpAppError;
use funil_core::models::Board;
use funil_core::validation::validate_name;
use funil_core::AppError;
use funil_db::TenantCrm;
use uuid::Uuid;
use validator::Validate;

pub(crate) const BOARD_NOT_FOUND: &str = "Quadro não encontrado";
pub(crate) const STAGE_NOT_FOUND: &str = "Etapa não encontrada";
pub(crate) const CARD_NOT_FOUND: &str = "Card não encontrado";

pub(crate) fn not_found(message: &str) -> HttpAppError {
    HttpAppError(AppError::NotFound(message.to_string()))
}

pub(crate) fn bad_request(message: impl Into<String>) -> HttpAppError {
    HttpAppError(AppError::BadRequest(message.into()))
}

/// Board of the caller's tenant, or 404
pub(crate) async fn require_board(crm: &TenantCrm, board_id: Uuid) -> Result<Board, HttpAppError> {
    crm.get_board(board_id)
        .await?
        .ok_or_else(|| not_found(BOARD_NOT_FOUND))
}

/// Trimmed, non-blank, length-checked name; `missing` is the message for an
/// absent or blank value
pub(crate) fn required_name(
    field: &str,
    value: Option<String>,
    missing: &str,
) -> Result<String, HttpAppError> {
    let name = funil_core::models::patch::clean_text(value).ok_or_else(|| bad_request(missing))?;
    validate_name(field, &name).map_err(|e| bad_request(e.to_string()))?;
    Ok(name)
}

pub(crate) fn check_color(color: &str) -> Result<(), HttpAppError> {
    funil_core::validation::validate_color(color).map_err(|e| bad_request(e.to_string()))
}

/// Run the request's `validator` rules; the first failing message becomes the 400 body
pub(crate) fn check_request<T: Validate>(request: &T) -> Result<(), HttpAppError> {
    request.validate().map_err(|errors| {
        let message = errors
            .field_errors()
            .into_values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| errors.to_string());
        HttpAppError(AppError::InvalidInput(message))
    })
}
