//! Super-admin handlers: client organizations, plans and platform stats
//!
//! Every handler takes the [`SuperAdmin`] extractor, which answers 403 for
//! any other session user.

use super::{bad_request, check_request, not_found};
use crate::auth::SuperAdmin;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use funil_core::models::{
    AdminStats, ClientListResponse, ClientResponse, CreatePlanRequest, CreateTenantRequest,
    PlanListResponse, PlanResponse, SuccessResponse, UpdatePlanRequest, UpdateTenantRequest,
};
use std::sync::Arc;
use uuid::Uuid;

const CLIENT_NOT_FOUND: &str = "Cliente não encontrado";
const PLAN_NOT_FOUND: &str = "Plano não encontrado";

#[utoipa::path(
    get,
    path = "/api/admin/clients",
    responses(
        (status = 200, description = "All client organizations", body = ClientListResponse),
        (status = 403, description = "Not a super-admin", body = ErrorResponse)
    ),
    tag = "admin",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, admin), fields(admin_id = %admin.0.id))]
pub async fn list_clients(
    State(state): State<Arc<AppState>>,
    admin: SuperAdmin,
) -> Result<impl IntoResponse, HttpAppError> {
    let clients = state.db.tenant_repository.list_tenants().await?;
    Ok(Json(ClientListResponse { clients }))
}

#[utoipa::path(
    post,
    path = "/api/admin/clients",
    request_body = CreateTenantRequest,
    responses(
        (status = 201, description = "Client created", body = ClientResponse),
        (status = 400, description = "Invalid client", body = ErrorResponse),
        (status = 403, description = "Not a super-admin", body = ErrorResponse)
    ),
    tag = "admin",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, admin, request), fields(admin_id = %admin.0.id))]
pub async fn create_client(
    State(state): State<Arc<AppState>>,
    admin: SuperAdmin,
    ValidatedJson(request): ValidatedJson<CreateTenantRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    check_request(&request)?;

    let client = state.db.tenant_repository.create_tenant(&request).await?;
    tracing::info!(tenant_id = %client.id, "Client created by super-admin");

    Ok((StatusCode::CREATED, Json(ClientResponse { client })))
}

#[utoipa::path(
    patch,
    path = "/api/admin/clients/{client_id}",
    params(("client_id" = Uuid, Path, description = "Tenant ID")),
    request_body = UpdateTenantRequest,
    responses(
        (status = 200, description = "Client updated", body = ClientResponse),
        (status = 403, description = "Not a super-admin", body = ErrorResponse),
        (status = 404, description = "Client not found", body = ErrorResponse)
    ),
    tag = "admin",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, admin, request), fields(admin_id = %admin.0.id))]
pub async fn update_client(
    State(state): State<Arc<AppState>>,
    admin: SuperAdmin,
    Path(client_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateTenantRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    check_request(&request)?;

    let client = state
        .db
        .tenant_repository
        .update_tenant(client_id, &request)
        .await?
        .ok_or_else(|| not_found(CLIENT_NOT_FOUND))?;

    Ok(Json(ClientResponse { client }))
}

/// Delete a client organization with all of its data
#[utoipa::path(
    delete,
    path = "/api/admin/clients/{client_id}",
    params(("client_id" = Uuid, Path, description = "Tenant ID")),
    responses(
        (status = 200, description = "Client deleted", body = SuccessResponse),
        (status = 403, description = "Not a super-admin", body = ErrorResponse),
        (status = 404, description = "Client not found", body = ErrorResponse)
    ),
    tag = "admin",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, admin), fields(admin_id = %admin.0.id))]
pub async fn delete_client(
    State(state): State<Arc<AppState>>,
    admin: SuperAdmin,
    Path(client_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    if !state.db.tenant_repository.delete_tenant(client_id).await? {
        return Err(not_found(CLIENT_NOT_FOUND));
    }

    tracing::warn!(tenant_id = %client_id, "Client deleted by super-admin");
    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    get,
    path = "/api/admin/plans",
    responses(
        (status = 200, description = "All plans", body = PlanListResponse),
        (status = 403, description = "Not a super-admin", body = ErrorResponse)
    ),
    tag = "admin",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, admin), fields(admin_id = %admin.0.id))]
pub async fn list_plans(
    State(state): State<Arc<AppState>>,
    admin: SuperAdmin,
) -> Result<impl IntoResponse, HttpAppError> {
    let plans = state.db.plan_repository.list_plans().await?;
    Ok(Json(PlanListResponse { plans }))
}

#[utoipa::path(
    post,
    path = "/api/admin/plans",
    request_body = CreatePlanRequest,
    responses(
        (status = 201, description = "Plan created", body = PlanResponse),
        (status = 400, description = "Invalid plan", body = ErrorResponse),
        (status = 403, description = "Not a super-admin", body = ErrorResponse)
    ),
    tag = "admin",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, admin, request), fields(admin_id = %admin.0.id))]
pub async fn create_plan(
    State(state): State<Arc<AppState>>,
    admin: SuperAdmin,
    ValidatedJson(request): ValidatedJson<CreatePlanRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    check_request(&request)?;
    request.check_price().map_err(bad_request)?;

    let plan = state.db.plan_repository.create_plan(&request).await?;
    Ok((StatusCode::CREATED, Json(PlanResponse { plan })))
}

#[utoipa::path(
    patch,
    path = "/api/admin/plans/{plan_id}",
    params(("plan_id" = Uuid, Path, description = "Plan ID")),
    request_body = UpdatePlanRequest,
    responses(
        (status = 200, description = "Plan updated", body = PlanResponse),
        (status = 400, description = "Invalid plan", body = ErrorResponse),
        (status = 403, description = "Not a super-admin", body = ErrorResponse),
        (status = 404, description = "Plan not found", body = ErrorResponse)
    ),
    tag = "admin",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, admin, request), fields(admin_id = %admin.0.id))]
pub async fn update_plan(
    State(state): State<Arc<AppState>>,
    admin: SuperAdmin,
    Path(plan_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdatePlanRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    check_request(&request)?;
    request.check_price().map_err(bad_request)?;

    let plan = state
        .db
        .plan_repository
        .update_plan(plan_id, &request)
        .await?
        .ok_or_else(|| not_found(PLAN_NOT_FOUND))?;

    Ok(Json(PlanResponse { plan }))
}

/// Delete a plan; tenants on it become unlimited
#[utoipa::path(
    delete,
    path = "/api/admin/plans/{plan_id}",
    params(("plan_id" = Uuid, Path, description = "Plan ID")),
    responses(
        (status = 200, description = "Plan deleted", body = SuccessResponse),
        (status = 403, description = "Not a super-admin", body = ErrorResponse),
        (status = 404, description = "Plan not found", body = ErrorResponse)
    ),
    tag = "admin",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, admin), fields(admin_id = %admin.0.id))]
pub async fn delete_plan(
    State(state): State<Arc<AppState>>,
    admin: SuperAdmin,
    Path(plan_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    if !state.db.plan_repository.delete_plan(plan_id).await? {
        return Err(not_found(PLAN_NOT_FOUND));
    }

    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Platform-wide counters", body = AdminStats),
        (status = 403, description = "Not a super-admin", body = ErrorResponse)
    ),
    tag = "admin",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, admin), fields(admin_id = %admin.0.id))]
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    admin: SuperAdmin,
) -> Result<impl IntoResponse, HttpAppError> {
    let stats = state.db.admin_repository.stats().await?;
    Ok(Json(stats))
}
