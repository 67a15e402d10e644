//! Dashboard handlers

use crate::auth::TenantContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};
use chrono::Utc;
use funil_core::dashboard::{recent_leads_limit, DateRange};
use funil_core::models::{DashboardQuery, DashboardStats, RecentLeadsQuery, RecentLeadsResponse};
use std::sync::Arc;

/// Lead counts, conversion rate, tag, time and custom field breakdowns for a range of days
#[utoipa::path(
    get,
    path = "/api/dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Aggregated stats", body = DashboardStats),
        (status = 400, description = "Invalid range", body = ErrorResponse)
    ),
    tag = "dashboard",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(tenant_id = %ctx.tenant_id))]
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Query(query): Query<DashboardQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let range = DateRange::resolve(
        &query,
        Utc::now().date_naive(),
        state.config.dashboard_default_days(),
    )?;

    let stats = state
        .db
        .crm
        .for_tenant(ctx.tenant_id)
        .dashboard_stats(&range)
        .await?;

    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/recent-leads",
    params(RecentLeadsQuery),
    responses(
        (status = 200, description = "Newest cards with their stage", body = RecentLeadsResponse)
    ),
    tag = "dashboard",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(tenant_id = %ctx.tenant_id))]
pub async fn recent_leads(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Query(query): Query<RecentLeadsQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let leads = state
        .db
        .crm
        .for_tenant(ctx.tenant_id)
        .recent_leads(recent_leads_limit(query.limit))
        .await?;

    Ok(Json(RecentLeadsResponse { leads }))
}
