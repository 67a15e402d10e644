//! Route configuration and setup.
//!
//! Domain route groups live in [domains](domains); health checks in [health](health).
//!
//! Three authenticated groups share the handlers:
//! - `/api/v1` boards and cards, behind tenant API keys
//! - `/api` tenant routes, behind a session that resolves (or provisions) the tenant
//! - `/api` profile and admin routes, behind a session only

mod domains;
mod health;

use crate::auth::session::SessionVerifier;
use crate::auth::{api_key_middleware, session_middleware, session_tenant_middleware, AuthState};
use crate::constants::{API_BASE, API_PREFIX};
use crate::state::AppState;
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use funil_core::Config;
use funil_infra::{request_id_middleware, security_headers_middleware};
use std::sync::Arc;
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

const DEFAULT_CONCURRENCY_LIMIT: usize = 1_000;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(setup_auth_state(config, &state));

    let api_key_routes = domains::board_routes(API_PREFIX)
        .route_layer(from_fn_with_state(auth_state.clone(), api_key_middleware));

    // The last layer runs first: the session is verified before the tenant is resolved.
    let tenant_routes = Router::new()
        .merge(domains::board_routes(API_BASE))
        .merge(domains::stage_routes(API_BASE))
        .merge(domains::tag_routes(API_BASE))
        .merge(domains::contact_routes(API_BASE))
        .merge(domains::api_key_routes(API_BASE))
        .merge(domains::dashboard_routes(API_BASE))
        .route_layer(from_fn_with_state(auth_state.clone(), session_tenant_middleware))
        .route_layer(from_fn_with_state(auth_state.clone(), session_middleware));

    let account_routes = domains::account_routes(API_BASE)
        .route_layer(from_fn_with_state(auth_state, session_middleware));

    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_CONCURRENCY_LIMIT)
        .max(1);
    tracing::info!(
        http_concurrency_limit,
        request_timeout_secs = config.request_timeout_secs(),
        max_body_bytes = config.max_body_bytes(),
        "HTTP limits configured"
    );

    let app = public_routes()
        .merge(api_key_routes)
        .merge(tenant_routes)
        .merge(account_routes)
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs(),
        )))
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let headers = [header::AUTHORIZATION, header::CONTENT_TYPE];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(headers)
    };
    Ok(cors)
}

fn setup_auth_state(config: &Config, state: &Arc<AppState>) -> AuthState {
    AuthState {
        api_key_repository: state.db.api_key_repository.clone(),
        profile_repository: state.db.profile_repository.clone(),
        tenant_repository: state.db.tenant_repository.clone(),
        session_verifier: SessionVerifier::new(config.jwt_secret()),
    }
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}
