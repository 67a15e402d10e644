//! Domain route groups (boards, contacts, admin, etc.).

use crate::handlers;
use crate::state::AppState;
use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use std::sync::Arc;

/// Board and card routes, mounted under both `/api/v1` and `/api`
pub fn board_routes(prefix: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/boards", prefix),
            get(handlers::boards::list_boards).post(handlers::boards::create_board),
        )
        .route(
            &format!("{}/boards/{{board_id}}", prefix),
            get(handlers::boards::get_board)
                .patch(handlers::boards::update_board)
                .delete(handlers::boards::delete_board),
        )
        .route(
            &format!("{}/boards/{{board_id}}/cards", prefix),
            get(handlers::cards::list_cards).post(handlers::cards::create_card),
        )
        .route(
            &format!("{}/boards/{{board_id}}/cards/{{card_id}}", prefix),
            get(handlers::cards::get_card)
                .patch(handlers::cards::update_card)
                .delete(handlers::cards::delete_card),
        )
        .route(
            &format!("{}/boards/{{board_id}}/cards/{{card_id}}/move", prefix),
            post(handlers::cards::move_card),
        )
}

pub fn stage_routes(prefix: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/boards/{{board_id}}/stages", prefix),
            get(handlers::stages::list_stages).post(handlers::stages::create_stage),
        )
        .route(
            &format!("{}/boards/{{board_id}}/stages/{{stage_id}}", prefix),
            patch(handlers::stages::update_stage).delete(handlers::stages::delete_stage),
        )
        .route(
            &format!("{}/boards/{{board_id}}/stages/{{stage_id}}/normalize", prefix),
            post(handlers::stages::normalize_stage),
        )
        .route(
            &format!("{}/boards/{{board_id}}/cards/{{card_id}}/tags", prefix),
            put(handlers::cards::set_card_tags),
        )
}

pub fn tag_routes(prefix: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/tags", prefix),
            get(handlers::tags::list_tags).post(handlers::tags::create_tag),
        )
        .route(
            &format!("{}/tags/{{tag_id}}", prefix),
            patch(handlers::tags::update_tag).delete(handlers::tags::delete_tag),
        )
}

pub fn contact_routes(prefix: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/contacts", prefix),
            get(handlers::contacts::list_contacts).post(handlers::contacts::create_contact),
        )
        .route(
            &format!("{}/contacts/{{contact_id}}", prefix),
            get(handlers::contacts::get_contact)
                .patch(handlers::contacts::update_contact)
                .delete(handlers::contacts::delete_contact),
        )
        .route(
            &format!("{}/custom-fields", prefix),
            get(handlers::custom_fields::list_custom_fields)
                .post(handlers::custom_fields::create_custom_field),
        )
        .route(
            &format!("{}/custom-fields/{{field_id}}", prefix),
            delete(handlers::custom_fields::delete_custom_field),
        )
}

pub fn api_key_routes(prefix: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/api-keys", prefix),
            get(handlers::api_keys::list_api_keys).post(handlers::api_keys::create_api_key),
        )
        .route(
            &format!("{}/api-keys/{{key_id}}", prefix),
            delete(handlers::api_keys::revoke_api_key),
        )
}

pub fn dashboard_routes(prefix: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/dashboard", prefix),
            get(handlers::dashboard::get_dashboard),
        )
        .route(
            &format!("{}/dashboard/recent-leads", prefix),
            get(handlers::dashboard::recent_leads),
        )
}

/// Routes that need a session but never provision a tenant
pub fn account_routes(prefix: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/profile", prefix),
            get(handlers::profile::get_profile).patch(handlers::profile::update_profile),
        )
        .route(
            &format!("{}/admin/clients", prefix),
            get(handlers::admin::list_clients).post(handlers::admin::create_client),
        )
        .route(
            &format!("{}/admin/clients/{{client_id}}", prefix),
            patch(handlers::admin::update_client).delete(handlers::admin::delete_client),
        )
        .route(
            &format!("{}/admin/plans", prefix),
            get(handlers::admin::list_plans).post(handlers::admin::create_plan),
        )
        .route(
            &format!("{}/admin/plans/{{plan_id}}", prefix),
            patch(handlers::admin::update_plan).delete(handlers::admin::delete_plan),
        )
        .route(
            &format!("{}/admin/stats", prefix),
            get(handlers::admin::get_stats),
        )
}
