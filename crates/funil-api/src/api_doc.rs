//! OpenAPI documentation.
//!
//! Board and card operations are documented once, under `/api/v1`; the same
//! handlers are mounted under `/api` for session users.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use funil_core::models;

/// Served at `/api/openapi.json`
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Registers the two bearer schemes referenced by the handlers
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Tenant API key (fbn_...)"))
                        .build(),
                ),
            );
            components.add_security_scheme(
                "session",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Session token issued by the identity provider"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Funil API",
        version = "0.1.0",
        description = "Multi-tenant pipeline CRM. `/api/v1` is the public REST surface authenticated with tenant API keys; `/api` serves the web application with session tokens."
    ),
    modifiers(&SecurityAddon),
    paths(
        // Boards
        handlers::boards::list_boards,
        handlers::boards::create_board,
        handlers::boards::get_board,
        handlers::boards::update_board,
        handlers::boards::delete_board,
        // Cards
        handlers::cards::list_cards,
        handlers::cards::create_card,
        handlers::cards::get_card,
        handlers::cards::update_card,
        handlers::cards::move_card,
        handlers::cards::delete_card,
        handlers::cards::set_card_tags,
        // Stages
        handlers::stages::list_stages,
        handlers::stages::create_stage,
        handlers::stages::update_stage,
        handlers::stages::delete_stage,
        handlers::stages::normalize_stage,
        // Tags
        handlers::tags::list_tags,
        handlers::tags::create_tag,
        handlers::tags::update_tag,
        handlers::tags::delete_tag,
        // Contacts
        handlers::contacts::list_contacts,
        handlers::contacts::create_contact,
        handlers::contacts::get_contact,
        handlers::contacts::update_contact,
        handlers::contacts::delete_contact,
        // Custom fields
        handlers::custom_fields::list_custom_fields,
        handlers::custom_fields::create_custom_field,
        handlers::custom_fields::delete_custom_field,
        // API keys
        handlers::api_keys::list_api_keys,
        handlers::api_keys::create_api_key,
        handlers::api_keys::revoke_api_key,
        // Dashboard
        handlers::dashboard::get_dashboard,
        handlers::dashboard::recent_leads,
        // Profile
        handlers::profile::get_profile,
        handlers::profile::update_profile,
        // Super-admin
        handlers::admin::list_clients,
        handlers::admin::create_client,
        handlers::admin::update_client,
        handlers::admin::delete_client,
        handlers::admin::list_plans,
        handlers::admin::create_plan,
        handlers::admin::update_plan,
        handlers::admin::delete_plan,
        handlers::admin::get_stats,
    ),
    components(
        schemas(
            // Boards and stages
            models::Board,
            models::BoardSummary,
            models::BoardDetail,
            models::CreateBoardRequest,
            models::UpdateBoardRequest,
            models::BoardListResponse,
            models::BoardResponse,
            models::BoardDetailResponse,
            models::Stage,
            models::StageWithCards,
            models::CreateStageRequest,
            models::UpdateStageRequest,
            models::StageResponse,
            models::StageListResponse,
            models::NormalizeStageResponse,
            // Cards
            models::Card,
            models::CardWithStage,
            models::BoardCard,
            models::CreateCardRequest,
            models::UpdateCardRequest,
            models::MoveCardRequest,
            models::SetCardTagsRequest,
            models::CardResponse,
            models::CardListResponse,
            // Tags, contacts, custom fields
            models::Tag,
            models::CreateTagRequest,
            models::UpdateTagRequest,
            models::TagResponse,
            models::TagListResponse,
            models::Contact,
            models::ContactCustomValue,
            models::ContactDetail,
            models::CustomValueInput,
            models::CreateContactRequest,
            models::UpdateContactRequest,
            models::ContactResponse,
            models::ContactListResponse,
            models::FieldType,
            models::CustomField,
            models::CreateCustomFieldRequest,
            models::CustomFieldResponse,
            models::CustomFieldListResponse,
            // API keys
            models::ApiKey,
            models::ApiKeyState,
            models::CreateApiKeyRequest,
            models::CreateApiKeyResponse,
            models::ApiKeyListResponse,
            // Dashboard
            models::DashboardStats,
            models::TagCount,
            models::DailyCount,
            models::CustomFieldBreakdown,
            models::ValueCount,
            models::RecentLead,
            models::RecentLeadsResponse,
            // Profile and admin
            models::Profile,
            models::UserRole,
            models::UpdateProfileRequest,
            models::ProfileResponse,
            models::Tenant,
            models::TenantStatus,
            models::CreateTenantRequest,
            models::UpdateTenantRequest,
            models::ClientResponse,
            models::ClientListResponse,
            models::Plan,
            models::BillingPeriod,
            models::CreatePlanRequest,
            models::UpdatePlanRequest,
            models::PlanResponse,
            models::PlanListResponse,
            models::AdminStats,
            models::SuccessResponse,
            // Error
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "boards", description = "Pipeline boards"),
        (name = "cards", description = "Lead cards, drag-and-drop moves and card tags"),
        (name = "stages", description = "Board columns and position renumbering"),
        (name = "tags", description = "Tenant tags shared by cards and contacts"),
        (name = "contacts", description = "Contacts with tags and custom values"),
        (name = "custom-fields", description = "Contact custom field definitions"),
        (name = "api-keys", description = "Issuance and revocation of tenant API keys"),
        (name = "dashboard", description = "Aggregate lead analytics"),
        (name = "profile", description = "Session user profile"),
        (name = "admin", description = "Super-admin management of clients and plans")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_documents_both_surfaces() {
        let spec = get_openapi_spec();
        assert!(spec.paths.paths.contains_key("/api/v1/boards"));
        assert!(spec
            .paths
            .paths
            .contains_key("/api/v1/boards/{board_id}/cards/{card_id}/move"));
        assert!(spec.paths.paths.contains_key("/api/contacts"));
        assert!(spec.paths.paths.contains_key("/api/admin/stats"));
    }

    #[test]
    fn test_security_schemes_registered() {
        let spec = get_openapi_spec();
        let components = spec.components.expect("components");
        assert!(components.security_schemes.contains_key("api_key"));
        assert!(components.security_schemes.contains_key("session"));
    }
}
