use super::patch::double_option;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Tenant status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "tenant_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    Active,
    Inactive,
    Suspended,
}

/// Tenant (client organization). Owns boards, contacts, tags, custom fields and API keys.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub plan_id: Option<Uuid>,
    pub status: TenantStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a tenant (super-admin)
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantRequest {
    #[validate(length(min = 1, max = 255, message = "name é obrigatório"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "email inválido"))]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub plan_id: Option<Uuid>,
    #[serde(default)]
    pub status: Option<TenantStatus>,
}

/// Request DTO for updating a tenant (super-admin)
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTenantRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "name não pode ser vazio"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub plan_id: Option<Option<Uuid>>,
    #[serde(default)]
    pub status: Option<TenantStatus>,
}

/// Default organization name for a lazily provisioned tenant.
pub fn default_tenant_name(full_name: Option<&str>, email: &str) -> String {
    let owner = full_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| email.split('@').next().unwrap_or(email).to_string());
    format!("{}'s Organization", owner)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClientResponse {
    pub client: Tenant,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClientListResponse {
    pub clients: Vec<Tenant>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_status_serialization() {
        assert_eq!(
            serde_json::to_value(TenantStatus::Suspended).unwrap(),
            serde_json::json!("suspended")
        );
    }

    #[test]
    fn test_default_tenant_name_prefers_full_name() {
        assert_eq!(
            default_tenant_name(Some("Ana Souza"), "ana@example.com"),
            "Ana Souza's Organization"
        );
    }

    #[test]
    fn test_default_tenant_name_falls_back_to_email_local_part() {
        assert_eq!(
            default_tenant_name(None, "bruno@example.com"),
            "bruno's Organization"
        );
        assert_eq!(
            default_tenant_name(Some("  "), "carla@example.com"),
            "carla's Organization"
        );
    }

    #[test]
    fn test_update_tenant_request_null_clears_plan() {
        let req: UpdateTenantRequest = serde_json::from_str(r#"{"planId":null}"#).unwrap();
        assert_eq!(req.plan_id, Some(None));
        assert!(req.name.is_none());
    }
}
