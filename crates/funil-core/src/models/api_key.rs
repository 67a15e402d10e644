use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle of an API key. Revoked keys are kept for audit and never authenticate again.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiKeyState {
    Active,
    Revoked { revoked_at: DateTime<Utc> },
}

impl ApiKeyState {
    pub fn from_revoked_at(revoked_at: Option<DateTime<Utc>>) -> Self {
        match revoked_at {
            Some(revoked_at) => ApiKeyState::Revoked { revoked_at },
            None => ApiKeyState::Active,
        }
    }
}

/// API key as exposed to the rest of the application (never carries the hash).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiKey {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub key_prefix: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub state: ApiKeyState,
}

impl ApiKey {
    pub fn is_active(&self) -> bool {
        matches!(self.state, ApiKeyState::Active)
    }
}

/// Request to issue a new API key
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateApiKeyRequest {
    /// Human-readable name for the API key
    #[schema(example = "Integração site")]
    pub name: Option<String>,
}

/// Response when issuing an API key (includes the raw key - only shown once)
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateApiKeyResponse {
    pub id: Uuid,
    /// The full API key - it won't be shown again
    #[schema(example = "fbn_9f2c4e1a7b3d...")]
    pub api_key: String,
    pub name: String,
    #[schema(example = "fbn_9f2c4e1a")]
    pub key_prefix: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiKeyListResponse {
    pub api_keys: Vec<ApiKey>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(state: ApiKeyState) -> ApiKey {
        ApiKey {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            name: "Site".to_string(),
            key_prefix: "fbn_01234567".to_string(),
            created_by: None,
            created_at: Utc::now(),
            last_used_at: None,
            state,
        }
    }

    #[test]
    fn test_state_from_revoked_at() {
        assert_eq!(ApiKeyState::from_revoked_at(None), ApiKeyState::Active);
        let at = Utc::now();
        assert_eq!(
            ApiKeyState::from_revoked_at(Some(at)),
            ApiKeyState::Revoked { revoked_at: at }
        );
    }

    #[test]
    fn test_serialized_status_is_tagged() {
        let active = serde_json::to_value(key(ApiKeyState::Active)).unwrap();
        assert_eq!(active["status"], "active");
        assert!(active.get("revoked_at").is_none());

        let revoked = serde_json::to_value(key(ApiKeyState::Revoked {
            revoked_at: Utc::now(),
        }))
        .unwrap();
        assert_eq!(revoked["status"], "revoked");
        assert!(revoked.get("revoked_at").is_some());
    }

    #[test]
    fn test_is_active() {
        assert!(key(ApiKeyState::Active).is_active());
        assert!(!key(ApiKeyState::Revoked {
            revoked_at: Utc::now()
        })
        .is_active());
    }
}
