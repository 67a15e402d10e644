//! Security audit logging
//!
//! Authentication outcomes and API key lifecycle events are emitted as
//! structured events on the `audit` target. Secrets never appear here; keys
//! are identified by id and display prefix.

use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    AuthenticationSuccess,
    AuthenticationFailure,
    ApiKeyCreated,
    ApiKeyRevoked,
    TenantProvisioned,
}

/// Which credential the caller presented
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    ApiKey,
    Session,
}

/// Structured audit log entry
#[derive(Debug, Serialize)]
pub struct AuditLogEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub event_type: AuditEventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<AuthMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_path: Option<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl AuditLogEntry {
    pub fn new(event_type: AuditEventType) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            event_type,
            method: None,
            tenant_id: None,
            user_id: None,
            api_key_id: None,
            key_prefix: None,
            request_path: None,
            success: true,
            error_message: None,
        }
    }

    pub fn with_method(mut self, method: AuthMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_tenant_id(mut self, tenant_id: Option<Uuid>) -> Self {
        self.tenant_id = tenant_id;
        self
    }

    pub fn with_user_id(mut self, user_id: Option<Uuid>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_api_key(mut self, api_key_id: Uuid, key_prefix: &str) -> Self {
        self.api_key_id = Some(api_key_id);
        self.key_prefix = Some(key_prefix.to_string());
        self
    }

    pub fn with_request_path(mut self, path: &str) -> Self {
        self.request_path = Some(path.to_string());
        self
    }

    pub fn with_failure(mut self, error_message: &str) -> Self {
        self.success = false;
        self.error_message = Some(error_message.to_string());
        self
    }

    /// Log the audit entry
    ///
    /// Uses structured logging with the `audit` target for easy filtering
    pub fn log(&self) {
        let json = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());

        if self.success {
            tracing::event!(
                target: "audit",
                tracing::Level::INFO,
                audit_entry = %json,
                event_type = ?self.event_type,
                tenant_id = ?self.tenant_id,
                "Security audit log"
            );
        } else {
            tracing::event!(
                target: "audit",
                tracing::Level::WARN,
                audit_entry = %json,
                event_type = ?self.event_type,
                error = ?self.error_message,
                "Security audit log - failure"
            );
        }
    }
}

pub fn log_authentication_success(
    method: AuthMethod,
    tenant_id: Option<Uuid>,
    user_id: Option<Uuid>,
    api_key: Option<(Uuid, &str)>,
) {
    let mut entry = AuditLogEntry::new(AuditEventType::AuthenticationSuccess)
        .with_method(method)
        .with_tenant_id(tenant_id)
        .with_user_id(user_id);
    if let Some((id, prefix)) = api_key {
        entry = entry.with_api_key(id, prefix);
    }
    entry.log();
}

pub fn log_authentication_failure(method: AuthMethod, path: &str, reason: &str) {
    AuditLogEntry::new(AuditEventType::AuthenticationFailure)
        .with_method(method)
        .with_request_path(path)
        .with_failure(reason)
        .log();
}

pub fn log_api_key_created(tenant_id: Uuid, user_id: Option<Uuid>, api_key_id: Uuid, prefix: &str) {
    AuditLogEntry::new(AuditEventType::ApiKeyCreated)
        .with_tenant_id(Some(tenant_id))
        .with_user_id(user_id)
        .with_api_key(api_key_id, prefix)
        .log();
}

pub fn log_api_key_revoked(tenant_id: Uuid, user_id: Option<Uuid>, api_key_id: Uuid, prefix: &str) {
    AuditLogEntry::new(AuditEventType::ApiKeyRevoked)
        .with_tenant_id(Some(tenant_id))
        .with_user_id(user_id)
        .with_api_key(api_key_id, prefix)
        .log();
}

pub fn log_tenant_provisioned(tenant_id: Uuid, user_id: Uuid) {
    AuditLogEntry::new(AuditEventType::TenantProvisioned)
        .with_method(AuthMethod::Session)
        .with_tenant_id(Some(tenant_id))
        .with_user_id(Some(user_id))
        .log();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_serialization_skips_empty_fields() {
        let entry = AuditLogEntry::new(AuditEventType::AuthenticationFailure)
            .with_method(AuthMethod::ApiKey)
            .with_failure("API key inválida");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["event_type"], "authentication_failure");
        assert_eq!(json["method"], "api_key");
        assert_eq!(json["success"], false);
        assert!(json.get("tenant_id").is_none());
        assert!(json.get("api_key_id").is_none());
    }

    #[test]
    fn test_entry_carries_prefix_not_secret() {
        let id = Uuid::new_v4();
        let entry = AuditLogEntry::new(AuditEventType::ApiKeyCreated).with_api_key(id, "fbn_01234567");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["key_prefix"], "fbn_01234567");
        assert_eq!(json["api_key_id"], id.to_string());
    }
}
