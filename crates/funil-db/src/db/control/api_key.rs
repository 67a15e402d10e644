use chrono::{DateTime, Utc};
use funil_core::models::{ApiKey, ApiKeyState};
use funil_core::AppError;
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

/// Columns of `api_keys` returned to callers. The hash never leaves the database.
const API_KEY_COLUMNS: &str =
    "id, tenant_id, name, key_prefix, created_by, created_at, last_used_at, revoked_at";

/// API key database row
#[derive(Debug, Clone, FromRow)]
struct ApiKeyRecord {
    id: Uuid,
    tenant_id: Uuid,
    name: String,
    key_prefix: String,
    created_by: Option<Uuid>,
    created_at: DateTime<Utc>,
    last_used_at: Option<DateTime<Utc>>,
    revoked_at: Option<DateTime<Utc>>,
}

impl From<ApiKeyRecord> for ApiKey {
    fn from(row: ApiKeyRecord) -> Self {
        ApiKey {
            id: row.id,
            tenant_id: row.tenant_id,
            name: row.name,
            key_prefix: row.key_prefix,
            created_by: row.created_by,
            created_at: row.created_at,
            last_used_at: row.last_used_at,
            state: ApiKeyState::from_revoked_at(row.revoked_at),
        }
    }
}

#[derive(Clone)]
pub struct ApiKeyRepository {
    pool: PgPool,
}

impl ApiKeyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a newly issued key
    #[tracing::instrument(skip(self, key_hash), fields(db.table = "api_keys", db.operation = "insert"))]
    pub async fn create_api_key(
        &self,
        tenant_id: Uuid,
        name: &str,
        created_by: Option<Uuid>,
        key_hash: &str,
        key_prefix: &str,
    ) -> Result<ApiKey, AppError> {
        let record = sqlx::query_as::<Postgres, ApiKeyRecord>(&format!(
            r#"
            INSERT INTO api_keys (tenant_id, name, key_hash, key_prefix, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {API_KEY_COLUMNS}
            "#
        ))
        .bind(tenant_id)
        .bind(name)
        .bind(key_hash)
        .bind(key_prefix)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create API key");
            AppError::Database(e)
        })?;

        tracing::info!(
            api_key_id = %record.id,
            tenant_id = %tenant_id,
            key_prefix = %record.key_prefix,
            "API key created"
        );

        Ok(record.into())
    }

    /// Find the live key with this hash. The newest key wins if several match.
    #[tracing::instrument(skip(self, key_hash), fields(db.table = "api_keys", db.operation = "select"))]
    pub async fn get_active_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, AppError> {
        let record = sqlx::query_as::<Postgres, ApiKeyRecord>(&format!(
            r#"
            SELECT {API_KEY_COLUMNS} FROM api_keys
            WHERE key_hash = $1 AND revoked_at IS NULL
            ORDER BY created_at DESC
            LIMIT 1
            "#
        ))
        .bind(key_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to get API key by hash");
            AppError::Database(e)
        })?;

        Ok(record.map(ApiKey::from))
    }

    /// List live API keys for a tenant, newest first
    #[tracing::instrument(skip(self), fields(db.table = "api_keys", db.operation = "select"))]
    pub async fn list_active(&self, tenant_id: Uuid) -> Result<Vec<ApiKey>, AppError> {
        let records = sqlx::query_as::<Postgres, ApiKeyRecord>(&format!(
            r#"
            SELECT {API_KEY_COLUMNS} FROM api_keys
            WHERE tenant_id = $1 AND revoked_at IS NULL
            ORDER BY created_at DESC
            "#
        ))
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, tenant_id = %tenant_id, "Failed to list API keys");
            AppError::Database(e)
        })?;

        Ok(records.into_iter().map(ApiKey::from).collect())
    }

    /// Revoke an API key of this tenant.
    ///
    /// Idempotent: a key that is already revoked keeps its original
    /// `revoked_at`. Returns `None` when the key does not belong to the tenant.
    #[tracing::instrument(skip(self), fields(db.table = "api_keys", db.operation = "update"))]
    pub async fn revoke_api_key(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<ApiKey>, AppError> {
        let record = sqlx::query_as::<Postgres, ApiKeyRecord>(&format!(
            r#"
            UPDATE api_keys
            SET revoked_at = COALESCE(revoked_at, NOW())
            WHERE id = $1 AND tenant_id = $2
            RETURNING {API_KEY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, id = %id, "Failed to revoke API key");
            AppError::Database(e)
        })?;

        if let Some(ref key) = record {
            tracing::info!(
                api_key_id = %id,
                tenant_id = %tenant_id,
                key_prefix = %key.key_prefix,
                "API key revoked"
            );
        }

        Ok(record.map(ApiKey::from))
    }

    /// Update last_used_at timestamp
    #[tracing::instrument(skip(self), fields(db.table = "api_keys", db.operation = "update"))]
    pub async fn update_last_used(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE api_keys
            SET last_used_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, id = %id, "Failed to update API key last_used_at");
            AppError::Database(e)
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(revoked_at: Option<DateTime<Utc>>) -> ApiKeyRecord {
        ApiKeyRecord {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            name: "Site".to_string(),
            key_prefix: "fbn_0123abcd".to_string(),
            created_by: None,
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at,
        }
    }

    #[test]
    fn test_record_without_revocation_is_active() {
        let key = ApiKey::from(record(None));
        assert!(key.is_active());
    }

    #[test]
    fn test_revoked_record_carries_timestamp() {
        let at = Utc::now();
        let key = ApiKey::from(record(Some(at)));
        assert_eq!(key.state, ApiKeyState::Revoked { revoked_at: at });
    }
}
