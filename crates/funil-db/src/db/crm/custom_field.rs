use super::TenantCrm;
use funil_core::models::{CustomField, FieldType};
use funil_core::AppError;
use sqlx::Postgres;
use uuid::Uuid;

impl TenantCrm {
    /// Custom field definitions ordered by name
    #[tracing::instrument(skip(self), fields(db.table = "custom_fields", db.operation = "select", tenant_id = %self.tenant_id))]
    pub async fn list_custom_fields(&self) -> Result<Vec<CustomField>, AppError> {
        sqlx::query_as::<Postgres, CustomField>(
            "SELECT * FROM custom_fields WHERE tenant_id = $1 ORDER BY name ASC",
        )
        .bind(self.tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list custom fields");
            AppError::Database(e)
        })
    }

    /// Definitions among `ids` that belong to this tenant
    #[tracing::instrument(skip(self, ids), fields(db.table = "custom_fields", db.operation = "select", tenant_id = %self.tenant_id))]
    pub async fn get_custom_fields(&self, ids: &[Uuid]) -> Result<Vec<CustomField>, AppError> {
        sqlx::query_as::<Postgres, CustomField>(
            "SELECT * FROM custom_fields WHERE tenant_id = $1 AND id = ANY($2)",
        )
        .bind(self.tenant_id)
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch custom fields");
            AppError::Database(e)
        })
    }

    #[tracing::instrument(skip(self), fields(db.table = "custom_fields", db.operation = "insert", tenant_id = %self.tenant_id))]
    pub async fn create_custom_field(
        &self,
        name: &str,
        field_type: FieldType,
    ) -> Result<CustomField, AppError> {
        let field = sqlx::query_as::<Postgres, CustomField>(
            r#"
            INSERT INTO custom_fields (tenant_id, name, field_type)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(self.tenant_id)
        .bind(name)
        .bind(field_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create custom field");
            AppError::Database(e)
        })?;

        tracing::info!(field_id = %field.id, field_type = %field.field_type, "Custom field created");
        Ok(field)
    }

    /// Delete a definition and every stored value of it
    #[tracing::instrument(skip(self), fields(db.table = "custom_fields", db.operation = "delete", tenant_id = %self.tenant_id))]
    pub async fn delete_custom_field(&self, field_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM custom_fields WHERE id = $1 AND tenant_id = $2")
            .bind(field_id)
            .bind(self.tenant_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, field_id = %field_id, "Failed to delete custom field");
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
