use super::TenantCrm;
use funil_core::models::Tag;
use funil_core::AppError;
use sqlx::Postgres;
use uuid::Uuid;

fn map_tag_write_error(e: sqlx::Error) -> AppError {
    let err = AppError::Database(e);
    if err.is_unique_violation() {
        AppError::Conflict("Já existe uma tag com esse nome".to_string())
    } else {
        tracing::error!(error = %err, "Failed to write tag");
        err
    }
}

impl TenantCrm {
    /// Tags ordered by name
    #[tracing::instrument(skip(self), fields(db.table = "tags", db.operation = "select", tenant_id = %self.tenant_id))]
    pub async fn list_tags(&self) -> Result<Vec<Tag>, AppError> {
        sqlx::query_as::<Postgres, Tag>(
            "SELECT * FROM tags WHERE tenant_id = $1 ORDER BY name ASC",
        )
        .bind(self.tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list tags");
            AppError::Database(e)
        })
    }

    /// Create a tag. A name already used by this tenant (ignoring case) is a conflict.
    #[tracing::instrument(skip(self), fields(db.table = "tags", db.operation = "insert", tenant_id = %self.tenant_id))]
    pub async fn create_tag(&self, name: &str, color: &str) -> Result<Tag, AppError> {
        let tag = sqlx::query_as::<Postgres, Tag>(
            r#"
            INSERT INTO tags (tenant_id, name, color)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(self.tenant_id)
        .bind(name)
        .bind(color)
        .fetch_one(&self.pool)
        .await
        .map_err(map_tag_write_error)?;

        tracing::info!(tag_id = %tag.id, name = %tag.name, "Tag created");
        Ok(tag)
    }

    #[tracing::instrument(skip(self), fields(db.table = "tags", db.operation = "update", tenant_id = %self.tenant_id))]
    pub async fn update_tag(
        &self,
        tag_id: Uuid,
        name: Option<&str>,
        color: Option<&str>,
    ) -> Result<Option<Tag>, AppError> {
        sqlx::query_as::<Postgres, Tag>(
            r#"
            UPDATE tags SET
                name = COALESCE($3, name),
                color = COALESCE($4, color),
                updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING *
            "#,
        )
        .bind(tag_id)
        .bind(self.tenant_id)
        .bind(name)
        .bind(color)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_tag_write_error)
    }

    /// Delete a tag; it disappears from every card and contact
    #[tracing::instrument(skip(self), fields(db.table = "tags", db.operation = "delete", tenant_id = %self.tenant_id))]
    pub async fn delete_tag(&self, tag_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1 AND tenant_id = $2")
            .bind(tag_id)
            .bind(self.tenant_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, tag_id = %tag_id, "Failed to delete tag");
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
