use crate::db::transaction::TransactionGuard;
use funil_core::models::{CreateTenantRequest, Tenant, TenantStatus, UpdateTenantRequest};
use funil_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[derive(Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a tenant (super-admin or admin CLI)
    #[tracing::instrument(skip(self, request), fields(db.table = "tenants", db.operation = "insert"))]
    pub async fn create_tenant(&self, request: &CreateTenantRequest) -> Result<Tenant, AppError> {
        let tenant = sqlx::query_as::<Postgres, Tenant>(
            r#"
            INSERT INTO tenants (name, email, phone, plan_id, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(request.name.trim())
        .bind(&request.email)
        .bind(&request.phone)
        .bind(request.plan_id)
        .bind(request.status.unwrap_or(TenantStatus::Active))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create tenant");
            AppError::Database(e)
        })?;

        tracing::info!(tenant_id = %tenant.id, name = %tenant.name, "Tenant created");
        Ok(tenant)
    }

    /// Get tenant by ID
    #[tracing::instrument(skip(self), fields(db.table = "tenants", db.operation = "select"))]
    pub async fn get_tenant_by_id(&self, tenant_id: Uuid) -> Result<Option<Tenant>, AppError> {
        sqlx::query_as::<Postgres, Tenant>("SELECT * FROM tenants WHERE id = $1")
            .bind(tenant_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, tenant_id = %tenant_id, "Failed to fetch tenant");
                AppError::Database(e)
            })
    }

    /// List all tenants, newest first
    #[tracing::instrument(skip(self), fields(db.table = "tenants", db.operation = "select"))]
    pub async fn list_tenants(&self) -> Result<Vec<Tenant>, AppError> {
        sqlx::query_as::<Postgres, Tenant>("SELECT * FROM tenants ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to list tenants");
                AppError::Database(e)
            })
    }

    /// Apply a partial update. Returns `None` when the tenant does not exist.
    #[tracing::instrument(skip(self, request), fields(db.table = "tenants", db.operation = "update"))]
    pub async fn update_tenant(
        &self,
        tenant_id: Uuid,
        request: &UpdateTenantRequest,
    ) -> Result<Option<Tenant>, AppError> {
        let tenant = sqlx::query_as::<Postgres, Tenant>(
            r#"
            UPDATE tenants SET
                name = COALESCE($2, name),
                email = CASE WHEN $3 THEN $4 ELSE email END,
                phone = CASE WHEN $5 THEN $6 ELSE phone END,
                plan_id = CASE WHEN $7 THEN $8 ELSE plan_id END,
                status = COALESCE($9, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(request.name.as_deref().map(str::trim))
        .bind(request.email.is_some())
        .bind(request.email.clone().flatten())
        .bind(request.phone.is_some())
        .bind(request.phone.clone().flatten())
        .bind(request.plan_id.is_some())
        .bind(request.plan_id.flatten())
        .bind(request.status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, tenant_id = %tenant_id, "Failed to update tenant");
            AppError::Database(e)
        })?;

        if tenant.is_some() {
            tracing::info!(tenant_id = %tenant_id, "Tenant updated");
        }
        Ok(tenant)
    }

    /// Delete a tenant and, by cascade, everything it owns
    #[tracing::instrument(skip(self), fields(db.table = "tenants", db.operation = "delete"))]
    pub async fn delete_tenant(&self, tenant_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tenants WHERE id = $1")
            .bind(tenant_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, tenant_id = %tenant_id, "Failed to delete tenant");
                AppError::Database(e)
            })?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(tenant_id = %tenant_id, "Tenant deleted");
        }
        Ok(deleted)
    }

    /// Return the profile's tenant, creating one on first use.
    ///
    /// The profile row is locked for the duration of the transaction, so
    /// concurrent first requests of one user serialize and the later ones see
    /// the tenant attached by the first.
    #[tracing::instrument(skip(self, tenant_name), fields(db.table = "tenants", db.operation = "provision"))]
    pub async fn provision_for_profile(
        &self,
        profile_id: Uuid,
        tenant_name: &str,
    ) -> Result<Uuid, AppError> {
        let mut tx = TransactionGuard::begin(&self.pool).await?;

        let locked: Option<(Option<Uuid>,)> =
            sqlx::query_as("SELECT tenant_id FROM profiles WHERE id = $1 FOR UPDATE")
                .bind(profile_id)
                .fetch_optional(tx.conn()?)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, profile_id = %profile_id, "Failed to lock profile");
                    AppError::Database(e)
                })?;

        let existing = match locked {
            Some((existing,)) => existing,
            None => {
                tx.rollback().await?;
                return Err(AppError::NotFound("Perfil não encontrado".to_string()));
            }
        };

        if let Some(tenant_id) = existing {
            tx.commit().await?;
            return Ok(tenant_id);
        }

        let (tenant_id,): (Uuid,) =
            sqlx::query_as("INSERT INTO tenants (name, status) VALUES ($1, 'active') RETURNING id")
                .bind(tenant_name)
                .fetch_one(tx.conn()?)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to insert provisioned tenant");
                    AppError::Database(e)
                })?;

        sqlx::query("UPDATE profiles SET tenant_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(profile_id)
            .bind(tenant_id)
            .execute(tx.conn()?)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, profile_id = %profile_id, "Failed to attach tenant");
                AppError::Database(e)
            })?;

        tx.commit().await?;

        tracing::info!(
            tenant_id = %tenant_id,
            profile_id = %profile_id,
            name = %tenant_name,
            "Tenant provisioned"
        );
        Ok(tenant_id)
    }
}
