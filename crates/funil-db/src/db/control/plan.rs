use funil_core::models::{CreatePlanRequest, Plan, UpdatePlanRequest};
use funil_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[derive(Clone)]
pub struct PlanRepository {
    pool: PgPool,
}

impl PlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List plans, cheapest first
    #[tracing::instrument(skip(self), fields(db.table = "plans", db.operation = "select"))]
    pub async fn list_plans(&self) -> Result<Vec<Plan>, AppError> {
        sqlx::query_as::<Postgres, Plan>("SELECT * FROM plans ORDER BY price ASC, name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to list plans");
                AppError::Database(e)
            })
    }

    #[tracing::instrument(skip(self, request), fields(db.table = "plans", db.operation = "insert"))]
    pub async fn create_plan(&self, request: &CreatePlanRequest) -> Result<Plan, AppError> {
        let plan = sqlx::query_as::<Postgres, Plan>(
            r#"
            INSERT INTO plans (name, description, price, billing_period, max_boards, max_users, features)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(request.name.trim())
        .bind(&request.description)
        .bind(request.price)
        .bind(request.billing_period)
        .bind(request.max_boards)
        .bind(request.max_users)
        .bind(&request.features)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create plan");
            AppError::Database(e)
        })?;

        tracing::info!(plan_id = %plan.id, name = %plan.name, "Plan created");
        Ok(plan)
    }

    #[tracing::instrument(skip(self, request), fields(db.table = "plans", db.operation = "update"))]
    pub async fn update_plan(
        &self,
        id: Uuid,
        request: &UpdatePlanRequest,
    ) -> Result<Option<Plan>, AppError> {
        sqlx::query_as::<Postgres, Plan>(
            r#"
            UPDATE plans SET
                name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                price = COALESCE($5, price),
                billing_period = COALESCE($6, billing_period),
                max_boards = COALESCE($7, max_boards),
                max_users = COALESCE($8, max_users),
                features = COALESCE($9, features),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.name.as_deref().map(str::trim))
        .bind(request.description.is_some())
        .bind(request.description.clone().flatten())
        .bind(request.price)
        .bind(request.billing_period)
        .bind(request.max_boards)
        .bind(request.max_users)
        .bind(&request.features)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, plan_id = %id, "Failed to update plan");
            AppError::Database(e)
        })
    }

    /// Delete a plan. Tenants on it fall back to no plan (unlimited).
    #[tracing::instrument(skip(self), fields(db.table = "plans", db.operation = "delete"))]
    pub async fn delete_plan(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM plans WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, plan_id = %id, "Failed to delete plan");
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
