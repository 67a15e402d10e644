use funil_core::models::AdminStats;
use funil_core::AppError;
use sqlx::{PgPool, Postgres};

/// Platform-wide reads for super-admins. Deliberately not tenant-scoped.
#[derive(Clone)]
pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "tenants", db.operation = "aggregate"))]
    pub async fn stats(&self) -> Result<AdminStats, AppError> {
        sqlx::query_as::<Postgres, AdminStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM tenants WHERE status = 'active') AS active_clients,
                (SELECT COUNT(*) FROM tenants) AS total_clients,
                (SELECT COUNT(*) FROM profiles) AS total_users,
                (SELECT COUNT(*) FROM boards) AS total_boards,
                (SELECT COUNT(*) FROM cards) AS total_leads
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to compute admin stats");
            AppError::Database(e)
        })
    }
}
