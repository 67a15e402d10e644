use super::TenantCrm;
use chrono::{DateTime, Utc};
use funil_core::dashboard::{aggregate, DateRange, FieldValueFact, LeadFact};
use funil_core::models::{DashboardStats, RecentLead};
use funil_core::AppError;
use sqlx::{FromRow, Postgres};

#[derive(FromRow)]
struct LeadFactRow {
    created_at: DateTime<Utc>,
    tags: Vec<String>,
}

impl TenantCrm {
    /// Dashboard statistics for the tenant over `range`
    #[tracing::instrument(skip(self), fields(db.table = "cards", db.operation = "aggregate", tenant_id = %self.tenant_id))]
    pub async fn dashboard_stats(&self, range: &DateRange) -> Result<DashboardStats, AppError> {
        let leads = sqlx::query_as::<Postgres, LeadFactRow>(
            r#"
            SELECT c.created_at,
                   COALESCE(
                       array_agg(t.name::text) FILTER (WHERE t.id IS NOT NULL),
                       ARRAY[]::text[]
                   ) AS tags
            FROM cards c
            JOIN boards b ON b.id = c.board_id
            LEFT JOIN card_tags ct ON ct.card_id = c.id
            LEFT JOIN tags t ON t.id = ct.tag_id AND t.tenant_id = b.tenant_id
            WHERE b.tenant_id = $1
              AND c.created_at >= $2
              AND c.created_at < $3
            GROUP BY c.id, c.created_at
            "#,
        )
        .bind(self.tenant_id)
        .bind(range.lower_bound())
        .bind(range.upper_bound())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load dashboard leads");
            AppError::Database(e)
        })?;

        let values = sqlx::query_as::<Postgres, FieldValueFact>(
            r#"
            SELECT f.id AS field_id, f.name AS field_name, f.field_type, v.value
            FROM contact_custom_values v
            JOIN contacts ct ON ct.id = v.contact_id
            JOIN custom_fields f ON f.id = v.custom_field_id
            WHERE ct.tenant_id = $1
              AND f.tenant_id = $1
              AND ct.created_at >= $2
              AND ct.created_at < $3
            "#,
        )
        .bind(self.tenant_id)
        .bind(range.lower_bound())
        .bind(range.upper_bound())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load dashboard custom values");
            AppError::Database(e)
        })?;

        let leads: Vec<LeadFact> = leads
            .into_iter()
            .map(|row| LeadFact {
                created_at: row.created_at,
                tags: row.tags,
            })
            .collect();

        Ok(aggregate(range, &leads, &values))
    }

    /// Newest cards of the tenant with their stage name
    #[tracing::instrument(skip(self), fields(db.table = "cards", db.operation = "select", tenant_id = %self.tenant_id))]
    pub async fn recent_leads(&self, limit: i64) -> Result<Vec<RecentLead>, AppError> {
        sqlx::query_as::<Postgres, RecentLead>(
            r#"
            SELECT c.id, c.board_id, c.stage_id, c.title, c.email, c.phone, c.status,
                   c.created_at, s.name AS stage_name
            FROM cards c
            JOIN boards b ON b.id = c.board_id
            JOIN stages s ON s.id = c.stage_id
            WHERE b.tenant_id = $1
            ORDER BY c.created_at DESC, c.id ASC
            LIMIT $2
            "#,
        )
        .bind(self.tenant_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load recent leads");
            AppError::Database(e)
        })
    }
}
