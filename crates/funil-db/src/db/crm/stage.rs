use super::TenantCrm;
use crate::db::transaction::TransactionGuard;
use funil_core::models::{Card, Stage};
use funil_core::ordering::{append_position, normalized_positions};
use funil_core::AppError;
use sqlx::Postgres;
use uuid::Uuid;

impl TenantCrm {
    /// Stages of a board, left to right
    #[tracing::instrument(skip(self), fields(db.table = "stages", db.operation = "select", tenant_id = %self.tenant_id))]
    pub async fn list_stages(&self, board_id: Uuid) -> Result<Vec<Stage>, AppError> {
        sqlx::query_as::<Postgres, Stage>(
            r#"
            SELECT s.* FROM stages s
            JOIN boards b ON b.id = s.board_id
            WHERE s.board_id = $1 AND b.tenant_id = $2
            ORDER BY s.position ASC, s.created_at ASC
            "#,
        )
        .bind(board_id)
        .bind(self.tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, board_id = %board_id, "Failed to list stages");
            AppError::Database(e)
        })
    }

    /// Stage of the given board, or `None` when it lives elsewhere
    #[tracing::instrument(skip(self), fields(db.table = "stages", db.operation = "select", tenant_id = %self.tenant_id))]
    pub async fn get_stage(&self, board_id: Uuid, stage_id: Uuid) -> Result<Option<Stage>, AppError> {
        sqlx::query_as::<Postgres, Stage>(
            r#"
            SELECT s.* FROM stages s
            JOIN boards b ON b.id = s.board_id
            WHERE s.id = $1 AND s.board_id = $2 AND b.tenant_id = $3
            "#,
        )
        .bind(stage_id)
        .bind(board_id)
        .bind(self.tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, stage_id = %stage_id, "Failed to fetch stage");
            AppError::Database(e)
        })
    }

    /// Append a stage to the right end of a board
    #[tracing::instrument(skip(self, name, color), fields(db.table = "stages", db.operation = "insert", tenant_id = %self.tenant_id))]
    pub async fn create_stage(
        &self,
        board_id: Uuid,
        name: &str,
        color: Option<&str>,
    ) -> Result<Stage, AppError> {
        let positions: Vec<i32> = self
            .list_stages(board_id)
            .await?
            .iter()
            .map(|s| s.position)
            .collect();
        let position = append_position(positions);

        let stage = sqlx::query_as::<Postgres, Stage>(
            r#"
            INSERT INTO stages (board_id, name, color, position)
            SELECT b.id, $3, $4, $5 FROM boards b
            WHERE b.id = $1 AND b.tenant_id = $2
            RETURNING *
            "#,
        )
        .bind(board_id)
        .bind(self.tenant_id)
        .bind(name)
        .bind(color)
        .bind(position)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, board_id = %board_id, "Failed to create stage");
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("Quadro não encontrado".to_string()))?;

        tracing::info!(stage_id = %stage.id, board_id = %board_id, position, "Stage created");
        Ok(stage)
    }

    #[tracing::instrument(skip(self, name, color), fields(db.table = "stages", db.operation = "update", tenant_id = %self.tenant_id))]
    pub async fn update_stage(
        &self,
        board_id: Uuid,
        stage_id: Uuid,
        name: Option<&str>,
        color: Option<Option<&str>>,
        position: Option<i32>,
    ) -> Result<Option<Stage>, AppError> {
        sqlx::query_as::<Postgres, Stage>(
            r#"
            UPDATE stages s SET
                name = COALESCE($4, s.name),
                color = CASE WHEN $5 THEN $6 ELSE s.color END,
                position = COALESCE($7, s.position),
                updated_at = NOW()
            FROM boards b
            WHERE s.id = $1 AND s.board_id = $2 AND b.id = s.board_id AND b.tenant_id = $3
            RETURNING s.*
            "#,
        )
        .bind(stage_id)
        .bind(board_id)
        .bind(self.tenant_id)
        .bind(name)
        .bind(color.is_some())
        .bind(color.flatten())
        .bind(position)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, stage_id = %stage_id, "Failed to update stage");
            AppError::Database(e)
        })
    }

    /// Delete a stage and its cards
    #[tracing::instrument(skip(self), fields(db.table = "stages", db.operation = "delete", tenant_id = %self.tenant_id))]
    pub async fn delete_stage(&self, board_id: Uuid, stage_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM stages s
            USING boards b
            WHERE s.id = $1 AND s.board_id = $2 AND b.id = s.board_id AND b.tenant_id = $3
            "#,
        )
        .bind(stage_id)
        .bind(board_id)
        .bind(self.tenant_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, stage_id = %stage_id, "Failed to delete stage");
            AppError::Database(e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    /// Renumber a stage's cards to `0..N-1`, keeping their read order.
    ///
    /// Runs in one transaction holding the stage row lock. Returns the cards
    /// in their new order, or `None` when the stage is not on this board.
    #[tracing::instrument(skip(self), fields(db.table = "cards", db.operation = "normalize", tenant_id = %self.tenant_id))]
    pub async fn normalize_stage(
        &self,
        board_id: Uuid,
        stage_id: Uuid,
    ) -> Result<Option<Vec<Card>>, AppError> {
        let mut tx = TransactionGuard::begin(&self.pool).await?;

        let locked: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT s.id FROM stages s
            JOIN boards b ON b.id = s.board_id
            WHERE s.id = $1 AND s.board_id = $2 AND b.tenant_id = $3
            FOR UPDATE OF s
            "#,
        )
        .bind(stage_id)
        .bind(board_id)
        .bind(self.tenant_id)
        .fetch_optional(tx.conn()?)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, stage_id = %stage_id, "Failed to lock stage");
            AppError::Database(e)
        })?;

        if locked.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let ids: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM cards
            WHERE stage_id = $1
            ORDER BY position ASC, moved_at DESC, id ASC
            "#,
        )
        .bind(stage_id)
        .fetch_all(tx.conn()?)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, stage_id = %stage_id, "Failed to read stage cards");
            AppError::Database(e)
        })?;

        let ids: Vec<Uuid> = ids.into_iter().map(|(id,)| id).collect();
        let positions: Vec<i32> = normalized_positions(ids.len()).collect();

        let mut cards = sqlx::query_as::<Postgres, Card>(
            r#"
            UPDATE cards c SET position = v.position
            FROM UNNEST($1::uuid[], $2::int[]) AS v(id, position)
            WHERE c.id = v.id AND c.stage_id = $3
            RETURNING c.*
            "#,
        )
        .bind(&ids)
        .bind(&positions)
        .bind(stage_id)
        .fetch_all(tx.conn()?)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, stage_id = %stage_id, "Failed to renumber stage cards");
            AppError::Database(e)
        })?;

        tx.commit().await?;

        cards.sort_by_key(|c| c.position);
        tracing::info!(stage_id = %stage_id, cards = cards.len(), "Stage normalized");
        Ok(Some(cards))
    }
}
