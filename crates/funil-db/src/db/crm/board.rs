use super::TenantCrm;
use funil_core::models::{
    Board, BoardCard, BoardDetail, BoardSummary, Card, Stage, StageWithCards, Tag, DEFAULT_STAGES,
};
use funil_core::AppError;
use sqlx::{FromRow, Postgres};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(FromRow)]
struct CardTagRow {
    card_id: Uuid,
    #[sqlx(flatten)]
    tag: Tag,
}

impl TenantCrm {
    /// List boards, newest first
    #[tracing::instrument(skip(self), fields(db.table = "boards", db.operation = "select", tenant_id = %self.tenant_id))]
    pub async fn list_boards(&self) -> Result<Vec<BoardSummary>, AppError> {
        sqlx::query_as::<Postgres, BoardSummary>(
            r#"
            SELECT id, name, description, created_at
            FROM boards
            WHERE tenant_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(self.tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list boards");
            AppError::Database(e)
        })
    }

    #[tracing::instrument(skip(self), fields(db.table = "boards", db.operation = "select", tenant_id = %self.tenant_id))]
    pub async fn get_board(&self, board_id: Uuid) -> Result<Option<Board>, AppError> {
        sqlx::query_as::<Postgres, Board>("SELECT * FROM boards WHERE id = $1 AND tenant_id = $2")
            .bind(board_id)
            .bind(self.tenant_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, board_id = %board_id, "Failed to fetch board");
                AppError::Database(e)
            })
    }

    /// Board with stages by position and each stage's cards in read order
    #[tracing::instrument(skip(self), fields(db.table = "boards", db.operation = "select", tenant_id = %self.tenant_id))]
    pub async fn board_detail(&self, board_id: Uuid) -> Result<Option<BoardDetail>, AppError> {
        let Some(board) = self.get_board(board_id).await? else {
            return Ok(None);
        };

        let stages = self.list_stages(board_id).await?;

        let cards = sqlx::query_as::<Postgres, Card>(
            r#"
            SELECT c.* FROM cards c
            JOIN boards b ON b.id = c.board_id
            WHERE c.board_id = $1 AND b.tenant_id = $2
            ORDER BY c.position ASC, c.moved_at DESC, c.id ASC
            "#,
        )
        .bind(board_id)
        .bind(self.tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, board_id = %board_id, "Failed to load board cards");
            AppError::Database(e)
        })?;

        let tag_rows = sqlx::query_as::<Postgres, CardTagRow>(
            r#"
            SELECT ct.card_id, t.*
            FROM card_tags ct
            JOIN cards c ON c.id = ct.card_id
            JOIN tags t ON t.id = ct.tag_id
            WHERE c.board_id = $1 AND t.tenant_id = $2
            ORDER BY t.name ASC
            "#,
        )
        .bind(board_id)
        .bind(self.tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, board_id = %board_id, "Failed to load card tags");
            AppError::Database(e)
        })?;

        Ok(Some(assemble_board(board, stages, cards, tag_rows)))
    }

    /// Create a board with the default pipeline stages.
    ///
    /// Stage inserts are best-effort: a failure is logged and the board is kept.
    #[tracing::instrument(skip(self, description), fields(db.table = "boards", db.operation = "insert", tenant_id = %self.tenant_id))]
    pub async fn create_board(
        &self,
        name: &str,
        description: Option<&str>,
        created_by: Option<Uuid>,
    ) -> Result<Board, AppError> {
        let board = sqlx::query_as::<Postgres, Board>(
            r#"
            INSERT INTO boards (tenant_id, name, description, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(self.tenant_id)
        .bind(name)
        .bind(description)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create board");
            AppError::Database(e)
        })?;

        for (position, &(stage_name, color)) in DEFAULT_STAGES.iter().enumerate() {
            let result = sqlx::query(
                "INSERT INTO stages (board_id, name, color, position) VALUES ($1, $2, $3, $4)",
            )
            .bind(board.id)
            .bind(stage_name)
            .bind(color)
            .bind(position as i32)
            .execute(&self.pool)
            .await;

            if let Err(e) = result {
                tracing::warn!(
                    error = %e,
                    board_id = %board.id,
                    stage = %stage_name,
                    "Failed to create default stage"
                );
            }
        }

        tracing::info!(board_id = %board.id, tenant_id = %self.tenant_id, "Board created");
        Ok(board)
    }

    #[tracing::instrument(skip(self, name, description), fields(db.table = "boards", db.operation = "update", tenant_id = %self.tenant_id))]
    pub async fn update_board(
        &self,
        board_id: Uuid,
        name: Option<&str>,
        description: Option<Option<&str>>,
    ) -> Result<Option<Board>, AppError> {
        sqlx::query_as::<Postgres, Board>(
            r#"
            UPDATE boards SET
                name = COALESCE($3, name),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING *
            "#,
        )
        .bind(board_id)
        .bind(self.tenant_id)
        .bind(name)
        .bind(description.is_some())
        .bind(description.flatten())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, board_id = %board_id, "Failed to update board");
            AppError::Database(e)
        })
    }

    /// Delete a board with its stages and cards
    #[tracing::instrument(skip(self), fields(db.table = "boards", db.operation = "delete", tenant_id = %self.tenant_id))]
    pub async fn delete_board(&self, board_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1 AND tenant_id = $2")
            .bind(board_id)
            .bind(self.tenant_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, board_id = %board_id, "Failed to delete board");
                AppError::Database(e)
            })?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(board_id = %board_id, tenant_id = %self.tenant_id, "Board deleted");
        }
        Ok(deleted)
    }
}

fn assemble_board(
    board: Board,
    stages: Vec<Stage>,
    cards: Vec<Card>,
    tag_rows: Vec<CardTagRow>,
) -> BoardDetail {
    let mut tags_by_card: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for row in tag_rows {
        tags_by_card.entry(row.card_id).or_default().push(row.tag);
    }

    let mut cards_by_stage: HashMap<Uuid, Vec<BoardCard>> = HashMap::new();
    for card in cards {
        let tags = tags_by_card.remove(&card.id).unwrap_or_default();
        cards_by_stage
            .entry(card.stage_id)
            .or_default()
            .push(BoardCard { card, tags });
    }

    let stages = stages
        .into_iter()
        .map(|stage| {
            let cards = cards_by_stage.remove(&stage.id).unwrap_or_default();
            StageWithCards { stage, cards }
        })
        .collect();

    BoardDetail { board, stages }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn board() -> Board {
        let now = Utc::now();
        Board {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            name: "Vendas".to_string(),
            description: None,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn stage(board_id: Uuid, position: i32) -> Stage {
        let now = Utc::now();
        Stage {
            id: Uuid::new_v4(),
            board_id,
            name: format!("Stage {position}"),
            color: None,
            position,
            created_at: now,
            updated_at: now,
        }
    }

    fn card(board_id: Uuid, stage_id: Uuid, position: i32) -> Card {
        let now = Utc::now();
        Card {
            id: Uuid::new_v4(),
            board_id,
            stage_id,
            title: format!("Lead {position}"),
            description: None,
            email: None,
            phone: None,
            status: "active".to_string(),
            contact_id: None,
            position,
            moved_at: now - Duration::seconds(i64::from(position)),
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_assemble_board_groups_cards_and_keeps_order() {
        let board = board();
        let s0 = stage(board.id, 0);
        let s1 = stage(board.id, 1);
        let cards = vec![
            card(board.id, s1.id, 0),
            card(board.id, s0.id, 0),
            card(board.id, s1.id, 1),
        ];
        let first_in_s1 = cards[0].id;
        let tag = Tag {
            id: Uuid::new_v4(),
            tenant_id: board.tenant_id,
            name: "Qualified".to_string(),
            color: "#06b6d4".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let rows = vec![CardTagRow {
            card_id: first_in_s1,
            tag,
        }];

        let detail = assemble_board(board, vec![s0, s1], cards, rows);
        assert_eq!(detail.stages.len(), 2);
        assert_eq!(detail.stages[0].cards.len(), 1);
        assert_eq!(detail.stages[1].cards.len(), 2);
        assert_eq!(detail.stages[1].cards[0].card.id, first_in_s1);
        assert_eq!(detail.stages[1].cards[0].tags.len(), 1);
        assert!(detail.stages[1].cards[1].tags.is_empty());
    }

    #[test]
    fn test_assemble_board_keeps_empty_stages() {
        let board = board();
        let s0 = stage(board.id, 0);
        let detail = assemble_board(board, vec![s0], vec![], vec![]);
        assert_eq!(detail.stages.len(), 1);
        assert!(detail.stages[0].cards.is_empty());
    }
}
