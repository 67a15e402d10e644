use super::TenantCrm;
use funil_core::models::{Card, CardWithStage, Stage, Tag};
use funil_core::ordering::{append_position, plan_move, DropTarget, MovePlan, Slot};
use funil_core::AppError;
use sqlx::Postgres;
use uuid::Uuid;

const CARD_WITH_STAGE: &str = r#"
    SELECT c.*, s.name AS stage_name, s.color AS stage_color
    FROM cards c
    JOIN stages s ON s.id = c.stage_id
    JOIN boards b ON b.id = c.board_id
"#;

/// Column values of a card being created
#[derive(Debug, Clone, Default)]
pub struct NewCard {
    pub title: String,
    pub description: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: String,
    pub contact_id: Option<Uuid>,
}

/// Column changes of a card update. Outer `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct CardChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub status: Option<String>,
    pub contact_id: Option<Option<Uuid>>,
}

fn not_found_card() -> AppError {
    AppError::NotFound("Card não encontrado".to_string())
}

fn not_found_stage() -> AppError {
    AppError::NotFound("Etapa não encontrada".to_string())
}

fn with_stage(card: Card, stage: &Stage) -> CardWithStage {
    CardWithStage {
        card,
        stage_name: stage.name.clone(),
        stage_color: stage.color.clone(),
    }
}

impl TenantCrm {
    /// Cards of a board with their stage, newest first
    #[tracing::instrument(skip(self), fields(db.table = "cards", db.operation = "select", tenant_id = %self.tenant_id))]
    pub async fn list_cards(&self, board_id: Uuid) -> Result<Vec<CardWithStage>, AppError> {
        sqlx::query_as::<Postgres, CardWithStage>(&format!(
            "{CARD_WITH_STAGE} WHERE c.board_id = $1 AND b.tenant_id = $2 ORDER BY c.created_at DESC, c.id ASC"
        ))
        .bind(board_id)
        .bind(self.tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, board_id = %board_id, "Failed to list cards");
            AppError::Database(e)
        })
    }

    #[tracing::instrument(skip(self), fields(db.table = "cards", db.operation = "select", tenant_id = %self.tenant_id))]
    pub async fn get_card(
        &self,
        board_id: Uuid,
        card_id: Uuid,
    ) -> Result<Option<CardWithStage>, AppError> {
        sqlx::query_as::<Postgres, CardWithStage>(&format!(
            "{CARD_WITH_STAGE} WHERE c.id = $1 AND c.board_id = $2 AND b.tenant_id = $3"
        ))
        .bind(card_id)
        .bind(board_id)
        .bind(self.tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, card_id = %card_id, "Failed to fetch card");
            AppError::Database(e)
        })
    }

    /// Slots of a stage's cards in read order
    async fn stage_slots(&self, stage_id: Uuid) -> Result<Vec<Slot>, AppError> {
        let rows: Vec<(Uuid, i32)> = sqlx::query_as(
            r#"
            SELECT c.id, c.position FROM cards c
            JOIN boards b ON b.id = c.board_id
            WHERE c.stage_id = $1 AND b.tenant_id = $2
            ORDER BY c.position ASC, c.moved_at DESC, c.id ASC
            "#,
        )
        .bind(stage_id)
        .bind(self.tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, stage_id = %stage_id, "Failed to read stage slots");
            AppError::Database(e)
        })?;

        Ok(rows
            .into_iter()
            .map(|(card_id, position)| Slot { card_id, position })
            .collect())
    }

    /// Position of a new last card in the stage
    #[tracing::instrument(skip(self), fields(db.table = "cards", db.operation = "select", tenant_id = %self.tenant_id))]
    pub async fn append_position(&self, stage_id: Uuid) -> Result<i32, AppError> {
        let slots = self.stage_slots(stage_id).await?;
        Ok(append_position(slots.iter().map(|s| s.position)))
    }

    /// Create a card at the end of `stage`. A contact of another tenant is not linked.
    #[tracing::instrument(skip(self, stage, card), fields(db.table = "cards", db.operation = "insert", tenant_id = %self.tenant_id, stage_id = %stage.id))]
    pub async fn create_card(
        &self,
        stage: &Stage,
        card: NewCard,
        created_by: Option<Uuid>,
    ) -> Result<CardWithStage, AppError> {
        let position = self.append_position(stage.id).await?;

        let created = sqlx::query_as::<Postgres, Card>(
            r#"
            INSERT INTO cards (
                board_id, stage_id, title, description, email, phone, status,
                contact_id, position, created_by
            )
            SELECT s.board_id, s.id, $3, $4, $5, $6, $7,
                   (SELECT ct.id FROM contacts ct WHERE ct.id = $8 AND ct.tenant_id = $2),
                   $9, $10
            FROM stages s
            JOIN boards b ON b.id = s.board_id
            WHERE s.id = $1 AND b.tenant_id = $2
            RETURNING *
            "#,
        )
        .bind(stage.id)
        .bind(self.tenant_id)
        .bind(&card.title)
        .bind(&card.description)
        .bind(&card.email)
        .bind(&card.phone)
        .bind(&card.status)
        .bind(card.contact_id)
        .bind(position)
        .bind(created_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create card");
            AppError::Database(e)
        })?
        .ok_or_else(not_found_stage)?;

        tracing::info!(card_id = %created.id, stage_id = %stage.id, position, "Card created");
        Ok(with_stage(created, stage))
    }

    /// Update card columns other than stage and position
    #[tracing::instrument(skip(self, changes), fields(db.table = "cards", db.operation = "update", tenant_id = %self.tenant_id))]
    pub async fn update_card(
        &self,
        board_id: Uuid,
        card_id: Uuid,
        changes: &CardChanges,
    ) -> Result<Option<CardWithStage>, AppError> {
        let updated: Option<(Uuid,)> = sqlx::query_as(
            r#"
            UPDATE cards c SET
                title = COALESCE($4, c.title),
                description = CASE WHEN $5 THEN $6 ELSE c.description END,
                email = CASE WHEN $7 THEN $8 ELSE c.email END,
                phone = CASE WHEN $9 THEN $10 ELSE c.phone END,
                status = COALESCE($11, c.status),
                contact_id = CASE WHEN $12
                    THEN (SELECT ct.id FROM contacts ct WHERE ct.id = $13 AND ct.tenant_id = $3)
                    ELSE c.contact_id END,
                updated_at = NOW()
            FROM boards b
            WHERE c.id = $1 AND c.board_id = $2 AND b.id = c.board_id AND b.tenant_id = $3
            RETURNING c.id
            "#,
        )
        .bind(card_id)
        .bind(board_id)
        .bind(self.tenant_id)
        .bind(&changes.title)
        .bind(changes.description.is_some())
        .bind(changes.description.clone().flatten())
        .bind(changes.email.is_some())
        .bind(changes.email.clone().flatten())
        .bind(changes.phone.is_some())
        .bind(changes.phone.clone().flatten())
        .bind(&changes.status)
        .bind(changes.contact_id.is_some())
        .bind(changes.contact_id.flatten())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, card_id = %card_id, "Failed to update card");
            AppError::Database(e)
        })?;

        match updated {
            Some(_) => self.get_card(board_id, card_id).await,
            None => Ok(None),
        }
    }

    /// Move a card to `target_stage_id` at `target`.
    ///
    /// The target stage must belong to the card's board. Only the moved row is
    /// written; siblings keep their positions.
    #[tracing::instrument(skip(self), fields(db.table = "cards", db.operation = "move", tenant_id = %self.tenant_id))]
    pub async fn move_card(
        &self,
        board_id: Uuid,
        card_id: Uuid,
        target_stage_id: Uuid,
        target: DropTarget,
    ) -> Result<CardWithStage, AppError> {
        let current = self
            .get_card(board_id, card_id)
            .await?
            .ok_or_else(not_found_card)?;

        let stage = self
            .get_stage(board_id, target_stage_id)
            .await?
            .ok_or_else(not_found_stage)?;

        let slots = self.stage_slots(stage.id).await?;

        let (stage_id, position) =
            match plan_move(card_id, current.card.stage_id, stage.id, target, &slots) {
                MovePlan::NoOp => {
                    tracing::debug!(card_id = %card_id, "Card already in place");
                    return Ok(current);
                }
                MovePlan::Update { stage_id, position } => (stage_id, position),
            };

        let moved = sqlx::query_as::<Postgres, Card>(
            r#"
            UPDATE cards c SET
                stage_id = $4,
                position = $5,
                moved_at = NOW(),
                updated_at = NOW()
            FROM boards b
            WHERE c.id = $1 AND c.board_id = $2 AND b.id = c.board_id AND b.tenant_id = $3
            RETURNING c.*
            "#,
        )
        .bind(card_id)
        .bind(board_id)
        .bind(self.tenant_id)
        .bind(stage_id)
        .bind(position)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, card_id = %card_id, "Failed to move card");
            AppError::Database(e)
        })?
        .ok_or_else(not_found_card)?;

        tracing::info!(
            card_id = %card_id,
            from_stage = %current.card.stage_id,
            to_stage = %stage_id,
            position,
            "Card moved"
        );
        Ok(with_stage(moved, &stage))
    }

    #[tracing::instrument(skip(self), fields(db.table = "cards", db.operation = "delete", tenant_id = %self.tenant_id))]
    pub async fn delete_card(&self, board_id: Uuid, card_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM cards c
            USING boards b
            WHERE c.id = $1 AND c.board_id = $2 AND b.id = c.board_id AND b.tenant_id = $3
            "#,
        )
        .bind(card_id)
        .bind(board_id)
        .bind(self.tenant_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, card_id = %card_id, "Failed to delete card");
            AppError::Database(e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    /// Replace the tags of a card. Tags of other tenants are ignored.
    ///
    /// Linking is best-effort: a failed insert is logged and the remaining
    /// links are returned.
    #[tracing::instrument(skip(self, tag_ids), fields(db.table = "card_tags", db.operation = "replace", tenant_id = %self.tenant_id))]
    pub async fn set_card_tags(
        &self,
        board_id: Uuid,
        card_id: Uuid,
        tag_ids: &[Uuid],
    ) -> Result<Vec<Tag>, AppError> {
        if self.get_card(board_id, card_id).await?.is_none() {
            return Err(not_found_card());
        }

        sqlx::query("DELETE FROM card_tags WHERE card_id = $1")
            .bind(card_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, card_id = %card_id, "Failed to clear card tags");
                AppError::Database(e)
            })?;

        if !tag_ids.is_empty() {
            let result = sqlx::query(
                r#"
                INSERT INTO card_tags (card_id, tag_id)
                SELECT $1, t.id FROM tags t
                WHERE t.tenant_id = $2 AND t.id = ANY($3)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(card_id)
            .bind(self.tenant_id)
            .bind(tag_ids)
            .execute(&self.pool)
            .await;

            if let Err(e) = result {
                tracing::warn!(error = %e, card_id = %card_id, "Failed to link card tags");
            }
        }

        self.card_tags(card_id).await
    }

    async fn card_tags(&self, card_id: Uuid) -> Result<Vec<Tag>, AppError> {
        sqlx::query_as::<Postgres, Tag>(
            r#"
            SELECT t.* FROM tags t
            JOIN card_tags ct ON ct.tag_id = t.id
            WHERE ct.card_id = $1 AND t.tenant_id = $2
            ORDER BY t.name ASC
            "#,
        )
        .bind(card_id)
        .bind(self.tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, card_id = %card_id, "Failed to load card tags");
            AppError::Database(e)
        })
    }
}
