use super::patch::double_option;
use super::tag::Tag;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Status given to cards created without one
pub const DEFAULT_CARD_STATUS: &str = "active";

/// Lead card on a board.
///
/// Within a stage, cards are read in `position ASC, moved_at DESC, id ASC`
/// order. Positions may have gaps and ties.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Card {
    pub id: Uuid,
    pub board_id: Uuid,
    pub stage_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: String,
    pub contact_id: Option<Uuid>,
    pub position: i32,
    pub moved_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Card joined with the name and color of its stage
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CardWithStage {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub card: Card,
    pub stage_name: String,
    pub stage_color: Option<String>,
}

/// Card as rendered inside a board column
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BoardCard {
    #[serde(flatten)]
    pub card: Card,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardRequest {
    #[serde(default)]
    pub stage_id: Option<Uuid>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub contact_id: Option<Uuid>,
}

/// Partial card update. `null` clears an optional field, an absent field is left untouched.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCardRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub contact_id: Option<Option<Uuid>>,
    /// Moving to another stage places the card at the end of that stage
    #[serde(default)]
    pub stage_id: Option<Uuid>,
}

impl UpdateCardRequest {
    /// True when the request changes any column other than the stage
    pub fn has_field_changes(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.email.is_some()
            || self.phone.is_some()
            || self.status.is_some()
            || self.contact_id.is_some()
    }
}

/// Drag-and-drop result: target stage and, when dropped on a card, the
/// index of that card among the stage's other cards.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveCardRequest {
    pub stage_id: Uuid,
    #[serde(default)]
    pub index: Option<usize>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetCardTagsRequest {
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CardResponse {
    pub card: CardWithStage,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CardListResponse {
    pub cards: Vec<CardWithStage>,
}
