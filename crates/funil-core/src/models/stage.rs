use super::card::{BoardCard, Card};
use super::patch::double_option;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Kanban column. Ascending `position` is left-to-right order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Stage {
    pub id: Uuid,
    pub board_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StageWithCards {
    #[serde(flatten)]
    pub stage: Stage,
    pub cards: Vec<BoardCard>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStageRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateStageRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub color: Option<Option<String>>,
    #[serde(default)]
    pub position: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StageResponse {
    pub stage: Stage,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StageListResponse {
    pub stages: Vec<Stage>,
}

/// Cards of a stage after renumbering, in read order
#[derive(Debug, Serialize, ToSchema)]
pub struct NormalizeStageResponse {
    pub cards: Vec<Card>,
}
