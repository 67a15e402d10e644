use super::patch::double_option;
use super::stage::StageWithCards;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Stages created with every new board: (name, color), positions follow array order.
pub const DEFAULT_STAGES: [(&str, &str); 4] = [
    ("New", "#a855f7"),
    ("Contacted", "#f97316"),
    ("Qualified", "#06b6d4"),
    ("Converted", "#22c55e"),
];

/// Kanban board owned by a tenant
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Board {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Board listing entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BoardSummary {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Board with its stages (ordered by position) and their cards (in read order)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BoardDetail {
    #[serde(flatten)]
    pub board: Board,
    pub stages: Vec<StageWithCards>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBoardRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateBoardRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BoardListResponse {
    pub boards: Vec<BoardSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BoardResponse {
    pub board: Board,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BoardDetailResponse {
    pub board: BoardDetail,
}

/// Body returned by every delete endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
