use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Platform-wide counters shown to super-admins
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AdminStats {
    pub active_clients: i64,
    pub total_clients: i64,
    pub total_users: i64,
    pub total_boards: i64,
    pub total_leads: i64,
}
