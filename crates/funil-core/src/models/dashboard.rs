use super::custom_field::FieldType;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Aggregate analytics for one tenant over an inclusive range of days
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct DashboardStats {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_leads: i64,
    pub new_leads: i64,
    pub contacted_leads: i64,
    pub qualified_leads: i64,
    pub converted_leads: i64,
    pub lost_leads: i64,
    /// `converted_leads / total_leads` in `[0, 1]`
    pub conversion_rate: f64,
    pub leads_by_tag: Vec<TagCount>,
    pub leads_over_time: Vec<DailyCount>,
    pub custom_field_breakdown: Vec<CustomFieldBreakdown>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct TagCount {
    pub tag: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct CustomFieldBreakdown {
    pub field_id: Uuid,
    pub field_name: String,
    pub field_type: FieldType,
    pub values: Vec<ValueCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ValueCount {
    pub value: String,
    pub count: i64,
}

/// Newest card of the tenant with the name of its stage
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct RecentLead {
    pub id: Uuid,
    pub board_id: Uuid,
    pub stage_id: Uuid,
    pub title: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub stage_name: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    /// First day of the range (YYYY-MM-DD)
    pub start: Option<NaiveDate>,
    /// Last day of the range (YYYY-MM-DD)
    pub end: Option<NaiveDate>,
    /// Range ending today, used when `start`/`end` are absent
    pub days: Option<i64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentLeadsQuery {
    /// Number of leads to return (default 10, max 100)
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecentLeadsResponse {
    pub leads: Vec<RecentLead>,
}
