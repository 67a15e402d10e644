use super::patch::double_option;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Billing period of a subscription plan
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "billing_period", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum BillingPeriod {
    Monthly,
    Quarterly,
    Yearly,
}

/// Subscription plan managed by super-admins.
///
/// `max_boards` and `max_users` of `0` mean unlimited.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Plan {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub billing_period: BillingPeriod,
    pub max_boards: i32,
    pub max_users: i32,
    pub features: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanRequest {
    #[validate(length(min = 1, max = 255, message = "name é obrigatório"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub billing_period: BillingPeriod,
    #[serde(default)]
    #[validate(range(min = 0, message = "maxBoards deve ser >= 0"))]
    pub max_boards: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "maxUsers deve ser >= 0"))]
    pub max_users: i32,
    #[serde(default = "empty_features")]
    pub features: serde_json::Value,
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlanRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "name não pode ser vazio"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub billing_period: Option<BillingPeriod>,
    #[serde(default)]
    #[validate(range(min = 0, message = "maxBoards deve ser >= 0"))]
    pub max_boards: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0, message = "maxUsers deve ser >= 0"))]
    pub max_users: Option<i32>,
    #[serde(default)]
    pub features: Option<serde_json::Value>,
}

fn empty_features() -> serde_json::Value {
    serde_json::json!({})
}

impl CreatePlanRequest {
    /// Prices are stored with two decimal places and cannot be negative.
    pub fn check_price(&self) -> Result<(), String> {
        check_price(self.price)
    }
}

impl UpdatePlanRequest {
    pub fn check_price(&self) -> Result<(), String> {
        self.price.map(check_price).unwrap_or(Ok(()))
    }
}

fn check_price(price: Decimal) -> Result<(), String> {
    if price.is_sign_negative() {
        return Err("price não pode ser negativo".to_string());
    }
    if price.scale() > 2 {
        return Err("price deve ter no máximo 2 casas decimais".to_string());
    }
    Ok(())
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlanResponse {
    pub plan: Plan,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlanListResponse {
    pub plans: Vec<Plan>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_create_plan_request_defaults() {
        let req: CreatePlanRequest =
            serde_json::from_str(r#"{"name":"Pro","price":99.9,"billingPeriod":"monthly"}"#)
                .unwrap();
        assert_eq!(req.max_boards, 0);
        assert_eq!(req.features, serde_json::json!({}));
        assert_eq!(req.billing_period, BillingPeriod::Monthly);
        assert!(req.check_price().is_ok());
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(check_price(Decimal::from_str("-1").unwrap()).is_err());
        assert!(check_price(Decimal::from_str("10.999").unwrap()).is_err());
        assert!(check_price(Decimal::from_str("10.99").unwrap()).is_ok());
    }
}
