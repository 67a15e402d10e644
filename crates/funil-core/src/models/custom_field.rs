use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

/// Value type of a contact custom field
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "custom_field_type", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Email,
    Phone,
    Url,
    Textarea,
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Url => "url",
            FieldType::Textarea => "textarea",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CustomField {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub field_type: FieldType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomFieldRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_field_type")]
    pub field_type: FieldType,
}

fn default_field_type() -> FieldType {
    FieldType::Text
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomFieldResponse {
    pub custom_field: CustomField,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomFieldListResponse {
    pub custom_fields: Vec<CustomField>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_defaults_to_text() {
        let req: CreateCustomFieldRequest = serde_json::from_str(r#"{"name":"Origem"}"#).unwrap();
        assert_eq!(req.field_type, FieldType::Text);

        let req: CreateCustomFieldRequest =
            serde_json::from_str(r#"{"name":"Site","fieldType":"url"}"#).unwrap();
        assert_eq!(req.field_type, FieldType::Url);
        assert_eq!(req.field_type.to_string(), "url");
    }

    #[test]
    fn test_unknown_field_type_rejected() {
        assert!(serde_json::from_str::<CreateCustomFieldRequest>(
            r#"{"name":"x","fieldType":"color"}"#
        )
        .is_err());
    }
}
