use super::custom_field::FieldType;
use super::patch::double_option;
use super::tag::Tag;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Contact {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored value of one custom field for a contact, joined with the field definition
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ContactCustomValue {
    pub contact_id: Uuid,
    pub custom_field_id: Uuid,
    pub field_name: String,
    pub field_type: FieldType,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ContactDetail {
    #[serde(flatten)]
    pub contact: Contact,
    pub tags: Vec<Tag>,
    pub custom_values: Vec<ContactCustomValue>,
}

/// Value submitted for a custom field
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomValueInput {
    pub field_id: Uuid,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
    #[serde(default)]
    pub custom_values: Vec<CustomValueInput>,
}

/// Partial contact update. Tags and custom values are replaced as a whole
/// when present.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default)]
    pub tag_ids: Option<Vec<Uuid>>,
    #[serde(default)]
    pub custom_values: Option<Vec<CustomValueInput>>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContactQuery {
    /// Case-insensitive match on name, phone or email
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactResponse {
    pub contact: ContactDetail,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactListResponse {
    pub contacts: Vec<ContactDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_contact_request_defaults() {
        let req: CreateContactRequest =
            serde_json::from_str(r#"{"name":"Ana","phone":"+55 11 99999-0000"}"#).unwrap();
        assert!(req.tag_ids.is_empty());
        assert!(req.custom_values.is_empty());
        assert!(req.email.is_none());
    }

    #[test]
    fn test_update_contact_request_distinguishes_absent_lists() {
        let untouched: UpdateContactRequest = serde_json::from_str(r#"{"name":"Ana"}"#).unwrap();
        assert!(untouched.tag_ids.is_none());

        let cleared: UpdateContactRequest = serde_json::from_str(r#"{"tagIds":[]}"#).unwrap();
        assert_eq!(cleared.tag_ids, Some(vec![]));
    }
}
