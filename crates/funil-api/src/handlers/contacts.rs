//! Contact handlers

use super::{bad_request, not_found};
use crate::auth::TenantContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use funil_core::models::patch::clean_text;
use funil_core::models::{
    ContactListResponse, ContactQuery, ContactResponse, CreateContactRequest, CustomValueInput,
    SuccessResponse, UpdateContactRequest,
};
use funil_core::validation::{validate_custom_value, validate_name};
use funil_db::{ContactChanges, NewContact, TenantCrm};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

const NAME_AND_PHONE_REQUIRED: &str = "name e phone são obrigatórios";
const CONTACT_NOT_FOUND: &str = "Contato não encontrado";

/// Check submitted values against their field definitions.
///
/// Blank values are dropped so the field stays unset. A field that is not
/// one of the tenant's definitions is rejected.
async fn checked_custom_values(
    crm: &TenantCrm,
    inputs: &[CustomValueInput],
) -> Result<Vec<(Uuid, String)>, HttpAppError> {
    if inputs.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = inputs.iter().map(|v| v.field_id).collect();
    let fields: HashMap<Uuid, _> = crm
        .get_custom_fields(&ids)
        .await?
        .into_iter()
        .map(|f| (f.id, f))
        .collect();

    let mut values = Vec::with_capacity(inputs.len());
    for input in inputs {
        let field = fields
            .get(&input.field_id)
            .ok_or_else(|| bad_request(format!("Campo {} não existe", input.field_id)))?;

        let Some(value) = clean_text(input.value.clone()) else {
            continue;
        };
        validate_custom_value(&field.name, field.field_type, &value)
            .map_err(|e| bad_request(e.to_string()))?;
        values.push((field.id, value));
    }
    Ok(values)
}

fn checked_field(field: &str, value: &str) -> Result<(), HttpAppError> {
    validate_name(field, value).map_err(|e| bad_request(e.to_string()))
}

#[utoipa::path(
    get,
    path = "/api/contacts",
    params(ContactQuery),
    responses(
        (status = 200, description = "Contacts with tags and custom values, newest first", body = ContactListResponse)
    ),
    tag = "contacts",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, ctx, query), fields(tenant_id = %ctx.tenant_id))]
pub async fn list_contacts(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Query(query): Query<ContactQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let contacts = state
        .db
        .crm
        .for_tenant(ctx.tenant_id)
        .list_contacts(query.search.as_deref())
        .await?;
    Ok(Json(ContactListResponse { contacts }))
}

#[utoipa::path(
    post,
    path = "/api/contacts",
    request_body = CreateContactRequest,
    responses(
        (status = 201, description = "Contact created", body = ContactResponse),
        (status = 400, description = "Missing name/phone or invalid custom value", body = ErrorResponse)
    ),
    tag = "contacts",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(tenant_id = %ctx.tenant_id))]
pub async fn create_contact(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    ValidatedJson(request): ValidatedJson<CreateContactRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let (Some(name), Some(phone)) = (clean_text(request.name), clean_text(request.phone)) else {
        return Err(bad_request(NAME_AND_PHONE_REQUIRED));
    };
    checked_field("name", &name)?;
    checked_field("phone", &phone)?;

    let crm = state.db.crm.for_tenant(ctx.tenant_id);
    let values = checked_custom_values(&crm, &request.custom_values).await?;

    let contact = crm
        .create_contact(
            NewContact {
                name,
                phone,
                email: clean_text(request.email),
            },
            ctx.user_id(),
            &request.tag_ids,
            &values,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ContactResponse { contact })))
}

#[utoipa::path(
    get,
    path = "/api/contacts/{contact_id}",
    params(("contact_id" = Uuid, Path, description = "Contact ID")),
    responses(
        (status = 200, description = "Contact detail", body = ContactResponse),
        (status = 404, description = "Contact not found", body = ErrorResponse)
    ),
    tag = "contacts",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(tenant_id = %ctx.tenant_id))]
pub async fn get_contact(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path(contact_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let contact = state
        .db
        .crm
        .for_tenant(ctx.tenant_id)
        .get_contact(contact_id)
        .await?
        .ok_or_else(|| not_found(CONTACT_NOT_FOUND))?;

    Ok(Json(ContactResponse { contact }))
}

/// Update a contact; `tagIds` and `customValues` replace the stored sets when present
#[utoipa::path(
    patch,
    path = "/api/contacts/{contact_id}",
    params(("contact_id" = Uuid, Path, description = "Contact ID")),
    request_body = UpdateContactRequest,
    responses(
        (status = 200, description = "Contact updated", body = ContactResponse),
        (status = 400, description = "Blank name/phone or invalid custom value", body = ErrorResponse),
        (status = 404, description = "Contact not found", body = ErrorResponse)
    ),
    tag = "contacts",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(tenant_id = %ctx.tenant_id))]
pub async fn update_contact(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path(contact_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateContactRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut changes = ContactChanges {
        email: request.email.map(clean_text),
        ..Default::default()
    };
    if let Some(name) = request.name {
        let name = clean_text(Some(name)).ok_or_else(|| bad_request(NAME_AND_PHONE_REQUIRED))?;
        checked_field("name", &name)?;
        changes.name = Some(name);
    }
    if let Some(phone) = request.phone {
        let phone = clean_text(Some(phone)).ok_or_else(|| bad_request(NAME_AND_PHONE_REQUIRED))?;
        checked_field("phone", &phone)?;
        changes.phone = Some(phone);
    }

    let crm = state.db.crm.for_tenant(ctx.tenant_id);
    let values = match &request.custom_values {
        Some(inputs) => Some(checked_custom_values(&crm, inputs).await?),
        None => None,
    };

    let contact = crm
        .update_contact(
            contact_id,
            &changes,
            request.tag_ids.as_deref(),
            values.as_deref(),
        )
        .await?
        .ok_or_else(|| not_found(CONTACT_NOT_FOUND))?;

    Ok(Json(ContactResponse { contact }))
}

#[utoipa::path(
    delete,
    path = "/api/contacts/{contact_id}",
    params(("contact_id" = Uuid, Path, description = "Contact ID")),
    responses(
        (status = 200, description = "Contact deleted", body = SuccessResponse),
        (status = 404, description = "Contact not found", body = ErrorResponse)
    ),
    tag = "contacts",
    security(("session" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(tenant_id = %ctx.tenant_id))]
pub async fn delete_contact(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path(contact_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let deleted = state
        .db
        .crm
        .for_tenant(ctx.tenant_id)
        .delete_contact(contact_id)
        .await?;

    if !deleted {
        return Err(not_found(CONTACT_NOT_FOUND));
    }

    Ok(Json(SuccessResponse::ok()))
}
