use super::TenantCrm;
use funil_core::models::{Contact, ContactCustomValue, ContactDetail, Tag};
use funil_core::AppError;
use sqlx::{FromRow, Postgres};
use std::collections::HashMap;
use uuid::Uuid;

/// Column values of a contact being created
#[derive(Debug, Clone, Default)]
pub struct NewContact {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

/// Column changes of a contact update. Outer `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct ContactChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<Option<String>>,
}

#[derive(FromRow)]
struct ContactTagRow {
    contact_id: Uuid,
    #[sqlx(flatten)]
    tag: Tag,
}

impl TenantCrm {
    /// Contacts with tags and custom values, newest first.
    ///
    /// `search` matches name, phone or email, ignoring case.
    #[tracing::instrument(skip(self), fields(db.table = "contacts", db.operation = "select", tenant_id = %self.tenant_id))]
    pub async fn list_contacts(&self, search: Option<&str>) -> Result<Vec<ContactDetail>, AppError> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));

        let contacts = sqlx::query_as::<Postgres, Contact>(
            r#"
            SELECT * FROM contacts
            WHERE tenant_id = $1
              AND ($2::text IS NULL
                   OR name ILIKE $2
                   OR phone ILIKE $2
                   OR COALESCE(email, '') ILIKE $2)
            ORDER BY created_at DESC, id ASC
            "#,
        )
        .bind(self.tenant_id)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list contacts");
            AppError::Database(e)
        })?;

        self.with_details(contacts).await
    }

    #[tracing::instrument(skip(self), fields(db.table = "contacts", db.operation = "select", tenant_id = %self.tenant_id))]
    pub async fn get_contact(&self, contact_id: Uuid) -> Result<Option<ContactDetail>, AppError> {
        let contact = sqlx::query_as::<Postgres, Contact>(
            "SELECT * FROM contacts WHERE id = $1 AND tenant_id = $2",
        )
        .bind(contact_id)
        .bind(self.tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, contact_id = %contact_id, "Failed to fetch contact");
            AppError::Database(e)
        })?;

        match contact {
            Some(contact) => Ok(self.with_details(vec![contact]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Create a contact, then link tags and store custom values best-effort
    #[tracing::instrument(skip(self, contact, tag_ids, values), fields(db.table = "contacts", db.operation = "insert", tenant_id = %self.tenant_id))]
    pub async fn create_contact(
        &self,
        contact: NewContact,
        created_by: Option<Uuid>,
        tag_ids: &[Uuid],
        values: &[(Uuid, String)],
    ) -> Result<ContactDetail, AppError> {
        let created = sqlx::query_as::<Postgres, Contact>(
            r#"
            INSERT INTO contacts (tenant_id, name, phone, email, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(self.tenant_id)
        .bind(&contact.name)
        .bind(&contact.phone)
        .bind(&contact.email)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create contact");
            AppError::Database(e)
        })?;

        self.link_contact_tags(created.id, tag_ids).await;
        self.store_custom_values(created.id, values).await;

        tracing::info!(contact_id = %created.id, "Contact created");
        self.get_contact(created.id)
            .await?
            .ok_or_else(|| AppError::Internal("Contact vanished after insert".to_string()))
    }

    /// Update a contact. Tags and custom values are replaced when given.
    #[tracing::instrument(skip(self, changes, tag_ids, values), fields(db.table = "contacts", db.operation = "update", tenant_id = %self.tenant_id))]
    pub async fn update_contact(
        &self,
        contact_id: Uuid,
        changes: &ContactChanges,
        tag_ids: Option<&[Uuid]>,
        values: Option<&[(Uuid, String)]>,
    ) -> Result<Option<ContactDetail>, AppError> {
        let updated: Option<(Uuid,)> = sqlx::query_as(
            r#"
            UPDATE contacts SET
                name = COALESCE($3, name),
                phone = COALESCE($4, phone),
                email = CASE WHEN $5 THEN $6 ELSE email END,
                updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING id
            "#,
        )
        .bind(contact_id)
        .bind(self.tenant_id)
        .bind(&changes.name)
        .bind(&changes.phone)
        .bind(changes.email.is_some())
        .bind(changes.email.clone().flatten())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, contact_id = %contact_id, "Failed to update contact");
            AppError::Database(e)
        })?;

        if updated.is_none() {
            return Ok(None);
        }

        if let Some(tag_ids) = tag_ids {
            self.clear_contact_rows("contact_tags", contact_id).await?;
            self.link_contact_tags(contact_id, tag_ids).await;
        }
        if let Some(values) = values {
            self.clear_contact_rows("contact_custom_values", contact_id).await?;
            self.store_custom_values(contact_id, values).await;
        }

        self.get_contact(contact_id).await
    }

    #[tracing::instrument(skip(self), fields(db.table = "contacts", db.operation = "delete", tenant_id = %self.tenant_id))]
    pub async fn delete_contact(&self, contact_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1 AND tenant_id = $2")
            .bind(contact_id)
            .bind(self.tenant_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, contact_id = %contact_id, "Failed to delete contact");
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear_contact_rows(&self, table: &'static str, contact_id: Uuid) -> Result<(), AppError> {
        sqlx::query(&format!("DELETE FROM {table} WHERE contact_id = $1"))
            .bind(contact_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, table, contact_id = %contact_id, "Failed to clear contact rows");
                AppError::Database(e)
            })?;
        Ok(())
    }

    async fn link_contact_tags(&self, contact_id: Uuid, tag_ids: &[Uuid]) {
        if tag_ids.is_empty() {
            return;
        }
        let result = sqlx::query(
            r#"
            INSERT INTO contact_tags (contact_id, tag_id)
            SELECT $1, t.id FROM tags t
            WHERE t.tenant_id = $2 AND t.id = ANY($3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(contact_id)
        .bind(self.tenant_id)
        .bind(tag_ids)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            tracing::warn!(error = %e, contact_id = %contact_id, "Failed to link contact tags");
        }
    }

    async fn store_custom_values(&self, contact_id: Uuid, values: &[(Uuid, String)]) {
        if values.is_empty() {
            return;
        }
        let (field_ids, texts): (Vec<Uuid>, Vec<String>) = values.iter().cloned().unzip();

        let result = sqlx::query(
            r#"
            INSERT INTO contact_custom_values (contact_id, custom_field_id, value)
            SELECT $1, f.id, v.value
            FROM UNNEST($2::uuid[], $3::text[]) AS v(field_id, value)
            JOIN custom_fields f ON f.id = v.field_id
            WHERE f.tenant_id = $4
            ON CONFLICT (contact_id, custom_field_id)
            DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            "#,
        )
        .bind(contact_id)
        .bind(&field_ids)
        .bind(&texts)
        .bind(self.tenant_id)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            tracing::warn!(error = %e, contact_id = %contact_id, "Failed to store custom values");
        }
    }

    async fn with_details(&self, contacts: Vec<Contact>) -> Result<Vec<ContactDetail>, AppError> {
        if contacts.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = contacts.iter().map(|c| c.id).collect();

        let tag_rows = sqlx::query_as::<Postgres, ContactTagRow>(
            r#"
            SELECT ct.contact_id, t.*
            FROM contact_tags ct
            JOIN tags t ON t.id = ct.tag_id
            WHERE ct.contact_id = ANY($1) AND t.tenant_id = $2
            ORDER BY t.name ASC
            "#,
        )
        .bind(&ids)
        .bind(self.tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load contact tags");
            AppError::Database(e)
        })?;

        let values = sqlx::query_as::<Postgres, ContactCustomValue>(
            r#"
            SELECT v.contact_id, v.custom_field_id, f.name AS field_name, f.field_type, v.value
            FROM contact_custom_values v
            JOIN custom_fields f ON f.id = v.custom_field_id
            WHERE v.contact_id = ANY($1) AND f.tenant_id = $2
            ORDER BY f.name ASC
            "#,
        )
        .bind(&ids)
        .bind(self.tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load contact custom values");
            AppError::Database(e)
        })?;

        let mut tags: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for row in tag_rows {
            tags.entry(row.contact_id).or_default().push(row.tag);
        }
        let mut custom: HashMap<Uuid, Vec<ContactCustomValue>> = HashMap::new();
        for value in values {
            custom.entry(value.contact_id).or_default().push(value);
        }

        Ok(contacts
            .into_iter()
            .map(|contact| ContactDetail {
                tags: tags.remove(&contact.id).unwrap_or_default(),
                custom_values: custom.remove(&contact.id).unwrap_or_default(),
                contact,
            })
            .collect())
    }
}

/// Escape `%`, `_` and `\` so user input matches literally inside ILIKE
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("ana"), "ana");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
