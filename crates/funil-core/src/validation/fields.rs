//! Field validation for user-supplied CRM data
//!
//! - Names: non-blank, bounded length
//! - Colors: `#rrggbb`
//! - Custom field values: checked against the field's declared type

use crate::models::FieldType;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use regex::Regex;

/// Maximum length for names of boards, stages, tags, contacts and fields
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum length for single-line custom values
pub const MAX_TEXT_LENGTH: usize = 255;

/// Maximum length for `textarea` custom values
pub const MAX_TEXTAREA_LENGTH: usize = 5000;

/// Validate a name that has already been trimmed
pub fn validate_name(field: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(anyhow::anyhow!("{} é obrigatório", field));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(anyhow::anyhow!(
            "{} excede {} caracteres",
            field,
            MAX_NAME_LENGTH
        ));
    }
    Ok(())
}

/// Validate a hex color in `#rrggbb` form
pub fn validate_color(color: &str) -> Result<()> {
    let pattern =
        Regex::new(r"^#[0-9a-fA-F]{6}$").context("Failed to compile color validation regex")?;

    if !pattern.is_match(color) {
        return Err(anyhow::anyhow!(
            "Cor inválida '{}': use o formato #rrggbb",
            color
        ));
    }
    Ok(())
}

/// Validate a custom value against its field type.
///
/// Rules:
/// - number: parses as a finite decimal number
/// - date: `YYYY-MM-DD`
/// - email: `local@domain.tld`
/// - phone: digits with optional `+ ( ) - . space`, at least 8 digits
/// - url: `http://` or `https://` followed by a host
/// - text / textarea: length limits only
pub fn validate_custom_value(field_name: &str, field_type: FieldType, value: &str) -> Result<()> {
    let valid = match field_type {
        FieldType::Text => value.chars().count() <= MAX_TEXT_LENGTH,
        FieldType::Textarea => value.chars().count() <= MAX_TEXTAREA_LENGTH,
        FieldType::Number => value.parse::<f64>().map(f64::is_finite).unwrap_or(false),
        FieldType::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
        FieldType::Email => Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .context("Failed to compile email validation regex")?
            .is_match(value),
        FieldType::Phone => {
            Regex::new(r"^\+?[0-9()\-.\s]+$")
                .context("Failed to compile phone validation regex")?
                .is_match(value)
                && value.chars().filter(char::is_ascii_digit).count() >= 8
        }
        FieldType::Url => Regex::new(r"^https?://[^\s/$.?#][^\s]*$")
            .context("Failed to compile url validation regex")?
            .is_match(value),
    };

    if !valid {
        return Err(anyhow::anyhow!(
            "Valor inválido para o campo '{}' ({})",
            field_name,
            field_type
        ));
    }
    Ok(())
}
