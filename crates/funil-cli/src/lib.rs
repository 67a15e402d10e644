use anyhow::Context;
use funil_core::models::ApiKey;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

const NAME_COLUMN_WIDTH: usize = 24;

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
}

/// Connect to the database named by `DATABASE_URL` (`.env` is honored).
pub async fn connect_from_env() -> anyhow::Result<PgPool> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")
}

/// Render API keys as a fixed-width table. Hashes and secrets are never part of [`ApiKey`].
pub fn key_table(keys: &[ApiKey]) -> String {
    let mut out = format!(
        "{:<36}  {:<width$}  {:<12}  {:<20}  {}\n",
        "ID",
        "NAME",
        "PREFIX",
        "CREATED",
        "LAST USED",
        width = NAME_COLUMN_WIDTH
    );
    for key in keys {
        let last_used = key
            .last_used_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<36}  {:<width$}  {:<12}  {:<20}  {}\n",
            key.id,
            truncate_string(&key.name, NAME_COLUMN_WIDTH),
            key.key_prefix,
            key.created_at.format("%Y-%m-%d %H:%M"),
            last_used,
            width = NAME_COLUMN_WIDTH
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use funil_core::models::ApiKeyState;
    use uuid::Uuid;

    #[test]
    fn truncate_string_short() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("", 5), "");
    }

    #[test]
    fn truncate_string_exact() {
        assert_eq!(truncate_string("hello", 5), "hello");
    }

    #[test]
    fn truncate_string_long() {
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("abc", 2), "...");
    }

    #[test]
    fn truncate_string_counts_characters() {
        assert_eq!(truncate_string("integração", 10), "integração");
        assert_eq!(truncate_string("integração zapier", 10), "integra...");
    }

    #[test]
    fn key_table_lists_every_key() {
        let key = ApiKey {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            name: "Zapier".to_string(),
            key_prefix: "fbn_1a2b3c4d".to_string(),
            created_by: None,
            created_at: Utc::now(),
            last_used_at: None,
            state: ApiKeyState::Active,
        };

        let table = key_table(&[key.clone()]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains(&key.id.to_string()));
        assert!(lines[1].contains("fbn_1a2b3c4d"));
        assert!(lines[1].trim_end().ends_with('-'));
    }
}
