//! Funil admin CLI: direct-database maintenance of tenants, API keys and roles.
//!
//! Reads DATABASE_URL from the environment or a `.env` file.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use funil_cli::{connect_from_env, init_tracing, key_table};
use funil_core::models::{CreateTenantRequest, UserRole};
use funil_core::IssuedKey;
use funil_db::{ApiKeyRepository, ProfileRepository, TenantRepository};
use serde::Serialize;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "funil-admin", about = "Funil administration CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a tenant
    CreateTenant {
        /// Organization name
        #[arg(long)]
        name: String,
        /// Contact email
        #[arg(long)]
        email: Option<String>,
    },
    /// Issue an API key for a tenant and print its secret once
    IssueKey {
        /// Tenant UUID
        #[arg(long)]
        tenant: Uuid,
        /// Key name
        #[arg(long)]
        name: String,
    },
    /// List the active API keys of a tenant
    ListKeys {
        /// Tenant UUID
        #[arg(long)]
        tenant: Uuid,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Revoke an API key
    RevokeKey {
        /// Tenant UUID
        #[arg(long)]
        tenant: Uuid,
        /// API key UUID
        #[arg(long)]
        id: Uuid,
    },
    /// Make a user super-admin
    Promote {
        /// Profile UUID (the identity provider's subject)
        #[arg(long)]
        user: Uuid,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let pool = connect_from_env().await?;

    match cli.command {
        Commands::CreateTenant { name, email } => {
            let name = name.trim().to_string();
            anyhow::ensure!(!name.is_empty(), "--name must not be blank");

            let tenant = TenantRepository::new(pool)
                .create_tenant(&CreateTenantRequest {
                    name,
                    email,
                    phone: None,
                    plan_id: None,
                    status: None,
                })
                .await?;
            print_json(&tenant)?;
        }
        Commands::IssueKey { tenant, name } => {
            let name = name.trim().to_string();
            anyhow::ensure!(!name.is_empty(), "--name must not be blank");

            TenantRepository::new(pool.clone())
                .get_tenant_by_id(tenant)
                .await?
                .with_context(|| format!("Tenant {} not found", tenant))?;

            let issued = IssuedKey::generate();
            let api_key = ApiKeyRepository::new(pool)
                .create_api_key(tenant, &name, None, &issued.hash, &issued.prefix)
                .await?;

            print_json(&serde_json::json!({
                "id": api_key.id,
                "name": api_key.name,
                "key_prefix": api_key.key_prefix,
                "api_key": issued.secret,
            }))?;
            eprintln!("Store this key now; it cannot be shown again.");
        }
        Commands::ListKeys { tenant, format } => {
            let keys = ApiKeyRepository::new(pool).list_active(tenant).await?;
            match format {
                OutputFormat::Json => print_json(&keys)?,
                OutputFormat::Table => print!("{}", key_table(&keys)),
            }
        }
        Commands::RevokeKey { tenant, id } => {
            let api_key = ApiKeyRepository::new(pool)
                .revoke_api_key(tenant, id)
                .await?
                .with_context(|| format!("API key {} not found for tenant {}", id, tenant))?;
            print_json(&api_key)?;
        }
        Commands::Promote { user } => {
            let profile = ProfileRepository::new(pool)
                .set_role(user, UserRole::SuperAdmin)
                .await?
                .with_context(|| {
                    format!("Profile {} not found; the user must sign in once first", user)
                })?;
            print_json(&profile)?;
        }
    }

    Ok(())
}
