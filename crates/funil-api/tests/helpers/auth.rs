use super::TEST_JWT_SECRET;
use chrono::{Duration, Utc};
use funil_api::auth::models::JwtClaims;
use funil_core::models::{CreateTenantRequest, UserRole};
use funil_core::IssuedKey;
use funil_db::{ApiKeyRepository, ProfileRepository, TenantRepository};
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::PgPool;
use uuid::Uuid;

/// Session identity as the identity provider would issue it
pub struct TestUser {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

/// Tenant created directly in the database with one active API key
pub struct TestTenant {
    pub tenant_id: Uuid,
    pub api_key_id: Uuid,
    pub api_key: String,
}

pub fn mint_token(user_id: Uuid, email: &str, name: Option<&str>, secret: &str) -> String {
    let claims = JwtClaims {
        sub: user_id,
        email: email.to_string(),
        exp: (Utc::now() + Duration::hours(1)).timestamp(),
        iat: Some(Utc::now().timestamp()),
        name: name.map(str::to_string),
        user_metadata: None,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to sign test token")
}

/// A fresh session user; the profile and tenant appear on first request.
pub fn session_user(name: &str) -> TestUser {
    let user_id = Uuid::new_v4();
    let email = format!("{}-{}@example.com", name.to_lowercase(), user_id.simple());
    let token = mint_token(user_id, &email, Some(name), TEST_JWT_SECRET);
    TestUser {
        user_id,
        email,
        token,
    }
}

/// Elevate an existing profile to super-admin
pub async fn promote_to_super_admin(pool: &PgPool, user_id: Uuid) {
    ProfileRepository::new(pool.clone())
        .set_role(user_id, UserRole::SuperAdmin)
        .await
        .expect("Failed to set role")
        .expect("Profile must exist before promotion");
}

/// Create a tenant and issue it an API key
pub async fn create_tenant_with_key(pool: &PgPool, name: &str) -> TestTenant {
    let tenant = TenantRepository::new(pool.clone())
        .create_tenant(&CreateTenantRequest {
            name: name.to_string(),
            email: None,
            phone: None,
            plan_id: None,
            status: None,
        })
        .await
        .expect("Failed to create tenant");

    let (api_key_id, api_key) = issue_key(pool, tenant.id, "test key").await;
    TestTenant {
        tenant_id: tenant.id,
        api_key_id,
        api_key,
    }
}

pub async fn issue_key(pool: &PgPool, tenant_id: Uuid, name: &str) -> (Uuid, String) {
    let issued = IssuedKey::generate();
    let record = ApiKeyRepository::new(pool.clone())
        .create_api_key(tenant_id, name, None, &issued.hash, &issued.prefix)
        .await
        .expect("Failed to create API key");
    (record.id, issued.secret)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
