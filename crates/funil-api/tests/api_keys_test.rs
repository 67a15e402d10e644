//! API key issuance and revocation integration tests.
//!
//! Run with: `cargo test -p funil-api --test api_keys_test -- --ignored`
//! Requires Docker for testcontainers (Postgres).

mod helpers;

use helpers::auth::{bearer, create_tenant_with_key, session_user};
use helpers::setup_test_app;
use serde_json::{json, Value};

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_issued_key_authenticates_until_revoked() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = session_user("Ana");

    let response = client
        .post("/api/api-keys")
        .add_header("Authorization", bearer(&user.token))
        .json(&json!({ "name": "Zapier" }))
        .await;
    assert_eq!(response.status_code(), 201);
    let issued = response.json::<Value>();
    let secret = issued["api_key"].as_str().unwrap().to_string();
    let key_id = issued["id"].as_str().unwrap().to_string();
    assert!(secret.starts_with("fbn_"));
    assert!(secret.starts_with(issued["key_prefix"].as_str().unwrap()));

    let response = client
        .get("/api/api-keys")
        .add_header("Authorization", bearer(&user.token))
        .await;
    let listed = response.json::<Value>();
    let keys = listed["api_keys"].as_array().unwrap();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].get("api_key").is_none());
    assert!(keys[0].get("key_hash").is_none());

    let response = client
        .get("/api/v1/boards")
        .add_header("Authorization", bearer(&secret))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = client
        .delete(&format!("/api/api-keys/{}", key_id))
        .add_header("Authorization", bearer(&user.token))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = client
        .get("/api/v1/boards")
        .add_header("Authorization", bearer(&secret))
        .await;
    assert_eq!(response.status_code(), 401);
    assert_eq!(response.json::<Value>()["error"], "API key inválida");

    let response = client
        .delete(&format!("/api/api-keys/{}", key_id))
        .add_header("Authorization", bearer(&user.token))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = client
        .get("/api/api-keys")
        .add_header("Authorization", bearer(&user.token))
        .await;
    assert!(response.json::<Value>()["api_keys"]
        .as_array()
        .unwrap()
        .is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_issue_key_requires_name() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = session_user("Ana");

    let response = client
        .post("/api/api-keys")
        .add_header("Authorization", bearer(&user.token))
        .json(&json!({ "name": "  " }))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["error"], "name é obrigatório");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_cannot_revoke_other_tenants_key() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = session_user("Ana");
    let foreign = create_tenant_with_key(&app.pool, "Outra").await;

    let response = client
        .delete(&format!("/api/api-keys/{}", foreign.api_key_id))
        .add_header("Authorization", bearer(&user.token))
        .await;
    assert_eq!(response.status_code(), 404);

    let response = client
        .get("/api/v1/boards")
        .add_header("Authorization", bearer(&foreign.api_key))
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_unknown_key_is_rejected() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .get("/api/v1/boards")
        .add_header("Authorization", bearer("fbn_0000000000000000000000000000"))
        .await;

    assert_eq!(response.status_code(), 401);
    assert_eq!(response.json::<Value>()["error"], "API key inválida");
}
