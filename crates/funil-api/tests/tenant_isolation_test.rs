//! Cross-tenant isolation integration tests.
//!
//! Run with: `cargo test -p funil-api --test tenant_isolation_test -- --ignored`
//! Requires Docker for testcontainers (Postgres).

mod helpers;

use helpers::auth::{bearer, create_tenant_with_key, session_user};
use helpers::fixtures::{create_board, create_card, create_tag};
use helpers::setup_test_app;
use serde_json::{json, Value};

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_boards_of_other_tenant_are_invisible() {
    let app = setup_test_app().await;
    let client = app.client();
    let acme = create_tenant_with_key(&app.pool, "Acme").await;
    let globex = create_tenant_with_key(&app.pool, "Globex").await;

    let board = create_board(client, "/api/v1", &acme.api_key, "Vendas").await;
    let card = create_card(
        client,
        "/api/v1",
        &acme.api_key,
        board.id,
        board.stage_ids[0],
        "Lead",
    )
    .await;

    let response = client
        .get("/api/v1/boards")
        .add_header("Authorization", bearer(&globex.api_key))
        .await;
    assert!(response.json::<Value>()["boards"]
        .as_array()
        .unwrap()
        .is_empty());

    let paths = [
        format!("/api/v1/boards/{}", board.id),
        format!("/api/v1/boards/{}/cards", board.id),
        format!("/api/v1/boards/{}/cards/{}", board.id, card),
    ];
    for path in &paths {
        let response = client
            .get(path)
            .add_header("Authorization", bearer(&globex.api_key))
            .await;
        assert_eq!(response.status_code(), 404, "{}", path);
    }

    let response = client
        .delete(&format!("/api/v1/boards/{}", board.id))
        .add_header("Authorization", bearer(&globex.api_key))
        .await;
    assert_eq!(response.status_code(), 404);

    let response = client
        .get(&format!("/api/v1/boards/{}", board.id))
        .add_header("Authorization", bearer(&acme.api_key))
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_stages_of_other_tenant_are_invisible() {
    let app = setup_test_app().await;
    let client = app.client();
    let ana = session_user("Ana");
    let bia = session_user("Bia");
    let board = create_board(client, "/api", &ana.token, "Vendas").await;
    let stage = board.stage_ids[0];

    let response = client
        .get(&format!("/api/boards/{}/stages", board.id))
        .add_header("Authorization", bearer(&bia.token))
        .await;
    assert_eq!(response.status_code(), 404);

    let response = client
        .post(&format!("/api/boards/{}/stages/{}/normalize", board.id, stage))
        .add_header("Authorization", bearer(&bia.token))
        .await;
    assert_eq!(response.status_code(), 404);

    let response = client
        .delete(&format!("/api/boards/{}/stages/{}", board.id, stage))
        .add_header("Authorization", bearer(&bia.token))
        .await;
    assert_eq!(response.status_code(), 404);

    let response = client
        .get(&format!("/api/boards/{}/stages", board.id))
        .add_header("Authorization", bearer(&ana.token))
        .await;
    assert_eq!(response.json::<Value>()["stages"].as_array().unwrap().len(), 4);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_foreign_tags_cannot_be_attached() {
    let app = setup_test_app().await;
    let client = app.client();
    let ana = session_user("Ana");
    let bia = session_user("Bia");

    let board = create_board(client, "/api", &ana.token, "Vendas").await;
    let card = create_card(client, "/api", &ana.token, board.id, board.stage_ids[0], "Lead").await;
    let foreign_tag = create_tag(client, &bia.token, "Quente").await;

    let response = client
        .put(&format!("/api/boards/{}/cards/{}/tags", board.id, card))
        .add_header("Authorization", bearer(&ana.token))
        .json(&json!({ "tagIds": [foreign_tag] }))
        .await;

    assert_eq!(response.status_code(), 200);
    assert!(response.json::<Value>()["tags"]
        .as_array()
        .unwrap()
        .is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_session_users_get_separate_tenants() {
    let app = setup_test_app().await;
    let client = app.client();
    let ana = session_user("Ana");
    let bia = session_user("Bia");

    create_board(client, "/api", &ana.token, "Vendas").await;

    let response = client
        .get("/api/boards")
        .add_header("Authorization", bearer(&bia.token))
        .await;
    assert_eq!(response.status_code(), 200);
    assert!(response.json::<Value>()["boards"]
        .as_array()
        .unwrap()
        .is_empty());
}
