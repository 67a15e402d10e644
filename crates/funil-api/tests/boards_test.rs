//! Board, stage and card API integration tests.
//!
//! Run with: `cargo test -p funil-api --test boards_test -- --ignored`
//! Requires Docker for testcontainers (Postgres).

mod helpers;

use helpers::auth::{bearer, create_tenant_with_key, session_user};
use helpers::fixtures::{create_board, create_card, create_tag};
use helpers::setup_test_app;
use serde_json::{json, Value};

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_every_board_gets_default_stages() {
    let app = setup_test_app().await;
    let client = app.client();
    let tenant = create_tenant_with_key(&app.pool, "Acme").await;

    for name in ["Vendas", "Pós-venda", "Parcerias"] {
        let board = create_board(client, "/api/v1", &tenant.api_key, name).await;
        assert_eq!(board.stage_ids.len(), 4);

        let response = client
            .get(&format!("/api/v1/boards/{}", board.id))
            .add_header("Authorization", bearer(&tenant.api_key))
            .await;
        let body = response.json::<Value>();
        let stages: Vec<(&str, i64)> = body["board"]["stages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| (s["name"].as_str().unwrap(), s["position"].as_i64().unwrap()))
            .collect();
        assert_eq!(
            stages,
            [("New", 0), ("Contacted", 1), ("Qualified", 2), ("Converted", 3)]
        );
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_board_requires_name() {
    let app = setup_test_app().await;
    let client = app.client();
    let tenant = create_tenant_with_key(&app.pool, "Acme").await;

    let response = client
        .post("/api/v1/boards")
        .add_header("Authorization", bearer(&tenant.api_key))
        .json(&json!({ "name": "   " }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_list_update_and_delete_board() {
    let app = setup_test_app().await;
    let client = app.client();
    let tenant = create_tenant_with_key(&app.pool, "Acme").await;
    let board = create_board(client, "/api/v1", &tenant.api_key, "Vendas").await;

    let response = client
        .patch(&format!("/api/v1/boards/{}", board.id))
        .add_header("Authorization", bearer(&tenant.api_key))
        .json(&json!({ "name": "Pós-venda", "description": "Clientes ativos" }))
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["board"]["name"], "Pós-venda");

    let response = client
        .get("/api/v1/boards")
        .add_header("Authorization", bearer(&tenant.api_key))
        .await;
    let boards = response.json::<Value>()["boards"].clone();
    assert_eq!(boards.as_array().unwrap().len(), 1);
    assert_eq!(boards[0]["description"], "Clientes ativos");

    let response = client
        .delete(&format!("/api/v1/boards/{}", board.id))
        .add_header("Authorization", bearer(&tenant.api_key))
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>(), json!({ "success": true }));

    let response = client
        .get(&format!("/api/v1/boards/{}", board.id))
        .add_header("Authorization", bearer(&tenant.api_key))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_card_lifecycle() {
    let app = setup_test_app().await;
    let client = app.client();
    let tenant = create_tenant_with_key(&app.pool, "Acme").await;
    let board = create_board(client, "/api/v1", &tenant.api_key, "Vendas").await;

    let card_id = create_card(
        client,
        "/api/v1",
        &tenant.api_key,
        board.id,
        board.stage_ids[0],
        "Maria",
    )
    .await;

    let response = client
        .get(&format!("/api/v1/boards/{}/cards/{}", board.id, card_id))
        .add_header("Authorization", bearer(&tenant.api_key))
        .await;
    assert_eq!(response.status_code(), 200);
    let card = response.json::<Value>()["card"].clone();
    assert_eq!(card["stage_name"], "New");
    assert_eq!(card["status"], "active");
    assert_eq!(card["position"], 0);
    assert!(card["created_by"].is_null());

    let response = client
        .patch(&format!("/api/v1/boards/{}/cards/{}", board.id, card_id))
        .add_header("Authorization", bearer(&tenant.api_key))
        .json(&json!({ "email": "maria@example.com", "stageId": board.stage_ids[2] }))
        .await;
    assert_eq!(response.status_code(), 200);
    let card = response.json::<Value>()["card"].clone();
    assert_eq!(card["email"], "maria@example.com");
    assert_eq!(card["stage_name"], "Qualified");

    let response = client
        .delete(&format!("/api/v1/boards/{}/cards/{}", board.id, card_id))
        .add_header("Authorization", bearer(&tenant.api_key))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = client
        .get(&format!("/api/v1/boards/{}/cards", board.id))
        .add_header("Authorization", bearer(&tenant.api_key))
        .await;
    assert!(response.json::<Value>()["cards"]
        .as_array()
        .unwrap()
        .is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_card_validation() {
    let app = setup_test_app().await;
    let client = app.client();
    let tenant = create_tenant_with_key(&app.pool, "Acme").await;
    let board = create_board(client, "/api/v1", &tenant.api_key, "Vendas").await;
    let other = create_board(client, "/api/v1", &tenant.api_key, "Outro").await;

    let response = client
        .post(&format!("/api/v1/boards/{}/cards", board.id))
        .add_header("Authorization", bearer(&tenant.api_key))
        .json(&json!({ "title": "Sem etapa" }))
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(
        response.json::<Value>()["error"],
        "stageId e title são obrigatórios"
    );

    let response = client
        .post(&format!("/api/v1/boards/{}/cards", board.id))
        .add_header("Authorization", bearer(&tenant.api_key))
        .json(&json!({ "stageId": other.stage_ids[0], "title": "Etapa de outro quadro" }))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_stage_management() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = session_user("Ana");
    let board = create_board(client, "/api", &user.token, "Vendas").await;

    let response = client
        .post(&format!("/api/boards/{}/stages", board.id))
        .add_header("Authorization", bearer(&user.token))
        .json(&json!({ "name": "Perdido", "color": "not-a-color" }))
        .await;
    assert_eq!(response.status_code(), 400);

    let response = client
        .post(&format!("/api/boards/{}/stages", board.id))
        .add_header("Authorization", bearer(&user.token))
        .json(&json!({ "name": "Perdido", "color": "#ef4444" }))
        .await;
    assert_eq!(response.status_code(), 201);
    let stage = response.json::<Value>()["stage"].clone();
    assert_eq!(stage["position"], 4);

    let response = client
        .get(&format!("/api/boards/{}/stages", board.id))
        .add_header("Authorization", bearer(&user.token))
        .await;
    assert_eq!(response.json::<Value>()["stages"].as_array().unwrap().len(), 5);

    let response = client
        .delete(&format!(
            "/api/boards/{}/stages/{}",
            board.id,
            stage["id"].as_str().unwrap()
        ))
        .add_header("Authorization", bearer(&user.token))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = client
        .get(&format!("/api/boards/{}/stages", board.id))
        .add_header("Authorization", bearer(&user.token))
        .await;
    assert_eq!(response.json::<Value>()["stages"].as_array().unwrap().len(), 4);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_set_card_tags_through_session() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = session_user("Ana");
    let board = create_board(client, "/api", &user.token, "Vendas").await;
    let card_id = create_card(
        client,
        "/api",
        &user.token,
        board.id,
        board.stage_ids[0],
        "Lead",
    )
    .await;
    let hot = create_tag(client, &user.token, "Quente").await;
    let new = create_tag(client, &user.token, "New").await;

    let response = client
        .put(&format!("/api/boards/{}/cards/{}/tags", board.id, card_id))
        .add_header("Authorization", bearer(&user.token))
        .json(&json!({ "tagIds": [hot, new] }))
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["tags"].as_array().unwrap().len(), 2);

    let response = client
        .get(&format!("/api/boards/{}", board.id))
        .add_header("Authorization", bearer(&user.token))
        .await;
    let body = response.json::<Value>();
    let cards = body["board"]["stages"][0]["cards"].as_array().unwrap();
    assert_eq!(cards[0]["tags"].as_array().unwrap().len(), 2);
    assert_eq!(cards[0]["created_by"], json!(user.user_id));
}
