//! Dashboard integration tests.
//!
//! Run with: `cargo test -p funil-api --test dashboard_test -- --ignored`
//! Requires Docker for testcontainers (Postgres).

mod helpers;

use helpers::auth::{bearer, session_user};
use helpers::fixtures::{create_board, create_card, create_tag};
use helpers::setup_test_app;
use serde_json::{json, Value};

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_dashboard_counts_leads_by_tag() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = session_user("Ana");

    let board = create_board(client, "/api", &user.token, "Vendas").await;
    let stage = board.stage_ids[0];
    let won = create_card(client, "/api", &user.token, board.id, stage, "Ganho").await;
    create_card(client, "/api", &user.token, board.id, stage, "Aberto").await;

    let converted = create_tag(client, &user.token, "converted").await;
    let response = client
        .put(&format!("/api/boards/{}/cards/{}/tags", board.id, won))
        .add_header("Authorization", bearer(&user.token))
        .json(&json!({ "tagIds": [converted] }))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = client
        .get("/api/dashboard?days=6")
        .add_header("Authorization", bearer(&user.token))
        .await;
    assert_eq!(response.status_code(), 200);

    let stats = response.json::<Value>();
    assert_eq!(stats["total_leads"], 2);
    assert_eq!(stats["converted_leads"], 1);
    assert_eq!(stats["new_leads"], 0);
    assert_eq!(stats["conversion_rate"], 0.5);
    assert_eq!(stats["leads_by_tag"].as_array().unwrap().len(), 5);
    assert_eq!(stats["leads_over_time"].as_array().unwrap().len(), 7);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_dashboard_custom_field_breakdown() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = session_user("Ana");

    let response = client
        .post("/api/custom-fields")
        .add_header("Authorization", bearer(&user.token))
        .json(&json!({ "name": "Origem", "fieldType": "text" }))
        .await;
    assert_eq!(response.status_code(), 201);
    let field_id = response.json::<Value>()["custom_field"]["id"].clone();

    for (name, origin) in [("Ana", "Instagram"), ("Bia", "Instagram"), ("Caio", "Google")] {
        let response = client
            .post("/api/contacts")
            .add_header("Authorization", bearer(&user.token))
            .json(&json!({
                "name": name,
                "phone": "+55 11 99999-0000",
                "customValues": [{ "fieldId": field_id, "value": origin }]
            }))
            .await;
        assert_eq!(response.status_code(), 201, "{}", response.text());
    }

    let response = client
        .get("/api/dashboard")
        .add_header("Authorization", bearer(&user.token))
        .await;
    let stats = response.json::<Value>();
    let breakdown = stats["custom_field_breakdown"].as_array().unwrap();
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0]["field_name"], "Origem");
    assert_eq!(
        breakdown[0]["values"],
        json!([
            { "value": "Instagram", "count": 2 },
            { "value": "Google", "count": 1 }
        ])
    );
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_dashboard_rejects_inverted_range() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = session_user("Ana");

    let response = client
        .get("/api/dashboard?start=2025-03-10&end=2025-03-01")
        .add_header("Authorization", bearer(&user.token))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_recent_leads_newest_first() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = session_user("Ana");

    let board = create_board(client, "/api", &user.token, "Vendas").await;
    for title in ["Primeiro", "Segundo", "Terceiro"] {
        create_card(client, "/api", &user.token, board.id, board.stage_ids[1], title).await;
    }

    let response = client
        .get("/api/dashboard/recent-leads?limit=2")
        .add_header("Authorization", bearer(&user.token))
        .await;
    assert_eq!(response.status_code(), 200);

    let body = response.json::<Value>();
    let leads = body["leads"].as_array().unwrap();
    assert_eq!(leads.len(), 2);
    assert_eq!(leads[0]["title"], "Terceiro");
    assert_eq!(leads[0]["stage_name"], "Contacted");
}
