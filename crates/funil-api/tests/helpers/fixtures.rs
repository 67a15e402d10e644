use super::auth::bearer;
use axum_test::TestServer;
use serde_json::{json, Value};
use uuid::Uuid;

pub struct TestBoard {
    pub id: Uuid,
    /// Default stages, left to right
    pub stage_ids: Vec<Uuid>,
}

fn uuid_at(value: &Value, pointer: &str) -> Uuid {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(|| panic!("Missing UUID at {} in {}", pointer, value))
}

/// Create a board under `prefix` and read its default stages from the board detail
pub async fn create_board(client: &TestServer, prefix: &str, token: &str, name: &str) -> TestBoard {
    let response = client
        .post(&format!("{}/boards", prefix))
        .add_header("Authorization", bearer(token))
        .json(&json!({ "name": name }))
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    let id = uuid_at(&response.json::<Value>(), "/board/id");

    let response = client
        .get(&format!("{}/boards/{}", prefix, id))
        .add_header("Authorization", bearer(token))
        .await;
    assert_eq!(response.status_code(), 200, "{}", response.text());
    let body = response.json::<Value>();
    let stage_ids = body["board"]["stages"]
        .as_array()
        .map(|stages| {
            stages
                .iter()
                .map(|stage| uuid_at(stage, "/id"))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    TestBoard { id, stage_ids }
}

/// Create a card and return its id
pub async fn create_card(
    client: &TestServer,
    prefix: &str,
    token: &str,
    board_id: Uuid,
    stage_id: Uuid,
    title: &str,
) -> Uuid {
    let response = client
        .post(&format!("{}/boards/{}/cards", prefix, board_id))
        .add_header("Authorization", bearer(token))
        .json(&json!({ "stageId": stage_id, "title": title }))
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    uuid_at(&response.json::<Value>(), "/card/id")
}

/// Titles of a stage's cards in board order
pub async fn stage_titles(
    client: &TestServer,
    prefix: &str,
    token: &str,
    board_id: Uuid,
    stage_id: Uuid,
) -> Vec<String> {
    let response = client
        .get(&format!("{}/boards/{}", prefix, board_id))
        .add_header("Authorization", bearer(token))
        .await;
    assert_eq!(response.status_code(), 200);
    let body = response.json::<Value>();

    body["board"]["stages"]
        .as_array()
        .into_iter()
        .flatten()
        .find(|stage| stage["id"] == json!(stage_id))
        .and_then(|stage| stage["cards"].as_array())
        .map(|cards| {
            cards
                .iter()
                .filter_map(|card| card["title"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

pub async fn create_tag(client: &TestServer, token: &str, name: &str) -> Uuid {
    let response = client
        .post("/api/tags")
        .add_header("Authorization", bearer(token))
        .json(&json!({ "name": name }))
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    uuid_at(&response.json::<Value>(), "/tag/id")
}
