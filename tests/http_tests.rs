// HTTP API tests
//
// Requests go straight through the router with tower's oneshot; no socket
// is bound and no speech services are configured.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use recipe_copilot::{create_router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    create_router(AppState::default())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(body) => Body::from(body.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, value)
}

fn soup() -> Value {
    json!({
        "recipe": {
            "recipeName": "Onion Soup",
            "ingredients": ["2 onions", "1 l stock"],
            "instructions": "1. Chop onions\n2. Simmer for 10 minutes\n3. Serve"
        }
    })
}

async fn enter(app: &Router, body: Value) -> String {
    let (status, value) = send(app, "POST", "/copilot/session", Some(body)).await;
    assert_eq!(status, StatusCode::OK, "enter failed: {}", value);
    value["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_enter_and_navigate() {
    let app = app();
    let (status, value) = send(&app, "POST", "/copilot/session", Some(soup())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["recipe"]["recipeName"], "Onion Soup");
    assert_eq!(value["status"]["step_index"], 0);
    assert_eq!(value["status"]["step_count"], 3);
    assert_eq!(value["status"]["step_text"], "Chop onions");
    assert_eq!(value["status"]["timer"], "no_timer");
    assert_eq!(value["status"]["narration_supported"], false);

    let id = value["session_id"].as_str().unwrap().to_string();

    let (status, value) = send(&app, "POST", &format!("/copilot/session/{}/next", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["step_index"], 1);
    assert_eq!(value["remaining_seconds"], 600);
    assert_eq!(value["remaining_display"], "10:00");

    let (_, value) = send(&app, "POST", &format!("/copilot/session/{}/timer/toggle", id), None).await;
    assert_eq!(value["timer_running"], true);
    assert_eq!(value["timer"], "running");

    let (_, value) = send(&app, "POST", &format!("/copilot/session/{}/timer/reset", id), None).await;
    assert_eq!(value["timer_running"], false);
    assert_eq!(value["remaining_seconds"], 600);

    // Out of range: unchanged
    let (status, value) = send(&app, "POST", &format!("/copilot/session/{}/step/7", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["step_index"], 1);

    let (_, value) = send(&app, "POST", &format!("/copilot/session/{}/step/2", id), None).await;
    assert_eq!(value["step_index"], 2);
    assert_eq!(value["is_last_step"], true);

    let (_, value) = send(&app, "POST", &format!("/copilot/session/{}/previous", id), None).await;
    assert_eq!(value["step_index"], 1);
}

#[tokio::test]
async fn test_enter_with_transformed_recipe() {
    let app = app();
    let body = json!({
        "transformed_recipe": "Recipe Name: Quick Soup\nIngredients:\n- stock\nInstructions:\n1. Heat stock\n2. Simmer 5 minutes"
    });

    let (status, value) = send(&app, "POST", "/copilot/session", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["recipe"]["recipeName"], "Quick Soup");
    assert_eq!(value["recipe"]["ingredients"], json!(["stock"]));
    assert_eq!(value["status"]["step_count"], 2);
    assert_eq!(value["status"]["step_text"], "Heat stock");
}

#[tokio::test]
async fn test_enter_requires_recipe() {
    let (status, value) = send(&app(), "POST", "/copilot/session", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(value["error"].as_str().unwrap().contains("recipe"));
}

#[tokio::test]
async fn test_unknown_session_not_found() {
    let (status, value) = send(&app(), "GET", "/copilot/session/copilot-missing", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["error"], "Session copilot-missing not found");
}

#[tokio::test]
async fn test_new_session_replaces_previous() {
    let app = app();
    let first = enter(&app, soup()).await;
    let second = enter(&app, soup()).await;
    assert_ne!(first, second);

    let (status, _) = send(&app, "GET", &format!("/copilot/session/{}", first), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, value) = send(&app, "GET", &format!("/copilot/session/{}", second), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["exited"], false);
}

#[tokio::test]
async fn test_text_commands() {
    let app = app();
    let id = enter(&app, soup()).await;
    let uri = format!("/copilot/session/{}/command", id);

    let (_, value) = send(&app, "POST", &uri, Some(json!({ "text": "Next please" }))).await;
    assert_eq!(value["command"], "next");
    assert_eq!(value["status"]["step_index"], 1);

    let (_, value) = send(&app, "POST", &uri, Some(json!({ "text": "turn off the lights" }))).await;
    assert_eq!(value["command"], Value::Null);
    assert_eq!(value["status"]["step_index"], 1);

    let (_, value) = send(&app, "POST", &uri, Some(json!({ "text": "start timer" }))).await;
    assert_eq!(value["command"], "toggle_timer");
    assert_eq!(value["status"]["timer_running"], true);

    let (_, value) = send(&app, "POST", &uri, Some(json!({ "text": "we're finished" }))).await;
    assert_eq!(value["command"], "exit");
    assert_eq!(value["status"]["exited"], true);

    let (status, _) = send(&app, "GET", &format!("/copilot/session/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_exit_session() {
    let app = app();
    let id = enter(&app, soup()).await;

    let (status, value) = send(&app, "DELETE", &format!("/copilot/session/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["exited"], true);

    let (status, _) = send(&app, "DELETE", &format!("/copilot/session/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_speech_toggles_without_support() {
    let app = app();
    let id = enter(&app, soup()).await;

    let (status, value) =
        send(&app, "POST", &format!("/copilot/session/{}/listening/toggle", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["listening"], false);
    assert_eq!(value["listening_supported"], false);

    let (status, value) =
        send(&app, "POST", &format!("/copilot/session/{}/narration/toggle", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["narration"], "idle");
}
