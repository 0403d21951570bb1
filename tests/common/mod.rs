#![allow(dead_code)]

use axum::{http::StatusCode, routing::post, Json, Router};
use axum_test::TestServer;
use blogforge::ai::{AiClient, AiService, Provider};
use blogforge::config::{Config, ProviderConfig};
use blogforge::db::Database;
use blogforge::routes::auth::seed_admin;
use blogforge::{build_app, AppState, SharedState};
use serde_json::{json, Value};
use tempfile::TempDir;

pub struct TestApp {
    pub server: TestServer,
    pub state: SharedState,
    // Keeps the upload directory alive for the test.
    pub dir: TempDir,
}

/// App with an in-memory database, a seeded admin and the given providers.
pub async fn spawn_app(providers: Vec<Provider>) -> TestApp {
    spawn_app_with(Config::default(), providers).await
}

/// Like [`spawn_app`], starting from a custom config.
pub async fn spawn_app_with(mut config: Config, providers: Vec<Provider>) -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    config.uploads.static_dir = dir.path().join("static");

    let db = Database::open_in_memory().expect("in-memory database");
    seed_admin(&db, &config.admin).await.expect("seed admin");

    let ai = AiService::new(AiClient::new(providers, 5).expect("ai client"));
    let state = AppState::new(config, db, ai);
    let server = TestServer::new(build_app(state.clone())).expect("test server");

    TestApp { server, state, dir }
}

pub async fn offline_app() -> TestApp {
    spawn_app(vec![]).await
}

fn reply(content: &str) -> Json<Value> {
    Json(json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    }))
}

/// Canned answer chosen from the system prompt, like a very obedient model.
async fn chat_completions(Json(body): Json<Value>) -> Json<Value> {
    let messages = body["messages"].as_array().cloned().unwrap_or_default();
    let system = messages
        .iter()
        .find(|m| m["role"] == "system")
        .and_then(|m| m["content"].as_str())
        .unwrap_or("")
        .to_string();
    let has_image = messages.iter().any(|m| m["content"].is_array());

    if has_image {
        return reply(&format!("A red bicycle leaning on a wall. model={}", body["model"].as_str().unwrap_or("")));
    }
    if system.contains("AI detection") {
        return reply("Score: 88\nAnalysis: Natural, varied phrasing.");
    }
    if system.contains("copywriter") {
        return reply("1. Alpha Rising\n2) Beta Days\n- \"Gamma Notes\"\nDelta\nEpsilon\nZeta");
    }
    if system.contains("Extract the main topic") {
        return reply("Rust memory safety");
    }
    if system.contains("translator") {
        return reply("Bonjour le monde");
    }
    if system.contains("grammar editor") {
        return reply("This sentence is correct.");
    }
    if system.contains("Rewrite the following text") {
        return reply("Kindly consider this revised text.");
    }
    if system.contains("summarizes") {
        return reply("A short summary.");
    }
    reply("## Introduction\n\nDeep dive.\n\n[IMAGE: a chart]\n\n\nClosing thoughts.")
}

async fn failing_completions() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded")
}

/// Start a local chat-completions mock and return its base address.
pub async fn spawn_mock_provider() -> String {
    let app = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .route("/broken/chat/completions", post(failing_completions));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock provider");
    let addr = listener.local_addr().expect("mock address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock provider");
    });

    format!("http://{}", addr)
}

pub fn provider(name: &str, base_url: String, vision: bool) -> Provider {
    let config = ProviderConfig {
        name: name.to_string(),
        base_url,
        api_key_env: "BLOGFORGE_TEST_KEY".to_string(),
        model: format!("{}-text", name.to_lowercase()),
        vision_model: vision.then(|| format!("{}-vision", name.to_lowercase())),
    };
    Provider::with_key(&config, "test-key")
}

pub async fn register(server: &TestServer, email: &str, name: &str, password: &str) -> i64 {
    let resp = server
        .post("/api/auth/register")
        .json(&json!({ "email": email, "password": password, "full_name": name }))
        .await;
    assert_eq!(resp.status_code(), 200);
    resp.json::<Value>()["user_id"].as_i64().expect("user id")
}

pub async fn create_blog(server: &TestServer, body: Value) -> i64 {
    let resp = server.post("/api/blog/create").json(&body).await;
    assert_eq!(resp.status_code(), 200);
    resp.json::<Value>()["blog"]["id"].as_i64().expect("blog id")
}
