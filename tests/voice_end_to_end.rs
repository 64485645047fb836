//! Sign in, walk the voice wizard over the JSON API and check the stored
//! record, with the BaaS mocked at the HTTP level.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use parivaani::config::Config;
use parivaani::gateway::{build_router, AppState};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header as header_eq, method, path};
use wiremock::{Mock, MockServer, Request as MockRequest, Respond, ResponseTemplate};

/// Echo a created record back as PostgREST does, with an assigned id.
struct EchoCreated;

impl Respond for EchoCreated {
    fn respond(&self, request: &MockRequest) -> ResponseTemplate {
        let mut doc: Value = serde_json::from_slice(&request.body).unwrap();
        doc["id"] = json!(42);
        ResponseTemplate::new(201).set_body_json(json!([doc]))
    }
}

async fn mock_baas() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(body_partial_json(json!({"email": "meera@example.com", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "jwt-1",
            "user": {"id": "u1", "email": "meera@example.com"},
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header_eq("Authorization", "Bearer jwt-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "u1"})))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/functions/v1/ai/text"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "  வணக்கம்  "})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/functions/v1/ai/speech"))
        .and(body_partial_json(json!({"text": "வணக்கம்", "voice": "onyx"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"url": "https://cdn.test/ta.mp3"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/voiceGenerations"))
        .and(body_partial_json(json!({
            "userId": "u1",
            "script": "Hello friends",
            "translatedText": "வணக்கம்",
            "language": "ta",
            "voice": "male-1",
        })))
        .respond_with(EchoCreated)
        .mount(&server)
        .await;

    server
}

fn app_for(server: &MockServer) -> Router {
    let mut config = Config::default();
    config.baas.url = server.uri();
    config.baas.anon_key = "anon-key".into();
    let state = AppState::from_config(&config).unwrap();
    build_router(state, &config.gateway)
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let resp = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let server = mock_baas().await;
    let app = app_for(&server);
    let (status, json) = call(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "meera@example.com", "password": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Invalid email or password");
}

#[tokio::test]
async fn voiceover_from_sign_in_to_result() {
    let server = mock_baas().await;
    let app = app_for(&server);

    let (status, json) = call(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "meera@example.com", "password": "secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = json["token"].as_str().unwrap().to_string();

    let commands = [
        json!({"action": "set_script", "script": "Hello friends"}),
        json!({"action": "next"}),
        json!({"action": "set_language", "language": "ta"}),
        json!({"action": "next"}),
        json!({"action": "set_voice", "voice": "male-1"}),
        json!({"action": "next"}),
        json!({"action": "next"}),
        json!({"action": "generate"}),
    ];
    let mut last = Value::Null;
    for command in commands {
        let (status, json) =
            call(&app, "POST", "/api/wizards/voice", Some(&token), Some(command)).await;
        assert_eq!(status, StatusCode::OK);
        last = json;
    }
    assert_eq!(last["step"], 5);
    assert_eq!(last["generating"], true);

    let mut view = Value::Null;
    for _ in 0..200 {
        let (_, json) = call(&app, "GET", "/api/wizards/voice", Some(&token), None).await;
        if json["generating"] == false {
            view = json;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert!(view["notice"].is_null(), "unexpected notice: {}", view["notice"]);
    let result = &view["result"];
    assert_eq!(result["record_id"], "42");
    assert_eq!(result["audio_url"], "https://cdn.test/ta.mp3");
    assert_eq!(result["translated_text"], "வணக்கம்");
    assert_eq!(result["estimated_duration_secs"], 1);
    assert!(result["download_filename"]
        .as_str()
        .unwrap()
        .starts_with("parivaani-Tamil-Arjun-"));

    let stored = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/rest/v1/voiceGenerations")
        .count();
    assert_eq!(stored, 1);
}

#[tokio::test]
async fn wizard_api_requires_a_token() {
    let server = mock_baas().await;
    let app = app_for(&server);
    let (status, _) = call(&app, "GET", "/api/wizards/voice", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(&app, "GET", "/api/wizards/voice", Some("forged"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
