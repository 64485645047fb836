//! HTTP-level behavior of the BaaS adapter against a mock server.

use parivaani::baas::{
    AiClient, AuthProvider, BaasClient, BlobStorage, Collection, Database, ListQuery,
    SpeechRequest, UploadOptions,
};
use parivaani::config::BaasConfig;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> BaasClient {
    BaasClient::new(BaasConfig {
        url: server.uri(),
        anon_key: "anon-key".into(),
        ..BaasConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn sign_in_posts_password_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", "anon-key"))
        .and(body_json(serde_json::json!({
            "email": "meera@example.com",
            "password": "secret",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "jwt-123",
            "token_type": "bearer",
            "user": {"id": "u1", "email": "meera@example.com"},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = client_for(&server)
        .sign_in("meera@example.com", "secret")
        .await
        .unwrap();
    assert_eq!(session.access_token, "jwt-123");
    assert_eq!(session.user.id, "u1");
}

#[tokio::test]
async fn rejected_sign_in_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .sign_in("meera@example.com", "wrong")
        .await
        .unwrap_err()
        .to_string();
    assert!(err.contains("400"));
    assert!(err.contains("invalid_grant"));
}

#[tokio::test]
async fn expired_token_resolves_to_no_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "u1"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.user_for_token("stale").await.unwrap().is_none());
    let user = client.user_for_token("fresh").await.unwrap().unwrap();
    assert_eq!(user.id, "u1");
    assert_eq!(user.email, None);
}

#[tokio::test]
async fn list_uses_postgrest_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/voiceGenerations"))
        .and(query_param("userId", "eq.u1"))
        .and(query_param("order", "createdAt.desc"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "id": 7,
            "userId": "u1",
            "script": "Hello",
            "translatedText": "नमस्ते",
            "language": "hi",
            "voice": "female-1",
            "speed": 1.0,
            "audioUrl": "https://cdn.test/a.mp3",
            "createdAt": "2026-03-01T10:00:00Z",
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let db: Arc<dyn Database> = Arc::new(client_for(&server));
    let rows = Collection::voice_generations(db)
        .list(&ListQuery::recent_for_user("u1", 5))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "7");
    assert_eq!(rows[0].record.translated_text, "नमस्ते");
}

#[tokio::test]
async fn create_asks_for_representation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/videoDubbings"))
        .and(header("Prefer", "return=representation"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(serde_json::json!([{"id": "abc", "userId": "u1"}])),
        )
        .mount(&server)
        .await;

    let created = client_for(&server)
        .create("videoDubbings", serde_json::json!({"userId": "u1"}))
        .await
        .unwrap();
    assert_eq!(created["id"], "abc");
}

#[tokio::test]
async fn upload_returns_public_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/storage/v1/object/uploads/videos/u1/1700000000000-clip.mp4"))
        .and(header("x-upsert", "false"))
        .and(header("Content-Type", "video/mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"Key": "x"})))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .upload(
            b"frames".to_vec(),
            "videos/u1/1700000000000-clip.mp4",
            "video/mp4",
            UploadOptions { upsert: false },
        )
        .await
        .unwrap();
    assert_eq!(
        result.public_url,
        format!(
            "{}/storage/v1/object/public/uploads/videos/u1/1700000000000-clip.mp4",
            server.uri()
        )
    );
}

#[tokio::test]
async fn ai_failure_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/functions/v1/ai/speech"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate_speech(&SpeechRequest {
            text: "Hello".into(),
            voice: "nova".into(),
            model: "tts-1".into(),
            speed: Some(1.0),
        })
        .await
        .unwrap_err()
        .to_string();
    assert!(err.contains("503"));
    assert!(err.contains("overloaded"));
}

#[tokio::test]
async fn health_check_follows_rest_root() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    assert!(client_for(&server).health_check().await);
}
