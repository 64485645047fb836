//! Axum-based HTTP gateway: server-rendered pages plus a JSON API.
//!
//! ## Design
//! - One shared [`AppState`]; every collaborator is an `Arc<dyn Trait>` so
//!   handler tests run against in-memory fakes
//! - The caller is resolved per request from `Authorization: Bearer` or the
//!   `pv_session` cookie; there is no server-side session table
//! - Wizard commands are applied synchronously; workflows run on spawned
//!   tasks and report back into the [`WizardStore`]
//! - JSON and form bodies are capped at `max_body_bytes`; only the upload
//!   routes accept `max_upload_bytes`

pub mod pages;

use crate::auth::{AuthSnapshot, SessionHandle};
use crate::baas::{AiClient, AuthProvider, BaasClient, BlobStorage, Collection, Database, User};
use crate::catalog::CatalogManifest;
use crate::config::{Config, GatewayConfig};
use crate::content::{search_faqs, ContactForm, PricingPage, CONTACT_THANKS};
use crate::dashboard::DashboardLoader;
use crate::store::open_database;
use crate::wizard::dubbing::DubbingWizardView;
use crate::wizard::{DubbingCommand, VoiceCommand, WizardStore};
use crate::workflow::{
    DubbingWorkflow, GenerationSettings, PassthroughMuxer, UploadRejection, VoiceWorkflow,
    WorkflowError, WorkflowStage,
};
use anyhow::Result;
use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Multipart, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Cookie carrying the access token for browser sessions.
pub const SESSION_COOKIE: &str = "pv_session";

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthProvider>,
    pub voice: Arc<VoiceWorkflow>,
    pub dubbing: Arc<DubbingWorkflow>,
    pub dashboard: Arc<DashboardLoader>,
    pub wizards: WizardStore,
}

impl AppState {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        ai: Arc<dyn AiClient>,
        storage: Arc<dyn BlobStorage>,
        db: Arc<dyn Database>,
        settings: GenerationSettings,
        page_size: usize,
    ) -> Self {
        let voice = VoiceWorkflow::new(
            ai.clone(),
            Collection::voice_generations(db.clone()),
            settings.clone(),
        );
        let dubbing = DubbingWorkflow::new(
            ai,
            storage,
            Collection::video_dubbings(db.clone()),
            Arc::new(PassthroughMuxer),
            settings,
        );
        Self {
            auth,
            voice: Arc::new(voice),
            dubbing: Arc::new(dubbing),
            dashboard: Arc::new(DashboardLoader::new(db, page_size)),
            wizards: WizardStore::new(),
        }
    }

    /// Wire the state from config: BaaS for auth, AI and storage; the
    /// configured backend for records.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.require_baas()?;
        let baas = BaasClient::new(config.baas.clone())?;
        let db = open_database(&config.store, &baas)?;
        let baas = Arc::new(baas);
        Ok(Self::new(
            baas.clone(),
            baas.clone(),
            baas,
            db,
            GenerationSettings::from_config(&config.generation),
            config.dashboard.page_size,
        ))
    }
}

/// Build the router with all routes and middleware.
pub fn build_router(state: AppState, gateway: &GatewayConfig) -> Router {
    // ── CORS: allow web clients from any origin ──
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    let uploads = Router::new()
        .route("/video-dubbing/upload", post(pages::handle_dubbing_upload))
        .route("/api/wizards/dubbing/upload", post(handle_dubbing_upload))
        .layer(DefaultBodyLimit::max(gateway.max_upload_bytes))
        .layer(RequestBodyLimitLayer::new(gateway.max_upload_bytes));

    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/api/auth/login", post(handle_auth_login))
        .route("/api/auth/logout", post(handle_auth_logout))
        .route("/api/auth/me", get(handle_auth_me))
        .route("/api/catalog", get(handle_catalog))
        .route("/api/wizards/voice", get(handle_voice_wizard_get))
        .route("/api/wizards/voice", post(handle_voice_wizard_post))
        .route("/api/wizards/dubbing", get(handle_dubbing_wizard_get))
        .route("/api/wizards/dubbing", post(handle_dubbing_wizard_post))
        .route("/api/dashboard", get(handle_dashboard))
        .route("/api/pricing", get(handle_pricing))
        .route("/api/support/faq", get(handle_support_faq))
        .route("/api/support/contact", post(handle_support_contact))
        .route("/", get(pages::handle_landing))
        .route("/login", get(pages::handle_login_page))
        .route("/login", post(pages::handle_login_submit))
        .route("/logout", post(pages::handle_logout))
        .route("/generate", get(pages::handle_generator_page))
        .route("/generate", post(pages::handle_generator_submit))
        .route("/video-dubbing", get(pages::handle_dubbing_page))
        .route("/video-dubbing", post(pages::handle_dubbing_submit))
        .route("/dashboard", get(pages::handle_dashboard_page))
        .route("/pricing", get(pages::handle_pricing_page))
        .route("/support", get(pages::handle_support_page))
        .route("/support/contact", post(pages::handle_support_contact))
        .layer(RequestBodyLimitLayer::new(gateway.max_body_bytes));

    app.merge(uploads)
        .fallback(pages::handle_not_found)
        .with_state(state)
        .layer(cors)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(gateway.request_timeout_secs),
        ))
}

/// Run the HTTP gateway until the process is stopped.
pub async fn run_gateway(config: Config) -> Result<()> {
    let state = AppState::from_config(&config)?;
    let app = build_router(state, &config.gateway);

    let addr: SocketAddr = format!("{}:{}", config.gateway.host, config.gateway.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    tracing::info!(
        addr = %local,
        store = ?config.store.backend,
        "PariVaani gateway listening on http://{local}"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down gateway");
        })
        .await?;
    Ok(())
}

// ══════════════════════════════════════════════════════════════════════════════
// SESSION RESOLUTION
// ══════════════════════════════════════════════════════════════════════════════

/// Concrete return type for JSON handlers.
type ApiResponse = (StatusCode, Json<serde_json::Value>);

fn api_error(status: StatusCode, message: impl std::fmt::Display) -> ApiResponse {
    (status, Json(serde_json::json!({ "error": message.to_string() })))
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name && !value.is_empty()).then_some(value)
        })
}

/// Access token from the bearer header, falling back to the session cookie.
pub(crate) fn session_token(headers: &HeaderMap) -> Option<String> {
    extract_bearer_token(headers)
        .or_else(|| cookie_value(headers, SESSION_COOKIE))
        .map(str::to_string)
}

/// Resolve the caller. Lookup failures count as signed out.
pub(crate) async fn resolve_session(
    state: &AppState,
    headers: &HeaderMap,
) -> (SessionHandle, AuthSnapshot) {
    let session = SessionHandle::new(state.auth.clone());
    if let Some(token) = session_token(headers) {
        if let Err(e) = session.restore(&token).await {
            tracing::warn!("Session lookup failed: {e:#}");
        }
    }
    let snapshot = session.current();
    (session, snapshot)
}

async fn require_user(state: &AppState, headers: &HeaderMap) -> Result<User, ApiResponse> {
    let (_, snapshot) = resolve_session(state, headers).await;
    snapshot
        .user
        .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "Sign in required"))
}

/// Sign out the caller's token and drop their wizard state.
pub(crate) async fn sign_out(state: &AppState, headers: &HeaderMap) -> Option<User> {
    let (session, snapshot) = resolve_session(state, headers).await;
    let user = snapshot.user?;
    if let Err(e) = session.logout().await {
        tracing::warn!(user_id = %user.id, "Token revocation failed: {e:#}");
    }
    state.wizards.remove(&user.id);
    Some(user)
}

/// Read the `video` part of a multipart body and run it through the
/// dubbing upload. Returns the wizard view afterwards.
pub(crate) async fn receive_upload(
    state: &AppState,
    user_id: &str,
    mut multipart: Multipart,
) -> Result<DubbingWizardView, ApiResponse> {
    let Some(slot) = state.wizards.begin_upload(user_id) else {
        return Err(api_error(
            StatusCode::CONFLICT,
            "Another upload or dubbing job is already running",
        ));
    };

    let outcome = match read_video_part(&mut multipart).await {
        Ok(Some((name, content_type, bytes))) => {
            state
                .dubbing
                .upload(user_id, &name, content_type.as_deref(), bytes)
                .await
        }
        Ok(None) => Err(WorkflowError::from(UploadRejection::NotVideo)),
        Err(e) => Err(WorkflowError::at(WorkflowStage::Uploading, e)),
    };
    if let Err(e) = &outcome {
        tracing::warn!(user_id, "Video upload failed: {e}");
    }
    Ok(slot.finish(outcome))
}

async fn read_video_part(
    multipart: &mut Multipart,
) -> Result<Option<(String, Option<String>, Vec<u8>)>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("video") {
            continue;
        }
        let name = field.file_name().unwrap_or("video").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;
        return Ok(Some((name, content_type, bytes.to_vec())));
    }
    Ok(None)
}

// ══════════════════════════════════════════════════════════════════════════════
// JSON HANDLERS
// ══════════════════════════════════════════════════════════════════════════════

/// GET /health: always public
async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "active_wizards": state.wizards.len(),
    }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginBody {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/login: exchange credentials for a token.
async fn handle_auth_login(
    State(state): State<AppState>,
    body: Result<Json<LoginBody>, JsonRejection>,
) -> ApiResponse {
    let body = match body {
        Ok(Json(b)) => b,
        Err(e) => return api_error(StatusCode::BAD_REQUEST, format!("Invalid request: {e}")),
    };

    let session = SessionHandle::new(state.auth.clone());
    match session.login(body.email.trim(), &body.password).await {
        Ok(s) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "token": s.access_token,
                "user": s.user,
            })),
        ),
        Err(e) => {
            tracing::warn!("Login failed: {e:#}");
            api_error(StatusCode::UNAUTHORIZED, "Invalid email or password")
        }
    }
}

/// POST /api/auth/logout: revoke the caller's token.
async fn handle_auth_logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResponse {
    match sign_out(&state, &headers).await {
        Some(_) => (
            StatusCode::OK,
            Json(serde_json::json!({"status": "logged_out"})),
        ),
        None => api_error(StatusCode::UNAUTHORIZED, "Invalid session"),
    }
}

/// GET /api/auth/me
async fn handle_auth_me(State(state): State<AppState>, headers: HeaderMap) -> ApiResponse {
    match require_user(&state, &headers).await {
        Ok(user) => (StatusCode::OK, Json(serde_json::json!({ "user": user }))),
        Err(resp) => resp,
    }
}

/// GET /api/catalog: languages, personas and speed bounds for both wizards.
async fn handle_catalog() -> Json<CatalogManifest> {
    Json(CatalogManifest::build())
}

fn to_json<T: serde::Serialize>(value: &T) -> ApiResponse {
    match serde_json::to_value(value) {
        Ok(v) => (StatusCode::OK, Json(v)),
        Err(e) => api_error(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

/// GET /api/wizards/voice
async fn handle_voice_wizard_get(State(state): State<AppState>, headers: HeaderMap) -> ApiResponse {
    match require_user(&state, &headers).await {
        Ok(user) => to_json(&state.wizards.voice_view(&user.id)),
        Err(resp) => resp,
    }
}

/// POST /api/wizards/voice: apply one command.
async fn handle_voice_wizard_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<VoiceCommand>, JsonRejection>,
) -> ApiResponse {
    let user = match require_user(&state, &headers).await {
        Ok(u) => u,
        Err(resp) => return resp,
    };
    let command = match body {
        Ok(Json(c)) => c,
        Err(e) => return api_error(StatusCode::BAD_REQUEST, format!("Invalid command: {e}")),
    };

    let (view, started) = state.wizards.voice_commands(&user.id, vec![command]);
    if let Some((input, progress)) = started {
        state.wizards.spawn_voice(state.voice.clone(), input, progress);
    }
    to_json(&view)
}

/// GET /api/wizards/dubbing
async fn handle_dubbing_wizard_get(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResponse {
    match require_user(&state, &headers).await {
        Ok(user) => to_json(&state.wizards.dubbing_view(&user.id)),
        Err(resp) => resp,
    }
}

/// POST /api/wizards/dubbing: apply one command.
async fn handle_dubbing_wizard_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<DubbingCommand>, JsonRejection>,
) -> ApiResponse {
    let user = match require_user(&state, &headers).await {
        Ok(u) => u,
        Err(resp) => return resp,
    };
    let command = match body {
        Ok(Json(c)) => c,
        Err(e) => return api_error(StatusCode::BAD_REQUEST, format!("Invalid command: {e}")),
    };

    let (view, started) = state.wizards.dubbing_commands(&user.id, vec![command]);
    if let Some((input, progress)) = started {
        state
            .wizards
            .spawn_dubbing(state.dubbing.clone(), input, progress);
    }
    to_json(&view)
}

/// POST /api/wizards/dubbing/upload: multipart body with a `video` part.
async fn handle_dubbing_upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> ApiResponse {
    let user = match require_user(&state, &headers).await {
        Ok(u) => u,
        Err(resp) => return resp,
    };
    match receive_upload(&state, &user.id, multipart).await {
        Ok(view) => to_json(&view),
        Err(resp) => resp,
    }
}

/// GET /api/dashboard
async fn handle_dashboard(State(state): State<AppState>, headers: HeaderMap) -> ApiResponse {
    let user = match require_user(&state, &headers).await {
        Ok(u) => u,
        Err(resp) => return resp,
    };
    match state.dashboard.load(&user.id, chrono::Utc::now()).await {
        Ok(dashboard) => to_json(&dashboard),
        Err(e) => {
            tracing::error!(user_id = %user.id, "Failed to load dashboard: {e:#}");
            api_error(StatusCode::BAD_GATEWAY, format!("Failed to load dashboard: {e}"))
        }
    }
}

/// GET /api/pricing
async fn handle_pricing() -> Json<PricingPage> {
    Json(PricingPage::build())
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FaqQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/support/faq?q=
async fn handle_support_faq(Query(query): Query<FaqQuery>) -> ApiResponse {
    to_json(&serde_json::json!({ "categories": search_faqs(&query.q) }))
}

/// POST /api/support/contact
async fn handle_support_contact(body: Result<Json<ContactForm>, JsonRejection>) -> ApiResponse {
    let form = match body {
        Ok(Json(f)) => f,
        Err(e) => return api_error(StatusCode::BAD_REQUEST, format!("Invalid request: {e}")),
    };
    match form.submit() {
        Ok(message) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": message })),
        ),
        Err(e) => api_error(StatusCode::UNPROCESSABLE_ENTITY, e),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::baas::testing::{FakeAi, FakeAuth, FakeStorage, MemoryDatabase};
    use axum::body::Body;
    use axum::http::{HeaderValue, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    pub(crate) fn test_state() -> AppState {
        AppState::new(
            Arc::new(FakeAuth::new("meera@example.com", "secret", "u1")),
            Arc::new(FakeAi::new()),
            Arc::new(FakeStorage::default()),
            Arc::new(MemoryDatabase::default()),
            GenerationSettings::default(),
            20,
        )
    }

    pub(crate) fn authed() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer token-u1"),
        );
        headers
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn token_from_bearer_or_cookie() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; pv_session=abc; other=1"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("abc"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(session_token(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn empty_cookie_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("pv_session="));
        assert_eq!(session_token(&headers), None);
    }

    #[tokio::test]
    async fn login_returns_token() {
        let body = Ok(Json(LoginBody {
            email: " meera@example.com ".into(),
            password: "secret".into(),
        }));
        let (status, Json(json)) = handle_auth_login(State(test_state()), body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["token"], "token-u1");
        assert_eq!(json["user"]["id"], "u1");
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_401() {
        let body = Ok(Json(LoginBody {
            email: "meera@example.com".into(),
            password: "nope".into(),
        }));
        let (status, Json(json)) = handle_auth_login(State(test_state()), body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"], "Invalid email or password");
    }

    #[tokio::test]
    async fn me_requires_token() {
        let (status, _) = handle_auth_me(State(test_state()), HeaderMap::new()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, Json(json)) = handle_auth_me(State(test_state()), authed()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["user"]["id"], "u1");
    }

    #[tokio::test]
    async fn logout_drops_wizard_state() {
        let state = test_state();
        state.wizards.voice_commands(
            "u1",
            vec![VoiceCommand::SetScript {
                script: "hi".into(),
            }],
        );
        assert_eq!(state.wizards.len(), 1);

        let (status, _) = handle_auth_logout(State(state.clone()), authed()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(state.wizards.is_empty());
    }

    #[tokio::test]
    async fn voice_wizard_command_round_trip() {
        let state = test_state();
        let cmd = Ok(Json(VoiceCommand::SetScript {
            script: "Hello".into(),
        }));
        let (status, Json(json)) =
            handle_voice_wizard_post(State(state.clone()), authed(), cmd).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["script"], "Hello");
        assert_eq!(json["can_advance"], true);

        let (_, Json(json)) =
            handle_voice_wizard_post(State(state), authed(), Ok(Json(VoiceCommand::Next))).await;
        assert_eq!(json["step"], 2);
    }

    #[tokio::test]
    async fn voice_generation_runs_in_background() {
        let state = test_state();
        let commands = [
            VoiceCommand::SetScript {
                script: "Hello".into(),
            },
            VoiceCommand::Next,
            VoiceCommand::SetLanguage {
                language: "hi".into(),
            },
            VoiceCommand::Next,
            VoiceCommand::SetVoice {
                voice: "female-1".into(),
            },
            VoiceCommand::Next,
            VoiceCommand::Next,
            VoiceCommand::Generate,
        ];
        for cmd in commands {
            handle_voice_wizard_post(State(state.clone()), authed(), Ok(Json(cmd))).await;
        }

        let mut done = false;
        for _ in 0..100 {
            if !state.wizards.voice_view("u1").generating {
                done = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(done);

        let (_, Json(json)) = handle_voice_wizard_get(State(state), authed()).await;
        assert_eq!(json["result"]["audio_url"], "https://cdn.test/audio/nova.mp3");
        assert_eq!(json["result"]["translated_text"], "नमस्ते");
    }

    #[tokio::test]
    async fn dashboard_requires_sign_in_and_lists_records() {
        let (status, _) = handle_dashboard(State(test_state()), HeaderMap::new()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, Json(json)) = handle_dashboard(State(test_state()), authed()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["stats"]["total_generations"], 0);
        assert!(json["stats"]["favorite_language"].is_null());
    }

    #[tokio::test]
    async fn contact_form_validation() {
        let (status, Json(json)) =
            handle_support_contact(Ok(Json(ContactForm::default()))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"], "Please fill in the name field");

        let form = ContactForm {
            name: "Meera".into(),
            email: "meera@example.com".into(),
            subject: "Hi".into(),
            message: "Hello".into(),
        };
        let (status, Json(json)) = handle_support_contact(Ok(Json(form))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], CONTACT_THANKS);
    }

    #[tokio::test]
    async fn faq_search_through_router() {
        let app = build_router(test_state(), &GatewayConfig::default());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/support/faq?q=refund")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["categories"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn catalog_through_router() {
        let app = build_router(test_state(), &GatewayConfig::default());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/catalog")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["voice"]["languages"].as_array().unwrap().len(), 12);
        assert_eq!(json["dubbing"]["personas"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn oversized_json_body_is_rejected() {
        let gateway = GatewayConfig {
            max_body_bytes: 64,
            ..GatewayConfig::default()
        };
        let app = build_router(test_state(), &gateway);
        let big = format!(r#"{{"name":"{}"}}"#, "x".repeat(1024));
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/support/contact")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::CONTENT_LENGTH, big.len())
                    .body(Body::from(big))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn multipart_upload_attaches_video() {
        let app = build_router(test_state(), &GatewayConfig::default());
        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"video\"; filename=\"clip.mp4\"\r\nContent-Type: video/mp4\r\n\r\nabcdef\r\n--{boundary}--\r\n"
        );
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/wizards/dubbing/upload")
                    .header(header::AUTHORIZATION, "Bearer token-u1")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["upload"]["name"], "clip.mp4");
        assert_eq!(json["upload"]["size_bytes"], 6);
        assert_eq!(json["can_advance"], true);
    }

    #[tokio::test]
    async fn timed_out_upload_releases_the_wizard() {
        let state = AppState::new(
            Arc::new(FakeAuth::new("meera@example.com", "secret", "u1")),
            Arc::new(FakeAi::new()),
            Arc::new(FakeStorage {
                stall: true,
                ..FakeStorage::default()
            }),
            Arc::new(MemoryDatabase::default()),
            GenerationSettings::default(),
            20,
        );
        let gateway = GatewayConfig {
            request_timeout_secs: 1,
            ..GatewayConfig::default()
        };
        let app = build_router(state.clone(), &gateway);
        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"video\"; filename=\"clip.mp4\"\r\nContent-Type: video/mp4\r\n\r\nabcdef\r\n--{boundary}--\r\n"
        );
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/wizards/dubbing/upload")
                    .header(header::AUTHORIZATION, "Bearer token-u1")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);

        let view = state.wizards.dubbing_view("u1");
        assert!(!view.uploading);
        assert!(view.upload.is_none());
        state.wizards.dubbing_commands("u1", vec![DubbingCommand::StartOver]);
        assert!(state.wizards.begin_upload("u1").is_some());
    }

    #[tokio::test]
    async fn multipart_without_video_part_is_rejected_in_view() {
        let app = build_router(test_state(), &GatewayConfig::default());
        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nhello\r\n--{boundary}--\r\n"
        );
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/wizards/dubbing/upload")
                    .header(header::AUTHORIZATION, "Bearer token-u1")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert!(json["upload"].is_null());
        assert_eq!(json["notice"]["message"], "Please select a valid video file");
    }
}
