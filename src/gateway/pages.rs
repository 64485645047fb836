//! Browser-facing pages.
//!
//! Every form posts back to the page it came from and is answered with a
//! `303 See Other` to the matching `GET`, so a reload never resubmits.
//! Sessions ride on the `pv_session` cookie set by `POST /login`.

use super::{receive_upload, resolve_session, sign_out, AppState, SESSION_COOKIE};
use crate::content::ContactForm;
use crate::views::dashboard::render_dashboard;
use crate::views::marketing::{render_landing, render_pricing, render_support};
use crate::views::wizards::{render_dubbing, render_generator};
use crate::views::{render_error, render_login, render_not_found, render_sign_in_required, ViewContext};
use crate::wizard::{DubbingCommand, Notice, VoiceCommand, WizardForm};
use axum::{
    extract::{Multipart, Query, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

/// Form data for the sign-in page.
#[derive(Debug, serde::Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Query parameters for the support page.
#[derive(Debug, Default, serde::Deserialize)]
pub struct SupportQuery {
    #[serde(default)]
    pub q: String,
}

async fn view_context(state: &AppState, headers: &HeaderMap) -> ViewContext {
    let (_, snapshot) = resolve_session(state, headers).await;
    ViewContext::new(snapshot)
}

fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

fn sign_in_required(ctx: &ViewContext, purpose: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Html(render_sign_in_required(ctx, purpose)),
    )
        .into_response()
}

// ── Public pages ─────────────────────────────────────────────────

/// GET /
pub async fn handle_landing(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    Html(render_landing(&view_context(&state, &headers).await))
}

/// GET /pricing
pub async fn handle_pricing_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Html<String> {
    Html(render_pricing(&view_context(&state, &headers).await))
}

/// GET /support?q=
pub async fn handle_support_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SupportQuery>,
) -> Html<String> {
    let ctx = view_context(&state, &headers).await;
    Html(render_support(&ctx, &query.q, &ContactForm::default(), None))
}

/// POST /support/contact: keeps the form filled in when validation fails.
pub async fn handle_support_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ContactForm>,
) -> Response {
    let ctx = view_context(&state, &headers).await;
    match form.submit() {
        Ok(message) => Html(render_support(
            &ctx,
            "",
            &ContactForm::default(),
            Some(&Notice::info(message)),
        ))
        .into_response(),
        Err(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(render_support(
                &ctx,
                "",
                &form,
                Some(&Notice::error(e.to_string())),
            )),
        )
            .into_response(),
    }
}

/// Fallback for unknown paths.
pub async fn handle_not_found(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let ctx = view_context(&state, &headers).await;
    (
        StatusCode::NOT_FOUND,
        Html(render_not_found(&ctx, uri.path())),
    )
        .into_response()
}

// ── Sign in / out ────────────────────────────────────────────────

/// GET /login
pub async fn handle_login_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if view_context(&state, &headers).await.signed_in() {
        return Redirect::to("/dashboard").into_response();
    }
    Html(render_login(None, "")).into_response()
}

/// POST /login: set the session cookie and go to the dashboard.
pub async fn handle_login_submit(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Response {
    let email = form.email.trim();
    let session = crate::auth::SessionHandle::new(state.auth.clone());
    match session.login(email, &form.password).await {
        Ok(s) => (
            [(header::SET_COOKIE, session_cookie(&s.access_token))],
            Redirect::to("/dashboard"),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!("Login failed: {e:#}");
            (
                StatusCode::UNAUTHORIZED,
                Html(render_login(Some("Invalid email or password"), email)),
            )
                .into_response()
        }
    }
}

/// POST /logout: revoke the token, drop wizard state, clear the cookie.
pub async fn handle_logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(user) = sign_out(&state, &headers).await {
        tracing::info!(user_id = %user.id, "Signed out");
    }
    (
        [(header::SET_COOKIE, expired_session_cookie())],
        Redirect::to("/"),
    )
        .into_response()
}

// ── Voice generator ──────────────────────────────────────────────

/// GET /generate
pub async fn handle_generator_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Html<String> {
    let ctx = view_context(&state, &headers).await;
    let view = match ctx.auth.user_id() {
        Some(id) => state.wizards.voice_view(id),
        None => crate::wizard::VoiceWizard::new().view(),
    };
    Html(render_generator(&ctx, &view))
}

/// POST /generate: apply the form's field updates, then its action.
pub async fn handle_generator_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<WizardForm>,
) -> Response {
    let ctx = view_context(&state, &headers).await;
    let Some(user_id) = ctx.auth.user_id() else {
        return sign_in_required(&ctx, "create voiceovers");
    };

    let (_, started) = state
        .wizards
        .voice_commands(user_id, VoiceCommand::from_form(&form));
    if let Some((input, progress)) = started {
        state
            .wizards
            .spawn_voice(state.voice.clone(), input, progress);
    }
    Redirect::to("/generate").into_response()
}

// ── Dubbing studio ───────────────────────────────────────────────

/// GET /video-dubbing
pub async fn handle_dubbing_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Html<String> {
    let ctx = view_context(&state, &headers).await;
    let view = match ctx.auth.user_id() {
        Some(id) => state.wizards.dubbing_view(id),
        None => crate::wizard::DubbingWizard::new().view(),
    };
    Html(render_dubbing(&ctx, &view))
}

/// POST /video-dubbing
pub async fn handle_dubbing_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<WizardForm>,
) -> Response {
    let ctx = view_context(&state, &headers).await;
    let Some(user_id) = ctx.auth.user_id() else {
        return sign_in_required(&ctx, "dub videos");
    };

    let (_, started) = state
        .wizards
        .dubbing_commands(user_id, DubbingCommand::from_form(&form));
    if let Some((input, progress)) = started {
        state
            .wizards
            .spawn_dubbing(state.dubbing.clone(), input, progress);
    }
    Redirect::to("/video-dubbing").into_response()
}

/// POST /video-dubbing/upload: multipart form with a `video` file.
pub async fn handle_dubbing_upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let ctx = view_context(&state, &headers).await;
    let Some(user_id) = ctx.auth.user_id() else {
        return sign_in_required(&ctx, "dub videos");
    };

    // A busy wizard keeps its state; the redirect shows it as-is.
    if let Err((status, _)) = receive_upload(&state, user_id, multipart).await {
        tracing::debug!(%status, user_id, "Upload refused");
    }
    Redirect::to("/video-dubbing").into_response()
}

// ── Dashboard ────────────────────────────────────────────────────

/// GET /dashboard
pub async fn handle_dashboard_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let ctx = view_context(&state, &headers).await;
    let Some(user_id) = ctx.auth.user_id() else {
        return sign_in_required(&ctx, "access your dashboard");
    };

    match state.dashboard.load(user_id, chrono::Utc::now()).await {
        Ok(dashboard) => Html(render_dashboard(&ctx, &dashboard)).into_response(),
        Err(e) => {
            tracing::error!(user_id, "Failed to load dashboard: {e:#}");
            (
                StatusCode::BAD_GATEWAY,
                Html(render_error(
                    &ctx,
                    "Dashboard unavailable",
                    "We couldn't load your history. Please try again shortly.",
                )),
            )
                .into_response()
        }
    }
}
