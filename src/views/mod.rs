//! Server-rendered HTML pages.
//!
//! Every page is a plain `format!` over a shared layout; there is no
//! template engine and no client-side script. Pages that need a signed-in
//! user go through [`gated`], which renders the loading or sign-in-required
//! card instead.

pub mod dashboard;
pub mod marketing;
pub mod wizards;

use crate::auth::{AuthSnapshot, AuthState};
use crate::wizard::{Notice, NoticeKind, StepInfo};

// ── Context ──────────────────────────────────────────────────────

/// What every page knows about the visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewContext {
    pub auth: AuthSnapshot,
}

impl ViewContext {
    pub fn new(auth: AuthSnapshot) -> Self {
        Self { auth }
    }

    pub fn signed_in(&self) -> bool {
        self.auth.state() == AuthState::SignedIn
    }
}

impl From<AuthSnapshot> for ViewContext {
    fn from(auth: AuthSnapshot) -> Self {
        Self::new(auth)
    }
}

/// Render `page` only for a signed-in visitor.
pub fn gated(ctx: &ViewContext, purpose: &str, page: impl FnOnce() -> String) -> String {
    match ctx.auth.state() {
        AuthState::Loading => render_loading(),
        AuthState::SignedOut => render_sign_in_required(ctx, purpose),
        AuthState::SignedIn => page(),
    }
}

// ── Helpers ──────────────────────────────────────────────────────

/// Escape text for HTML element content and quoted attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub(crate) fn notice_html(notice: Option<&Notice>) -> String {
    match notice {
        Some(n) => {
            let class = match n.kind {
                NoticeKind::Info => "notice",
                NoticeKind::Error => "error",
            };
            format!(r#"<div class="{class}">{}</div>"#, escape_html(&n.message))
        }
        None => String::new(),
    }
}

pub(crate) fn step_indicator(steps: &[StepInfo], current: usize) -> String {
    let items: String = steps
        .iter()
        .map(|s| {
            let class = if s.number == current {
                "active"
            } else if s.number < current {
                "done"
            } else {
                ""
            };
            format!(
                r#"<li class="{class}"><span class="num">{}</span><strong>{}</strong><small>{}</small></li>"#,
                s.number, s.title, s.description
            )
        })
        .collect();
    format!(r#"<ol class="stepper">{items}</ol>"#)
}

pub(crate) fn progress_bar(percent: u8, label: &str) -> String {
    format!(
        r#"<div class="progress"><div class="bar" style="width:{percent}%"></div></div><p class="muted">{} ({percent}%)</p>"#,
        escape_html(label)
    )
}

fn nav(ctx: &ViewContext) -> String {
    let account = if ctx.signed_in() {
        r#"<a class="btn-nav" href="/dashboard">Dashboard</a>
    <form method="POST" action="/logout" class="inline"><button type="submit" class="btn-link">Sign Out</button></form>"#
    } else {
        r#"<a class="btn-nav" href="/login">Sign In</a>"#
    };
    format!(
        r#"<nav>
  <a class="brand" href="/">🎙 PariVaani</a>
  <div class="links">
    <a href="/generate">Create Voice</a>
    <a href="/video-dubbing">Dub Videos</a>
    <a href="/pricing">Pricing</a>
    <a href="/support">Support</a>
    {account}
  </div>
</nav>"#
    )
}

/// Full document around `body`. `refresh_secs` adds a meta refresh (used while a job runs).
pub(crate) fn layout(
    ctx: &ViewContext,
    title: &str,
    body: &str,
    refresh_secs: Option<u32>,
) -> String {
    let refresh = refresh_secs
        .map(|s| format!(r#"<meta http-equiv="refresh" content="{s}">"#))
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head>
<meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1">
{refresh}<title>{title} · PariVaani</title>
<style>{style}</style>
</head><body>
{nav}
<main>
{body}
</main>
<footer><p>{tagline}</p></footer>
</body></html>"#,
        title = escape_html(title),
        style = base_style(),
        nav = nav(ctx),
        tagline = crate::content::landing::FOOTER_TAGLINE,
    )
}

fn base_style() -> &'static str {
    r#"
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body {
        font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
        background: #f7f5fb; color: #222; min-height: 100vh;
    }
    nav {
        display: flex; justify-content: space-between; align-items: center;
        padding: 14px 32px; background: #fff; border-bottom: 1px solid #e5e1ee;
    }
    nav .brand { font-size: 20px; font-weight: 700; color: #1a1a2e; text-decoration: none; }
    nav .links { display: flex; gap: 16px; align-items: center; }
    nav .links a { color: #555; text-decoration: none; font-size: 14px; }
    nav .links a:hover { color: #7c3aed; }
    .btn-nav { background: #7c3aed; color: #fff !important; padding: 8px 14px; border-radius: 8px; }
    .btn-link { background: none; border: none; color: #555; cursor: pointer; font-size: 14px; }
    .inline { display: inline; }
    main { max-width: 960px; margin: 0 auto; padding: 32px 20px; }
    footer { text-align: center; padding: 24px; font-size: 13px; color: #888; }
    h1 { font-size: 32px; color: #1a1a2e; margin-bottom: 8px; }
    h2 { font-size: 22px; color: #1a1a2e; margin: 24px 0 12px; }
    h3 { font-size: 17px; margin-bottom: 6px; }
    .muted { color: #666; font-size: 14px; }
    .card {
        background: #fff; border-radius: 16px; padding: 24px; margin-bottom: 16px;
        box-shadow: 0 4px 24px rgba(0,0,0,0.06);
    }
    .card.narrow { max-width: 420px; margin: 40px auto; text-align: center; }
    .grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 16px; }
    .form-group { margin-bottom: 16px; text-align: left; }
    .form-group label { display: block; font-size: 14px; font-weight: 500; margin-bottom: 6px; color: #444; }
    .form-group input, .form-group textarea {
        width: 100%; padding: 12px 14px; border: 1.5px solid #ddd;
        border-radius: 10px; font-size: 16px; outline: none;
    }
    .form-group textarea { min-height: 160px; }
    .options { display: grid; grid-template-columns: repeat(auto-fit, minmax(160px, 1fr)); gap: 10px; }
    .options label {
        display: block; padding: 12px; border: 1.5px solid #ddd; border-radius: 10px; cursor: pointer;
    }
    .options input { margin-right: 6px; }
    .actions { display: flex; gap: 10px; margin-top: 16px; }
    .btn {
        padding: 12px 20px; border: none; border-radius: 10px; text-decoration: none;
        font-size: 15px; font-weight: 600; cursor: pointer; display: inline-block;
    }
    .btn-primary { background: #7c3aed; color: #fff; }
    .btn-primary:disabled { background: #c4b5fd; cursor: not-allowed; }
    .btn-secondary { background: #e8e8e8; color: #333; }
    .error { background: #fff0f0; color: #d32f2f; padding: 10px 14px; border-radius: 8px; font-size: 14px; margin-bottom: 16px; }
    .notice { background: #f0fff4; color: #1b7f3b; padding: 10px 14px; border-radius: 8px; font-size: 14px; margin-bottom: 16px; }
    .stepper { display: flex; list-style: none; gap: 8px; margin-bottom: 24px; }
    .stepper li { flex: 1; padding: 10px; border-radius: 10px; background: #eee; font-size: 12px; }
    .stepper li strong, .stepper li small { display: block; }
    .stepper li.active { background: #7c3aed; color: #fff; }
    .stepper li.done { background: #ddd6fe; }
    .stepper .num { font-weight: 700; }
    .progress { height: 10px; background: #eee; border-radius: 5px; overflow: hidden; margin: 12px 0 6px; }
    .progress .bar { height: 100%; background: #7c3aed; }
    .pill { display: inline-block; padding: 4px 10px; margin: 3px; border-radius: 999px; background: #ede9fe; font-size: 13px; }
    .badge { display: inline-block; padding: 2px 8px; border-radius: 6px; background: #7c3aed; color: #fff; font-size: 12px; }
    .stat strong { display: block; font-size: 28px; }
    ul.features { list-style: none; margin: 12px 0; }
    ul.features li { padding: 4px 0; font-size: 14px; }
    ul.features li::before { content: '✓ '; color: #16a34a; }
    .spinner {
        width: 48px; height: 48px; margin: 80px auto; border-radius: 50%;
        border: 4px solid #ddd; border-top-color: #7c3aed;
    }
    "#
}

// ── Shared pages ─────────────────────────────────────────────────

pub fn render_loading() -> String {
    layout(
        &ViewContext::new(AuthSnapshot::loading()),
        "Loading",
        r#"<div class="spinner" aria-label="Loading"></div>"#,
        Some(1),
    )
}

/// Card shown on protected pages for signed-out visitors.
pub fn render_sign_in_required(ctx: &ViewContext, purpose: &str) -> String {
    let body = format!(
        r#"<div class="card narrow">
  <h2>Sign In Required</h2>
  <p class="muted">Please sign in to {}</p>
  <div class="actions" style="justify-content:center"><a class="btn btn-primary" href="/login">Sign In to Continue</a></div>
</div>"#,
        escape_html(purpose)
    );
    layout(ctx, "Sign In Required", &body, None)
}

pub fn render_not_found(ctx: &ViewContext, path: &str) -> String {
    let body = format!(
        r#"<div class="card narrow">
  <h2>Page not found</h2>
  <p class="muted">Nothing lives at <code>{}</code>.</p>
  <div class="actions" style="justify-content:center"><a class="btn btn-primary" href="/">Back to home</a></div>
</div>"#,
        escape_html(path)
    );
    layout(ctx, "Not Found", &body, None)
}

/// Card for a page whose data could not be loaded.
pub fn render_error(ctx: &ViewContext, title: &str, message: &str) -> String {
    let body = format!(
        r#"<div class="card narrow">
  <h2>{title}</h2>
  <div class="error">{message}</div>
  <div class="actions" style="justify-content:center"><a class="btn btn-secondary" href="/">Back to home</a></div>
</div>"#,
        title = escape_html(title),
        message = escape_html(message),
    );
    layout(ctx, title, &body, None)
}

pub fn render_login(error: Option<&str>, email: &str) -> String {
    let error_html = error
        .map(|e| format!(r#"<div class="error">{}</div>"#, escape_html(e)))
        .unwrap_or_default();
    let body = format!(
        r#"<div class="card narrow">
  <h2>Sign In</h2>
  <p class="muted">Welcome back to PariVaani</p>
  {error_html}
  <form method="POST" action="/login">
    <div class="form-group">
      <label>Email</label>
      <input type="email" name="email" value="{email}" required autocomplete="username">
    </div>
    <div class="form-group">
      <label>Password</label>
      <input type="password" name="password" required autocomplete="current-password">
    </div>
    <button type="submit" class="btn btn-primary" style="width:100%">Sign In</button>
  </form>
</div>"#,
        email = escape_html(email),
    );
    layout(
        &ViewContext::new(AuthSnapshot::signed_out()),
        "Sign In",
        &body,
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baas::User;

    fn signed_in() -> ViewContext {
        ViewContext::new(AuthSnapshot::signed_in(User {
            id: "u1".into(),
            email: Some("a@b.c".into()),
        }))
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn nav_depends_on_auth() {
        let html = layout(&signed_in(), "T", "", None);
        assert!(html.contains(r#"href="/dashboard">Dashboard"#));
        assert!(!html.contains(">Sign In<"));

        let html = layout(&ViewContext::new(AuthSnapshot::signed_out()), "T", "", None);
        assert!(html.contains(">Sign In<"));
        assert!(!html.contains(">Dashboard<"));
    }

    #[test]
    fn gated_pages() {
        let out = gated(&ViewContext::new(AuthSnapshot::signed_out()), "create voiceovers", || {
            "secret".into()
        });
        assert!(out.contains("Sign In Required"));
        assert!(out.contains("Please sign in to create voiceovers"));

        let out = gated(&ViewContext::new(AuthSnapshot::loading()), "x", || "secret".into());
        assert!(out.contains("spinner"));

        assert_eq!(gated(&signed_in(), "x", || "secret".into()), "secret");
    }

    #[test]
    fn step_indicator_marks_progress() {
        let html = step_indicator(&crate::wizard::voice::VOICE_STEPS, 2);
        assert!(html.contains(r#"<li class="done"><span class="num">1</span>"#));
        assert!(html.contains(r#"<li class="active"><span class="num">2</span>"#));
    }

    #[test]
    fn login_error_is_escaped() {
        let html = render_login(Some("<bad>"), "x@y.z");
        assert!(html.contains("&lt;bad&gt;"));
        assert!(html.contains(r#"value="x@y.z""#));
    }

    #[test]
    fn error_page_escapes_message() {
        let html = render_error(&signed_in(), "Dashboard unavailable", "a <b> c");
        assert!(html.contains("<h2>Dashboard unavailable</h2>"));
        assert!(html.contains("a &lt;b&gt; c"));
    }
}
