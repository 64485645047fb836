//! History and usage page.

use super::{escape_html, gated, layout, ViewContext};
use crate::dashboard::Dashboard;

pub fn render_dashboard(ctx: &ViewContext, dashboard: &Dashboard) -> String {
    gated(ctx, "access your dashboard", || {
        let stats = &dashboard.stats;
        let cards = [
            ("Total Voiceovers", stats.total_generations.to_string()),
            ("This Month", stats.this_month.to_string()),
            ("Characters Used", group_thousands(stats.total_characters)),
            ("Favorite Language", stats.favorite_language_label()),
        ]
        .iter()
        .map(|(label, value)| {
            format!(
                r#"<div class="card stat"><span class="muted">{label}</span><strong>{}</strong></div>"#,
                escape_html(value)
            )
        })
        .collect::<String>();

        let voiceovers = if dashboard.generations.is_empty() {
            r#"<div style="text-align:center">
  <h3>No voiceovers yet</h3>
  <p class="muted">Create your first voiceover to get started</p>
  <div class="actions" style="justify-content:center"><a class="btn btn-primary" href="/generate">Create Your First Voiceover</a></div>
</div>"#
                .to_string()
        } else {
            dashboard
                .generations
                .iter()
                .map(|g| {
                    format!(
                        r#"<div class="card">
  <p><span class="pill">{lang}</span><span class="pill">{voice}</span><span class="pill">{speed}x speed</span></p>
  <p>{script}</p>
  <p class="muted">{date} · {chars} characters</p>
  <div class="actions"><a class="btn btn-secondary" href="{url}">Play</a><a class="btn btn-secondary" href="{url}" download>Download</a></div>
</div>"#,
                        lang = escape_html(&g.language_name),
                        voice = escape_html(&g.voice_name),
                        speed = g.speed,
                        script = escape_html(&g.script),
                        date = g.created_label,
                        chars = g.characters,
                        url = escape_html(&g.audio_url),
                    )
                })
                .collect()
        };

        let dubs = if dashboard.dubbings.is_empty() {
            r#"<p class="muted">No dubbed videos yet. <a href="/video-dubbing">Dub a video</a></p>"#
                .to_string()
        } else {
            dashboard
                .dubbings
                .iter()
                .map(|d| {
                    format!(
                        r#"<div class="card">
  <p><span class="pill">{from} → {to}</span><span class="pill">{voice}</span></p>
  <p>{text}</p>
  <p class="muted">{date}</p>
  <div class="actions"><a class="btn btn-secondary" href="{url}" download>Download</a></div>
</div>"#,
                        from = escape_html(&d.original_language_name),
                        to = escape_html(&d.target_language_name),
                        voice = escape_html(&d.voice_name),
                        text = escape_html(&d.translated_text),
                        date = d.created_label,
                        url = escape_html(&d.processed_video_url),
                    )
                })
                .collect()
        };

        let body = format!(
            r#"<h1>Dashboard</h1>
<p class="muted">Manage your voiceovers and track your usage</p>
<div class="grid" style="margin-top:24px">{cards}</div>
<h2>Recent Voiceovers <a class="btn btn-primary" href="/generate" style="float:right">Create New</a></h2>
{voiceovers}
<h2>Recent Dubs</h2>
{dubs}"#
        );
        layout(ctx, "Dashboard", &body, None)
    })
}

/// `12345` → `"12,345"`.
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
