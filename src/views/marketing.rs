//! Public pages: landing, pricing and support.

use super::{escape_html, layout, notice_html, ViewContext};
use crate::catalog::VOICE_LANGUAGES;
use crate::content::landing::{
    FEATURES, HERO_HIGHLIGHT, HERO_LANGUAGE_PILLS, HERO_SUBTITLE, HERO_TITLE, HOW_IT_WORKS,
    PLAN_TEASERS, STATS, TESTIMONIALS,
};
use crate::content::{
    search_faqs, ContactForm, Faq, CONTACT_OPTIONS, PLANS, PRICING_FAQS, RESOURCES,
};
use crate::wizard::Notice;

fn feature_list(items: &[&str]) -> String {
    let li: String = items
        .iter()
        .map(|f| format!("<li>{}</li>", escape_html(f)))
        .collect();
    format!(r#"<ul class="features">{li}</ul>"#)
}

fn faq_list(faqs: &[Faq]) -> String {
    faqs.iter()
        .map(|f| {
            format!(
                "<details class=\"card\"><summary><strong>{}</strong></summary><p class=\"muted\">{}</p></details>",
                escape_html(f.question),
                escape_html(f.answer)
            )
        })
        .collect()
}

// ── Landing ──────────────────────────────────────────────────────

pub fn render_landing(ctx: &ViewContext) -> String {
    let pills: String = VOICE_LANGUAGES
        .iter()
        .take(HERO_LANGUAGE_PILLS)
        .map(|l| format!(r#"<span class="pill">{}</span>"#, l.display_name()))
        .collect();
    let more = VOICE_LANGUAGES.len().saturating_sub(HERO_LANGUAGE_PILLS);

    let stats: String = STATS
        .iter()
        .map(|s| {
            format!(
                r#"<div class="card stat"><strong>{}</strong><span class="muted">{}</span></div>"#,
                s.number, s.label
            )
        })
        .collect();

    let features: String = FEATURES
        .iter()
        .map(|f| format!(r#"<div class="card"><h3>{}</h3><p class="muted">{}</p></div>"#, f.title, f.description))
        .collect();

    let steps: String = HOW_IT_WORKS
        .iter()
        .enumerate()
        .map(|(i, f)| {
            format!(
                r#"<div class="card"><span class="badge">{}</span><h3>{}</h3><p class="muted">{}</p></div>"#,
                i + 1,
                f.title,
                f.description
            )
        })
        .collect();

    let testimonials: String = TESTIMONIALS
        .iter()
        .map(|t| {
            format!(
                r#"<div class="card"><p>{stars}</p><p>"{}"</p><p><strong>{}</strong><br><span class="muted">{}</span></p></div>"#,
                t.content,
                t.name,
                t.role,
                stars = "★".repeat(usize::from(t.rating)),
            )
        })
        .collect();

    let plans: String = PLAN_TEASERS
        .iter()
        .map(|p| {
            let badge = if p.popular {
                r#"<span class="badge">Most Popular</span>"#
            } else {
                ""
            };
            format!(
                r#"<div class="card">{badge}<h3>{}</h3><p><strong>{}</strong><span class="muted">{}</span></p>{}<a class="btn btn-secondary" href="/generate">{}</a></div>"#,
                p.name,
                p.price,
                p.period,
                feature_list(p.features),
                p.cta
            )
        })
        .collect();

    let cta_href = if ctx.signed_in() { "/generate" } else { "/login" };
    let dub_href = if ctx.signed_in() {
        "/video-dubbing"
    } else {
        "/login"
    };

    let body = format!(
        r#"<section class="card">
  <h1>{HERO_TITLE} <span style="color:#7c3aed">{HERO_HIGHLIGHT}</span></h1>
  <p class="muted">{HERO_SUBTITLE}</p>
  <p style="margin:16px 0">{pills}<span class="pill">+{more} more</span></p>
  <div class="actions">
    <a class="btn btn-primary" href="{cta_href}">Create Voiceover</a>
    <a class="btn btn-secondary" href="{dub_href}">Dub Videos</a>
  </div>
</section>
<div class="grid">{stats}</div>
<h2>Why Choose PariVaani?</h2>
<p class="muted">Experience the power of AI-driven voice generation designed specifically for Indian languages and accents.</p>
<div class="grid">{features}</div>
<h2>How It Works</h2>
<p class="muted">Create professional voiceovers in just 4 simple steps</p>
<div class="grid">{steps}</div>
<h2>What Our Users Say</h2>
<div class="grid">{testimonials}</div>
<h2>Simple, Transparent Pricing</h2>
<p class="muted">Start free, upgrade as you grow</p>
<div class="grid">{plans}</div>
<p><a href="/pricing">View All Plans &amp; Features</a></p>
<section class="card" style="text-align:center">
  <h2>Ready to Create Amazing Voiceovers?</h2>
  <p class="muted">Join thousands of creators who trust PariVaani for their voiceover needs</p>
  <div class="actions" style="justify-content:center">
    <a class="btn btn-primary" href="{cta_href}">Start Creating Now</a>
    <a class="btn btn-secondary" href="/pricing">View Pricing</a>
  </div>
</section>"#
    );
    layout(ctx, "AI Voiceovers in Indian Languages", &body, None)
}

// ── Pricing ──────────────────────────────────────────────────────

pub fn render_pricing(ctx: &ViewContext) -> String {
    let cards: String = PLANS
        .iter()
        .map(|p| {
            let badge = if p.popular {
                r#"<span class="badge">Most Popular</span>"#
            } else {
                ""
            };
            let period = if p.is_custom() {
                String::new()
            } else {
                format!(r#" <span class="muted">{}</span>"#, p.period)
            };
            let limits = if p.limitations.is_empty() {
                String::new()
            } else {
                let li: String = p
                    .limitations
                    .iter()
                    .map(|l| format!("<li>{l}</li>"))
                    .collect();
                format!(r#"<ul class="muted" style="margin-left:18px">{li}</ul>"#)
            };
            format!(
                r#"<div class="card">{badge}<h3>{}</h3><p class="muted">{}</p><p><strong style="font-size:28px">{}</strong>{period}</p><a class="btn btn-primary" href="/generate">{}</a>{}{limits}</div>"#,
                p.name,
                p.description,
                p.price,
                p.cta,
                feature_list(p.features)
            )
        })
        .collect();

    let body = format!(
        r#"<h1>Choose Your Perfect Plan</h1>
<p class="muted">Start free and scale as you grow. All plans include our premium Indian language AI voices.</p>
<div class="grid" style="margin-top:24px">{cards}</div>
<h2>Frequently Asked Questions</h2>
{faqs}
<section class="card" style="text-align:center">
  <h2>Ready to Get Started?</h2>
  <div class="actions" style="justify-content:center"><a class="btn btn-primary" href="/generate">Create Voice</a></div>
</section>"#,
        faqs = faq_list(PRICING_FAQS),
    );
    layout(ctx, "Pricing", &body, None)
}

// ── Support ──────────────────────────────────────────────────────

pub fn render_support(
    ctx: &ViewContext,
    query: &str,
    form: &ContactForm,
    notice: Option<&Notice>,
) -> String {
    let matches = search_faqs(query);
    let faqs = if matches.is_empty() {
        r#"<div class="card" style="text-align:center"><h3>No results found</h3><p class="muted">Try searching with different keywords or browse all FAQs below.</p></div>"#.to_string()
    } else {
        matches
            .iter()
            .map(|m| format!("<h3>{}</h3>{}", escape_html(m.category), faq_list(&m.questions)))
            .collect()
    };

    let resources: String = RESOURCES
        .iter()
        .map(|r| format!(r#"<div class="card"><h3>{}</h3><p class="muted">{}</p></div>"#, r.title, r.description))
        .collect();

    let contacts: String = CONTACT_OPTIONS
        .iter()
        .map(|c| {
            format!(
                r#"<div class="card"><h3>{}</h3><p class="muted">{}</p><p><strong>{}</strong></p><p class="muted">Response: {}</p></div>"#,
                c.title, c.description, c.contact, c.response_time
            )
        })
        .collect();

    let body = format!(
        r#"<h1>How can we help you?</h1>
<p class="muted">Find answers to common questions, browse our resources, or get in touch with our support team.</p>
<form method="GET" action="/support" class="form-group" style="margin-top:16px">
  <input type="search" name="q" value="{query}" placeholder="Search for help articles, FAQs, or guides...">
</form>
<div class="grid">{resources}</div>
<h2>Frequently Asked Questions</h2>
{faqs}
<h2>Contact Us</h2>
<div class="grid">{contacts}</div>
<div class="card">
  {notice}
  <form method="POST" action="/support/contact">
    <div class="form-group"><label>Name</label><input name="name" value="{name}" required></div>
    <div class="form-group"><label>Email</label><input type="email" name="email" value="{email}" required></div>
    <div class="form-group"><label>Subject</label><input name="subject" value="{subject}" required></div>
    <div class="form-group"><label>Message</label><textarea name="message" required>{message}</textarea></div>
    <button type="submit" class="btn btn-primary">Send Message</button>
  </form>
</div>"#,
        query = escape_html(query),
        notice = notice_html(notice),
        name = escape_html(&form.name),
        email = escape_html(&form.email),
        subject = escape_html(&form.subject),
        message = escape_html(&form.message),
    );
    layout(ctx, "Support", &body, None)
}
