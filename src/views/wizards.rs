//! Generator and dubbing-studio pages, one form per wizard step.

use super::{escape_html, gated, layout, notice_html, progress_bar, step_indicator, ViewContext};
use crate::catalog::{
    find_persona, personas_for, LanguageCode, DUBBING_LANGUAGES, DUBBING_PERSONA_IDS,
    VOICE_LANGUAGES, VOICE_PERSONA_IDS,
};
use crate::download::video_filename;
use crate::wizard::dubbing::DubbingWizardView;
use crate::wizard::voice::{VoiceWizardView, MAX_SPEED, MIN_SPEED, SPEED_STEP};

/// Seconds between reloads while a job runs.
const REFRESH_SECS: u32 = 2;

fn language_options(name: &str, languages: &[LanguageCode], selected: Option<LanguageCode>) -> String {
    let items: String = languages
        .iter()
        .map(|l| {
            let checked = if Some(*l) == selected { " checked" } else { "" };
            format!(
                r#"<label><input type="radio" name="{name}" value="{code}"{checked}>{label}</label>"#,
                code = l.as_str(),
                label = l.display_name(),
            )
        })
        .collect();
    format!(r#"<div class="options">{items}</div>"#)
}

fn persona_options(ids: &[&str], selected: Option<&str>) -> String {
    let items: String = personas_for(ids)
        .into_iter()
        .map(|p| {
            let checked = if Some(p.id) == selected { " checked" } else { "" };
            format!(
                r#"<label><input type="radio" name="voice" value="{id}"{checked}><strong>{name}</strong><br><small class="muted">{gender:?} · {tone:?}</small></label>"#,
                id = p.id,
                name = p.name,
                gender = p.gender,
                tone = p.tone,
            )
        })
        .collect();
    format!(r#"<div class="options">{items}</div>"#)
}

fn nav_buttons(step: usize, can_advance: bool, busy: bool) -> String {
    let back = if step > 1 {
        format!(
            r#"<button type="submit" name="action" value="back" class="btn btn-secondary"{}>Previous</button>"#,
            if busy { " disabled" } else { "" }
        )
    } else {
        String::new()
    };
    let next_disabled = if busy { " disabled" } else { "" };
    // `can_advance` reflects saved state; the button still submits so a
    // freshly filled field is saved and re-checked server side.
    let hint = if can_advance {
        ""
    } else {
        r#"<span class="muted">Complete this step to continue</span>"#
    };
    format!(
        r#"<div class="actions">{back}<button type="submit" name="action" value="next" class="btn btn-primary"{next_disabled}>Next</button>{hint}</div>"#
    )
}

fn persona_label(id: Option<&str>) -> String {
    id.and_then(find_persona)
        .map(|p| p.name.to_string())
        .unwrap_or_else(|| "—".to_string())
}

fn language_label(code: Option<LanguageCode>) -> &'static str {
    code.map(LanguageCode::display_name).unwrap_or("—")
}

// ── Voice generator ──────────────────────────────────────────────

pub fn render_generator(ctx: &ViewContext, view: &VoiceWizardView) -> String {
    gated(ctx, "create voiceovers", || {
        let refresh = view.generating.then_some(REFRESH_SECS);
        let body = format!(
            r#"<h1>Create Voiceover</h1>
<p class="muted">Step {step} of {count}</p>
{stepper}
{notice}
<div class="card">{content}</div>"#,
            step = view.step,
            count = view.step_count,
            stepper = step_indicator(&view.steps, view.step),
            notice = notice_html(view.notice.as_ref()),
            content = voice_step_content(view),
        );
        layout(ctx, "Create Voiceover", &body, refresh)
    })
}

fn voice_step_content(view: &VoiceWizardView) -> String {
    let nav = nav_buttons(view.step, view.can_advance, view.generating);
    match view.step {
        1 => format!(
            r#"<form method="POST" action="/generate">
  <h3>Enter Your Script</h3>
  <div class="form-group"><textarea name="script" placeholder="Type or paste your script here...">{script}</textarea></div>
  <p class="muted">{chars} characters · ~{secs} seconds</p>
  {nav}
</form>"#,
            script = escape_html(&view.script),
            chars = view.script.chars().count(),
            secs = view.estimated_duration_secs,
        ),
        2 => format!(
            r#"<form method="POST" action="/generate">
  <h3>Choose Language</h3>
  {options}
  {nav}
</form>"#,
            options = language_options("language", VOICE_LANGUAGES, view.language),
        ),
        3 => format!(
            r#"<form method="POST" action="/generate">
  <h3>Select Voice</h3>
  {options}
  {nav}
</form>"#,
            options = persona_options(VOICE_PERSONA_IDS, view.voice.as_deref()),
        ),
        4 => format!(
            r#"<form method="POST" action="/generate">
  <h3>Voice Settings</h3>
  <div class="form-group">
    <label>Speed: {speed:.1}x</label>
    <input type="range" name="speed" min="{MIN_SPEED}" max="{MAX_SPEED}" step="{SPEED_STEP}" value="{speed:.1}">
  </div>
  {nav}
</form>"#,
            speed = view.speed,
        ),
        _ => voice_generate_step(view),
    }
}

fn voice_generate_step(view: &VoiceWizardView) -> String {
    let summary = format!(
        r#"<h3>Generate Voiceover</h3>
<p class="muted">{lang} · {voice} · {speed:.1}x · ~{secs}s</p>"#,
        lang = language_label(view.language),
        voice = persona_label(view.voice.as_deref()),
        speed = view.speed,
        secs = view.estimated_duration_secs,
    );

    if view.generating {
        let (percent, label) = view
            .progress
            .as_ref()
            .map(|p| (p.percent, p.label.as_str()))
            .unwrap_or((0, "Starting..."));
        return format!("{summary}{}", progress_bar(percent, label));
    }

    let result = match &view.result {
        Some(out) => format!(
            r#"<div class="notice">Your voiceover is ready!</div>
<audio controls src="{url}" style="width:100%"></audio>
<p class="muted" style="margin-top:8px">{text}</p>
<p class="muted">Estimated duration: {secs}s</p>
<div class="actions">
  <a class="btn btn-primary" href="{url}" download="{file}">Download MP3</a>
</div>"#,
            url = escape_html(&out.audio_url),
            text = escape_html(&out.translated_text),
            secs = out.estimated_duration_secs,
            file = escape_html(&out.download_filename),
        ),
        None => String::new(),
    };

    let primary = if view.result.is_some() {
        r#"<button type="submit" name="action" value="start_over" class="btn btn-secondary">Create Another</button>"#
    } else {
        r#"<button type="submit" name="action" value="generate" class="btn btn-primary">Generate Voiceover</button>"#
    };

    format!(
        r#"{summary}{result}
<form method="POST" action="/generate">
  <div class="actions">
    <button type="submit" name="action" value="back" class="btn btn-secondary">Previous</button>
    {primary}
  </div>
</form>"#
    )
}

// ── Dubbing studio ───────────────────────────────────────────────

pub fn render_dubbing(ctx: &ViewContext, view: &DubbingWizardView) -> String {
    gated(ctx, "dub videos", || {
        let refresh = (view.processing || view.uploading).then_some(REFRESH_SECS);
        let body = format!(
            r#"<h1>Video Dubbing Studio</h1>
<p class="muted">Step {step} of {count}</p>
{stepper}
{notice}
<div class="card">{content}</div>"#,
            step = view.step,
            count = view.step_count,
            stepper = step_indicator(&view.steps, view.step),
            notice = notice_html(view.notice.as_ref()),
            content = dubbing_step_content(view),
        );
        layout(ctx, "Video Dubbing", &body, refresh)
    })
}

fn dubbing_step_content(view: &DubbingWizardView) -> String {
    let busy = view.processing || view.uploading;
    let nav = nav_buttons(view.step, view.can_advance, busy);
    let targets: Vec<LanguageCode> = DUBBING_LANGUAGES
        .iter()
        .copied()
        .filter(|l| Some(*l) != view.original_language)
        .collect();
    match view.step {
        1 => dubbing_upload_step(view, &nav),
        2 => format!(
            r#"<form method="POST" action="/video-dubbing">
  <h3>Original Language</h3>
  {options}
  {nav}
</form>"#,
            options = language_options("original_language", DUBBING_LANGUAGES, view.original_language),
        ),
        3 => format!(
            r#"<form method="POST" action="/video-dubbing">
  <h3>Target Language</h3>
  {options}
  {nav}
</form>"#,
            options = language_options("target_language", &targets, view.target_language),
        ),
        4 => format!(
            r#"<form method="POST" action="/video-dubbing">
  <h3>Voice Selection</h3>
  {options}
  {nav}
</form>"#,
            options = persona_options(DUBBING_PERSONA_IDS, view.voice.as_deref()),
        ),
        _ => dubbing_process_step(view),
    }
}

fn dubbing_upload_step(view: &DubbingWizardView, nav: &str) -> String {
    if view.uploading {
        return r#"<h3>Upload Video</h3><p class="muted">Uploading...</p>"#.to_string();
    }
    match &view.upload {
        Some(video) => format!(
            r#"<h3>Upload Video</h3>
<p><strong>{name}</strong> <span class="muted">{size}</span></p>
<form method="POST" action="/video-dubbing">
  <div class="actions"><button type="submit" name="action" value="clear_upload" class="btn btn-secondary">Choose Different Video</button></div>
  {nav}
</form>"#,
            name = escape_html(&video.name),
            size = view.upload_size.as_deref().unwrap_or_default(),
        ),
        None => r#"<h3>Upload Video</h3>
<p class="muted">MP4, MOV, AVI or WebM, up to 100MB</p>
<form method="POST" action="/video-dubbing/upload" enctype="multipart/form-data">
  <div class="form-group"><input type="file" name="video" accept="video/*" required></div>
  <button type="submit" class="btn btn-primary">Upload</button>
</form>"#
            .to_string(),
    }
}

fn dubbing_process_step(view: &DubbingWizardView) -> String {
    let summary = format!(
        r#"<h3>Process Video</h3>
<p class="muted">{video} · {from} → {to} · {voice}</p>"#,
        video = view
            .upload
            .as_ref()
            .map(|v| escape_html(&v.name))
            .unwrap_or_default(),
        from = language_label(view.original_language),
        to = language_label(view.target_language),
        voice = persona_label(view.voice.as_deref()),
    );

    if view.processing {
        let (percent, label) = view
            .progress
            .as_ref()
            .map(|p| (p.percent, p.label.as_str()))
            .unwrap_or((0, "Starting..."));
        return format!("{summary}{}", progress_bar(percent, label));
    }

    let result = match &view.result {
        Some(out) => {
            let file = video_filename(
                &out.record.target_language,
                out.record.created_at.timestamp_millis(),
            );
            format!(
                r#"<div class="notice">Your dubbed video is ready!</div>
<video controls src="{video}" style="width:100%"></video>
<h3 style="margin-top:12px">Original</h3><p class="muted">{original}</p>
<h3>Translated</h3><p class="muted">{translated}</p>
<div class="actions">
  <a class="btn btn-primary" href="{video}" download="{file}">Download Video</a>
  <a class="btn btn-secondary" href="{audio}" download>Download Audio</a>
</div>"#,
                video = escape_html(&out.processed_video_url),
                audio = escape_html(&out.new_audio_url),
                original = escape_html(&out.original_text),
                translated = escape_html(&out.translated_text),
                file = escape_html(&file),
            )
        }
        None => String::new(),
    };

    let primary = if view.result.is_some() {
        r#"<button type="submit" name="action" value="start_over" class="btn btn-secondary">Dub Another Video</button>"#
    } else {
        r#"<button type="submit" name="action" value="process" class="btn btn-primary">Start Dubbing</button>"#
    };

    format!(
        r#"{summary}{result}
<form method="POST" action="/video-dubbing">
  <div class="actions">
    <button type="submit" name="action" value="back" class="btn btn-secondary">Previous</button>
    {primary}
  </div>
</form>"#
    )
}
