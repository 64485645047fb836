//! Getting generated media onto the user's machine.
//!
//! Downloads walk a fallback chain and never fail outright:
//! 1. fetch the URL and save it to disk
//! 2. open the URL externally (browser) so the user can save it by hand
//! 3. copy the URL to the clipboard
//!
//! Each fallback runs only when the previous one failed; if all three fail
//! the outcome is [`DownloadOutcome::Failed`] carrying a notice.

pub mod system;

pub use system::SystemDownloader;

use crate::catalog::{find_persona, LanguageCode};
use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;

/// What is being downloaded; picks the `Accept` header and notice wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    pub fn noun(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }

    pub fn accept_header(self) -> &'static str {
        match self {
            Self::Audio => "audio/mpeg, audio/*",
            Self::Video => "video/mp4, video/*",
        }
    }

    pub fn from_str_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "audio" => Some(Self::Audio),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

/// File name for a downloaded voiceover:
/// `parivaani-{LanguageName}-{PersonaName}-{epochMillis}.mp3`.
pub fn audio_filename(language_code: &str, persona_id: &str, epoch_ms: i64) -> String {
    let language = LanguageCode::from_str_code(language_code)
        .map(LanguageCode::display_name)
        .unwrap_or("audio");
    let persona = find_persona(persona_id).map(|p| p.name).unwrap_or("voice");
    format!("parivaani-{language}-{persona}-{epoch_ms}.mp3")
}

/// File name for a downloaded dub: `parivaani-dub-{TargetLanguage}-{epochMillis}.mp4`.
pub fn video_filename(target_language: &str, epoch_ms: i64) -> String {
    let language = LanguageCode::from_str_code(target_language)
        .map(LanguageCode::display_name)
        .unwrap_or("video");
    format!("parivaani-dub-{language}-{epoch_ms}.mp4")
}

/// File name derived from the last path segment of a URL, used when nothing better is known.
pub fn filename_from_url(url: &str, kind: MediaKind) -> String {
    let tail = url
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .rsplit('/')
        .next()
        .unwrap_or_default();
    let decoded = urlencoding::decode(tail)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| tail.to_string());
    if decoded.is_empty() || decoded.contains(['/', '\\']) {
        match kind {
            MediaKind::Audio => "parivaani-audio.mp3".into(),
            MediaKind::Video => "parivaani-video.mp4".into(),
        }
    } else {
        decoded
    }
}

// ── Channels ─────────────────────────────────────────────────────

/// The three ways a URL can reach the user.
#[async_trait]
pub trait DownloadChannel: Send + Sync {
    /// Fetch `url` and save it as `file_name`; returns the saved path.
    async fn fetch_and_save(
        &self,
        url: &str,
        file_name: &str,
        kind: MediaKind,
    ) -> anyhow::Result<PathBuf>;

    /// Hand `url` to an external viewer (browser).
    async fn open_external(&self, url: &str) -> anyhow::Result<()>;

    /// Put `text` on the clipboard.
    async fn copy_to_clipboard(&self, text: &str) -> anyhow::Result<()>;
}

/// How a download ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DownloadOutcome {
    Saved { path: PathBuf },
    OpenedExternally,
    CopiedToClipboard,
    Failed { message: String },
}

impl DownloadOutcome {
    /// Message shown to the user.
    pub fn notice(&self, kind: MediaKind) -> String {
        let noun = kind.noun();
        match self {
            Self::Saved { path } => format!("Saved {noun} to {}", path.display()),
            Self::OpenedExternally => format!(
                "Download started in a new tab. Right-click the {noun} and select \"Save as...\" to download."
            ),
            Self::CopiedToClipboard => format!(
                "Download failed, but {noun} URL copied to clipboard. Paste it in a new tab to access your {noun}."
            ),
            Self::Failed { message } => message.clone(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Run the fallback chain for `url`. Never returns an error.
pub async fn download_with_fallback(
    channel: &dyn DownloadChannel,
    url: Option<&str>,
    file_name: &str,
    kind: MediaKind,
) -> DownloadOutcome {
    let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
        let message = match kind {
            MediaKind::Audio => {
                "No audio available to download. Please generate a voiceover first.".to_string()
            }
            MediaKind::Video => {
                "No video available to download. Please process a video first.".to_string()
            }
        };
        return DownloadOutcome::Failed { message };
    };

    let primary = match channel.fetch_and_save(url, file_name, kind).await {
        Ok(path) => {
            tracing::info!(path = %path.display(), "Download saved");
            return DownloadOutcome::Saved { path };
        }
        Err(e) => e,
    };
    tracing::warn!("Direct download failed, opening externally: {primary:#}");

    if let Err(e) = channel.open_external(url).await {
        tracing::warn!("Opening externally failed, copying URL: {e:#}");
    } else {
        return DownloadOutcome::OpenedExternally;
    }

    match channel.copy_to_clipboard(url).await {
        Ok(()) => DownloadOutcome::CopiedToClipboard,
        Err(e) => {
            tracing::error!("All download fallbacks failed: {e:#}");
            let message = match kind {
                MediaKind::Audio => format!(
                    "Download failed: {primary}. Please try generating the audio again."
                ),
                MediaKind::Video => format!(
                    "Download failed: {primary}. Please try processing the video again."
                ),
            };
            DownloadOutcome::Failed { message }
        }
    }
}
