use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ── Top-level ────────────────────────────────────────────────────

/// Effective PariVaani configuration (`~/.parivaani/config.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
pub struct Config {
    /// Path the config was loaded from. Not persisted.
    #[serde(skip)]
    #[schemars(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub baas: BaasConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub download: DownloadConfig,
}

// ── Gateway ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_host")]
    pub host: String,
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    /// Per-request timeout for page and API routes, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Body limit for JSON and form requests, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Body limit for the multipart video upload route, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_gateway_host() -> String {
    "127.0.0.1".into()
}

fn default_gateway_port() -> u16 {
    3000
}

fn default_request_timeout_secs() -> u64 {
    // Dubbing chains transcription, translation and synthesis back to back.
    300
}

fn default_max_body_bytes() -> usize {
    65_536
}

fn default_max_upload_bytes() -> usize {
    // 100 MiB video limit plus multipart framing.
    crate::workflow::dubbing::MAX_VIDEO_BYTES as usize + 1_048_576
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            request_timeout_secs: default_request_timeout_secs(),
            max_body_bytes: default_max_body_bytes(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

// ── BaaS ─────────────────────────────────────────────────────────

/// Connection settings for the backend-as-a-service project.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BaasConfig {
    /// Project URL (e.g. https://xxxx.supabase.co).
    #[serde(default)]
    pub url: String,
    /// Public anon key sent as `apikey` on every request.
    #[serde(default)]
    pub anon_key: String,
    /// Storage bucket that receives uploaded videos.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Path of the AI edge function, relative to `url`.
    #[serde(default = "default_ai_path")]
    pub ai_path: String,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_bucket() -> String {
    "uploads".into()
}

fn default_ai_path() -> String {
    "/functions/v1/ai".into()
}

fn default_http_timeout_secs() -> u64 {
    30
}

impl Default for BaasConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            bucket: default_bucket(),
            ai_path: default_ai_path(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

// ── Record store ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Records live in the BaaS database.
    #[default]
    Baas,
    /// Records live in a local SQLite file.
    Sqlite,
}

impl StoreBackend {
    pub fn from_str_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "baas" => Some(Self::Baas),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// SQLite file used when `backend = "sqlite"`. `~` is expanded.
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,
}

fn default_sqlite_path() -> String {
    "~/.parivaani/records.db".into()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            sqlite_path: default_sqlite_path(),
        }
    }
}

// ── Generation ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenerationConfig {
    /// Language scripts are written in; voiceovers in this language skip translation.
    #[serde(default = "default_source_language")]
    pub source_language: String,
    #[serde(default = "default_translation_model")]
    pub translation_model: String,
    #[serde(default = "default_speech_model")]
    pub speech_model: String,
    #[serde(default = "default_dubbing_max_tokens")]
    pub dubbing_max_tokens: u32,
}

fn default_source_language() -> String {
    "en".into()
}

fn default_translation_model() -> String {
    "gpt-4o-mini".into()
}

fn default_speech_model() -> String {
    "tts-1".into()
}

fn default_dubbing_max_tokens() -> u32 {
    2000
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            source_language: default_source_language(),
            translation_model: default_translation_model(),
            speech_model: default_speech_model(),
            dubbing_max_tokens: default_dubbing_max_tokens(),
        }
    }
}

// ── Dashboard ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DashboardConfig {
    /// Most recent records read per collection.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    20
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

// ── Download ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DownloadConfig {
    /// Directory downloaded audio and video files are saved to. `~` is expanded.
    #[serde(default = "default_download_directory")]
    pub directory: String,
}

fn default_download_directory() -> String {
    "~/Downloads".into()
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            directory: default_download_directory(),
        }
    }
}
