//! Backend-as-a-service collaborators.
//!
//! PariVaani owns no backend of its own: authentication, the record
//! database, blob storage and AI inference are all remote calls. Each
//! concern is a trait so workflows and the gateway can be driven by the
//! HTTP adapter ([`client::BaasClient`]), the local SQLite store, or test
//! doubles.
//!
//! ## Design
//! - Traits are object-safe (`async_trait`) and shared as `Arc<dyn _>`
//! - Errors are `anyhow::Error`; callers add stage context
//! - Records cross the [`Database`] seam as JSON documents; [`Collection`]
//!   adds the typed view

pub mod client;
pub mod records;

pub use client::BaasClient;
pub use records::{
    Collection, ListQuery, OrderBy, Stored, VideoDubbingRecord, VoiceGenerationRecord,
    VIDEO_DUBBINGS, VOICE_GENERATIONS,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ── Auth ─────────────────────────────────────────────────────────

/// A signed-in user as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Opaque access token plus the user it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user: User,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Exchange email and password for a session.
    async fn sign_in(&self, email: &str, password: &str) -> anyhow::Result<Session>;

    /// Resolve a previously issued token. `Ok(None)` means the token is not valid.
    async fn user_for_token(&self, access_token: &str) -> anyhow::Result<Option<User>>;

    /// Revoke a token.
    async fn sign_out(&self, access_token: &str) -> anyhow::Result<()>;
}

// ── Database ─────────────────────────────────────────────────────

/// Document database with named collections.
#[async_trait]
pub trait Database: Send + Sync {
    /// Insert a record and return it as stored (including its `id`).
    async fn create(
        &self,
        collection: &str,
        record: serde_json::Value,
    ) -> anyhow::Result<serde_json::Value>;

    /// List records matching `query`.
    async fn list(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> anyhow::Result<Vec<serde_json::Value>>;
}

// ── Storage ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct UploadOptions {
    /// Overwrite an existing object at the same path.
    pub upsert: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub public_url: String,
}

#[async_trait]
pub trait BlobStorage: Send + Sync {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        path: &str,
        content_type: &str,
        options: UploadOptions,
    ) -> anyhow::Result<UploadResult>;
}

// ── AI ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TextResponse {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeechRequest {
    pub text: String,
    /// Provider voice identifier (e.g. "onyx").
    pub voice: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpeechResponse {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptionRequest {
    /// URL of the audio or video to transcribe.
    pub audio: String,
    /// ISO 639-1 code of the spoken language.
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TranscriptionResponse {
    pub text: String,
}

/// AI inference: text generation, speech synthesis, transcription.
#[async_trait]
pub trait AiClient: Send + Sync {
    async fn generate_text(&self, request: &TextRequest) -> anyhow::Result<TextResponse>;

    async fn generate_speech(&self, request: &SpeechRequest) -> anyhow::Result<SpeechResponse>;

    async fn transcribe_audio(
        &self,
        request: &TranscriptionRequest,
    ) -> anyhow::Result<TranscriptionResponse>;
}

#[cfg(test)]
pub(crate) mod testing;
