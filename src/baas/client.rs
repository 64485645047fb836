//! HTTP adapter for a Supabase-style BaaS project.
//!
//! One client implements all four collaborator traits:
//! - Auth: GoTrue password grant, user lookup, logout
//! - Database: PostgREST insert and filtered list
//! - Storage: object upload with optional upsert, public URL derivation
//! - AI: an edge function exposing `/text`, `/speech` and `/transcribe`
//!
//! ## Design
//! - HTTP client (reqwest) with the configured timeout; no retries
//! - The anon key goes out as both `apikey` and bearer token
//! - Non-success responses become errors carrying status and body

use super::{
    AiClient, AuthProvider, BlobStorage, Database, ListQuery, Session, SpeechRequest,
    SpeechResponse, TextRequest, TextResponse, TranscriptionRequest, TranscriptionResponse,
    UploadOptions, UploadResult, User,
};
use crate::config::BaasConfig;
use async_trait::async_trait;
use serde::Deserialize;

/// BaaS HTTP client.
#[derive(Clone)]
pub struct BaasClient {
    config: BaasConfig,
    http: reqwest::Client,
}

impl BaasClient {
    /// Create a new client.
    pub fn new(config: BaasConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(Self { config, http })
    }

    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    /// Build the PostgREST URL for a collection.
    fn table_url(&self, collection: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url(), collection)
    }

    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url(), endpoint)
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url(),
            self.config.bucket,
            encode_path(path)
        )
    }

    /// Public URL of an uploaded object.
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url(),
            self.config.bucket,
            encode_path(path)
        )
    }

    fn ai_url(&self, operation: &str) -> String {
        let path = self.config.ai_path.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}/{}", self.base_url(), path, operation)
        } else {
            format!("{}/{}/{}", self.base_url(), path, operation)
        }
    }

    /// Get the base headers for authenticated requests.
    fn auth_headers(&self) -> Vec<(&str, String)> {
        vec![
            ("apikey", self.config.anon_key.clone()),
            ("Authorization", format!("Bearer {}", self.config.anon_key)),
        ]
    }

    /// Headers for calls made on behalf of a signed-in user.
    fn user_headers(&self, access_token: &str) -> Vec<(&str, String)> {
        vec![
            ("apikey", self.config.anon_key.clone()),
            ("Authorization", format!("Bearer {access_token}")),
        ]
    }

    /// Build the PostgREST query string for a list call.
    fn list_query_string(query: &ListQuery) -> String {
        let mut parts: Vec<String> = vec!["select=*".to_string()];
        for (field, value) in &query.filters {
            parts.push(format!(
                "{}=eq.{}",
                urlencoding::encode(field),
                urlencoding::encode(value)
            ));
        }
        if let Some(order) = &query.order_by {
            let direction = if order.descending { "desc" } else { "asc" };
            parts.push(format!(
                "order={}.{direction}",
                urlencoding::encode(&order.field)
            ));
        }
        if let Some(limit) = query.limit {
            parts.push(format!("limit={limit}"));
        }
        parts.join("&")
    }

    async fn post_ai<B, R>(&self, operation: &str, body: &B) -> anyhow::Result<R>
    where
        B: serde::Serialize + Sync,
        R: serde::de::DeserializeOwned,
    {
        let mut request = self.http.post(self.ai_url(operation)).json(body);
        for (key, value) in self.auth_headers() {
            request = request.header(key, value);
        }

        let resp = request.send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("AI {operation} request failed ({status}): {body}");
        }

        Ok(resp.json().await?)
    }

    /// Check if the BaaS project is reachable.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/rest/v1/", self.base_url());

        let mut request = self.http.get(&url);
        for (key, value) in self.auth_headers() {
            request = request.header(key, value);
        }

        matches!(request.send().await, Ok(resp) if resp.status().is_success())
    }
}

/// Percent-encode each segment of an object path, keeping the separators.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

// ── Auth ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: User,
}

#[async_trait]
impl AuthProvider for BaasClient {
    async fn sign_in(&self, email: &str, password: &str) -> anyhow::Result<Session> {
        let payload = serde_json::json!({
            "email": email,
            "password": password,
        });

        let mut request = self
            .http
            .post(self.auth_url("token?grant_type=password"))
            .json(&payload);
        for (key, value) in self.auth_headers() {
            request = request.header(key, value);
        }

        let resp = request.send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Sign-in failed ({status}): {body}");
        }

        let token: TokenResponse = resp.json().await?;
        Ok(Session {
            access_token: token.access_token,
            user: token.user,
        })
    }

    async fn user_for_token(&self, access_token: &str) -> anyhow::Result<Option<User>> {
        let mut request = self.http.get(self.auth_url("user"));
        for (key, value) in self.user_headers(access_token) {
            request = request.header(key, value);
        }

        let resp = request.send().await?;
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("User lookup failed ({status}): {body}");
        }

        Ok(Some(resp.json().await?))
    }

    async fn sign_out(&self, access_token: &str) -> anyhow::Result<()> {
        let mut request = self.http.post(self.auth_url("logout"));
        for (key, value) in self.user_headers(access_token) {
            request = request.header(key, value);
        }

        let resp = request.send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Sign-out failed ({status}): {body}");
        }

        Ok(())
    }
}

// ── Database ─────────────────────────────────────────────────────

#[async_trait]
impl Database for BaasClient {
    async fn create(
        &self,
        collection: &str,
        record: serde_json::Value,
    ) -> anyhow::Result<serde_json::Value> {
        let mut request = self
            .http
            .post(self.table_url(collection))
            .json(&record)
            .header("Prefer", "return=representation");
        for (key, value) in self.auth_headers() {
            request = request.header(key, value);
        }

        let resp = request.send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Failed to create {collection} record ({status}): {body}");
        }

        let created: Vec<serde_json::Value> = resp.json().await?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("Record creation in {collection} returned empty response"))
    }

    async fn list(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> anyhow::Result<Vec<serde_json::Value>> {
        let url = format!(
            "{}?{}",
            self.table_url(collection),
            Self::list_query_string(query)
        );

        let mut request = self.http.get(&url);
        for (key, value) in self.auth_headers() {
            request = request.header(key, value);
        }

        let resp = request.send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Failed to list {collection} ({status}): {body}");
        }

        Ok(resp.json().await?)
    }
}

// ── Storage ──────────────────────────────────────────────────────

#[async_trait]
impl BlobStorage for BaasClient {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        path: &str,
        content_type: &str,
        options: UploadOptions,
    ) -> anyhow::Result<UploadResult> {
        let mut request = self
            .http
            .post(self.object_url(path))
            .header("Content-Type", content_type)
            .header("x-upsert", if options.upsert { "true" } else { "false" })
            .body(bytes);
        for (key, value) in self.auth_headers() {
            request = request.header(key, value);
        }

        let resp = request.send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Upload to {path} failed ({status}): {body}");
        }

        tracing::debug!(path, "Uploaded object");
        Ok(UploadResult {
            public_url: self.public_url(path),
        })
    }
}

// ── AI ───────────────────────────────────────────────────────────

#[async_trait]
impl AiClient for BaasClient {
    async fn generate_text(&self, request: &TextRequest) -> anyhow::Result<TextResponse> {
        self.post_ai("text", request).await
    }

    async fn generate_speech(&self, request: &SpeechRequest) -> anyhow::Result<SpeechResponse> {
        self.post_ai("speech", request).await
    }

    async fn transcribe_audio(
        &self,
        request: &TranscriptionRequest,
    ) -> anyhow::Result<TranscriptionResponse> {
        self.post_ai("transcribe", request).await
    }
}

// ── Tests ────────────────────────────────────────────────────────
