//! In-memory collaborators for unit tests.

use super::{
    AiClient, AuthProvider, BlobStorage, Database, ListQuery, Session, SpeechRequest,
    SpeechResponse, TextRequest, TextResponse, TranscriptionRequest, TranscriptionResponse,
    UploadOptions, UploadResult, User,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

// ── Auth ─────────────────────────────────────────────────────────

/// Accepts one email/password pair and issues `token-{user_id}`.
pub struct FakeAuth {
    pub email: String,
    pub password: String,
    pub user_id: String,
    pub signed_out: Mutex<Vec<String>>,
}

impl FakeAuth {
    pub fn new(email: &str, password: &str, user_id: &str) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            user_id: user_id.into(),
            signed_out: Mutex::new(Vec::new()),
        }
    }

    pub fn token(&self) -> String {
        format!("token-{}", self.user_id)
    }

    fn user(&self) -> User {
        User {
            id: self.user_id.clone(),
            email: Some(self.email.clone()),
        }
    }
}

#[async_trait]
impl AuthProvider for FakeAuth {
    async fn sign_in(&self, email: &str, password: &str) -> anyhow::Result<Session> {
        if email != self.email || password != self.password {
            anyhow::bail!("Invalid login credentials");
        }
        Ok(Session {
            access_token: self.token(),
            user: self.user(),
        })
    }

    async fn user_for_token(&self, access_token: &str) -> anyhow::Result<Option<User>> {
        let revoked = self.signed_out.lock().iter().any(|t| t == access_token);
        if access_token == self.token() && !revoked {
            Ok(Some(self.user()))
        } else {
            Ok(None)
        }
    }

    async fn sign_out(&self, access_token: &str) -> anyhow::Result<()> {
        self.signed_out.lock().push(access_token.to_string());
        Ok(())
    }
}

// ── Database ─────────────────────────────────────────────────────

/// Vec-backed collections with the same filter/order/limit semantics as PostgREST.
#[derive(Default)]
pub struct MemoryDatabase {
    pub collections: Mutex<HashMap<String, Vec<serde_json::Value>>>,
    pub fail_creates: bool,
    next_id: Mutex<u64>,
}

impl MemoryDatabase {
    pub fn failing() -> Self {
        Self {
            fail_creates: true,
            ..Self::default()
        }
    }

    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .get(collection)
            .map_or(0, |docs| docs.len())
    }

    pub fn insert_raw(&self, collection: &str, doc: serde_json::Value) {
        self.collections
            .lock()
            .entry(collection.to_string())
            .or_default()
            .push(doc);
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn create(
        &self,
        collection: &str,
        mut record: serde_json::Value,
    ) -> anyhow::Result<serde_json::Value> {
        if self.fail_creates {
            anyhow::bail!("database unavailable");
        }
        let id = {
            let mut next = self.next_id.lock();
            *next += 1;
            *next
        };
        record["id"] = serde_json::json!(format!("rec-{id}"));
        self.insert_raw(collection, record.clone());
        Ok(record)
    }

    async fn list(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> anyhow::Result<Vec<serde_json::Value>> {
        let mut docs: Vec<serde_json::Value> = self
            .collections
            .lock()
            .get(collection)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|doc| {
                query
                    .filters
                    .iter()
                    .all(|(field, value)| doc[field].as_str() == Some(value.as_str()))
            })
            .collect();

        if let Some(order) = &query.order_by {
            docs.sort_by(|a, b| {
                let ka = a[&order.field].as_str().unwrap_or_default();
                let kb = b[&order.field].as_str().unwrap_or_default();
                if order.descending {
                    kb.cmp(ka)
                } else {
                    ka.cmp(kb)
                }
            });
        }
        if let Some(limit) = query.limit {
            docs.truncate(limit);
        }
        Ok(docs)
    }
}

// ── Storage ──────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeStorage {
    pub uploads: Mutex<Vec<(String, String, usize, bool)>>,
    pub fail: bool,
    /// Never complete an upload.
    pub stall: bool,
}

#[async_trait]
impl BlobStorage for FakeStorage {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        path: &str,
        content_type: &str,
        options: UploadOptions,
    ) -> anyhow::Result<UploadResult> {
        if self.fail {
            anyhow::bail!("storage unavailable");
        }
        if self.stall {
            std::future::pending::<()>().await;
        }
        self.uploads.lock().push((
            path.to_string(),
            content_type.to_string(),
            bytes.len(),
            options.upsert,
        ));
        Ok(UploadResult {
            public_url: format!("https://cdn.test/{path}"),
        })
    }
}

// ── AI ───────────────────────────────────────────────────────────

/// Scripted AI client that records every call in order.
#[derive(Default)]
pub struct FakeAi {
    pub calls: Mutex<Vec<String>>,
    pub text_requests: Mutex<Vec<TextRequest>>,
    pub speech_requests: Mutex<Vec<SpeechRequest>>,
    pub transcription_requests: Mutex<Vec<TranscriptionRequest>>,
    pub translation: String,
    pub transcript: String,
    pub fail_text: bool,
    pub fail_speech: bool,
    pub fail_transcribe: bool,
}

impl FakeAi {
    pub fn new() -> Self {
        Self {
            translation: "  नमस्ते  ".into(),
            transcript: "Hello world".into(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl AiClient for FakeAi {
    async fn generate_text(&self, request: &TextRequest) -> anyhow::Result<TextResponse> {
        self.calls.lock().push("text".into());
        self.text_requests.lock().push(request.clone());
        if self.fail_text {
            anyhow::bail!("text model overloaded");
        }
        Ok(TextResponse {
            text: self.translation.clone(),
        })
    }

    async fn generate_speech(&self, request: &SpeechRequest) -> anyhow::Result<SpeechResponse> {
        self.calls.lock().push("speech".into());
        self.speech_requests.lock().push(request.clone());
        if self.fail_speech {
            anyhow::bail!("speech quota exceeded");
        }
        Ok(SpeechResponse {
            url: format!("https://cdn.test/audio/{}.mp3", request.voice),
        })
    }

    async fn transcribe_audio(
        &self,
        request: &TranscriptionRequest,
    ) -> anyhow::Result<TranscriptionResponse> {
        self.calls.lock().push("transcribe".into());
        self.transcription_requests.lock().push(request.clone());
        if self.fail_transcribe {
            anyhow::bail!("no speech detected");
        }
        Ok(TranscriptionResponse {
            text: self.transcript.clone(),
        })
    }
}
