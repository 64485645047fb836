//! Persisted records and the typed collection wrapper.

use super::Database;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;

/// Collection holding one document per successful voiceover.
pub const VOICE_GENERATIONS: &str = "voiceGenerations";
/// Collection holding one document per successful dub.
pub const VIDEO_DUBBINGS: &str = "videoDubbings";

// ── Records ──────────────────────────────────────────────────────

/// A completed voiceover. Created once, never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceGenerationRecord {
    pub user_id: String,
    /// Script exactly as the user typed it.
    pub script: String,
    /// Text that was synthesized (equal to `script` when no translation ran).
    pub translated_text: String,
    pub language: String,
    /// Persona id the user selected.
    pub voice: String,
    pub speed: f32,
    pub audio_url: String,
    pub created_at: DateTime<Utc>,
}

/// A completed dub. Created once, never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDubbingRecord {
    pub user_id: String,
    pub original_video_url: String,
    pub original_language: String,
    pub target_language: String,
    pub voice: String,
    pub original_text: String,
    pub translated_text: String,
    pub new_audio_url: String,
    pub processed_video_url: String,
    pub created_at: DateTime<Utc>,
}

/// A record together with the id the database assigned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(flatten)]
    pub record: T,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

// ── Queries ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub descending: bool,
}

/// Equality filters, one ordering and a limit: everything the app asks of `list`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub filters: Vec<(String, String)>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: &str, value: &str) -> Self {
        self.filters.push((field.to_string(), value.to_string()));
        self
    }

    pub fn order_desc(mut self, field: &str) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            descending: true,
        });
        self
    }

    pub fn order_asc(mut self, field: &str) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            descending: false,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The most recent `limit` records owned by `user_id`.
    pub fn recent_for_user(user_id: &str, limit: usize) -> Self {
        Self::new()
            .where_eq("userId", user_id)
            .order_desc("createdAt")
            .limit(limit)
    }
}

// ── Typed collection ─────────────────────────────────────────────

/// Typed view over one named collection of a [`Database`].
pub struct Collection<T> {
    db: Arc<dyn Database>,
    name: &'static str,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            name: self.name,
            _record: PhantomData,
        }
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(db: Arc<dyn Database>, name: &'static str) -> Self {
        Self {
            db,
            name,
            _record: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub async fn create(&self, record: &T) -> anyhow::Result<Stored<T>> {
        let doc = serde_json::to_value(record)?;
        let stored = self.db.create(self.name, doc).await?;
        serde_json::from_value(stored).map_err(|e| {
            anyhow::anyhow!("Unexpected record shape from collection {}: {e}", self.name)
        })
    }

    pub async fn list(&self, query: &ListQuery) -> anyhow::Result<Vec<Stored<T>>> {
        let docs = self.db.list(self.name, query).await?;
        docs.into_iter()
            .map(|doc| {
                serde_json::from_value(doc).map_err(|e| {
                    anyhow::anyhow!("Unexpected record shape from collection {}: {e}", self.name)
                })
            })
            .collect()
    }
}

impl Collection<VoiceGenerationRecord> {
    pub fn voice_generations(db: Arc<dyn Database>) -> Self {
        Self::new(db, VOICE_GENERATIONS)
    }
}

impl Collection<VideoDubbingRecord> {
    pub fn video_dubbings(db: Arc<dyn Database>) -> Self {
        Self::new(db, VIDEO_DUBBINGS)
    }
}
