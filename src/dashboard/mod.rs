//! Per-user history and usage statistics.
//!
//! ## Design
//! - Reads one page (newest first) of each record collection; stats are
//!   computed over that page only
//! - `now` is injected so month boundaries are testable
//! - Favorite language is the most frequent code in the page; ties go to
//!   the code seen most recently

use crate::baas::{
    Collection, Database, ListQuery, Stored, VideoDubbingRecord, VoiceGenerationRecord,
};
use crate::catalog::{language_name, persona_name};
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

// ── Stats ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_generations: usize,
    pub this_month: usize,
    /// Script length summed in Unicode scalar values.
    pub total_characters: usize,
    /// Language code; `None` with no records.
    pub favorite_language: Option<String>,
}

impl DashboardStats {
    /// `records` must be ordered newest first.
    pub fn compute(records: &[VoiceGenerationRecord], now: DateTime<Utc>) -> Self {
        let this_month = records
            .iter()
            .filter(|r| r.created_at.year() == now.year() && r.created_at.month() == now.month())
            .count();
        let total_characters = records.iter().map(|r| r.script.chars().count()).sum();

        Self {
            total_generations: records.len(),
            this_month,
            total_characters,
            favorite_language: favorite_language(records),
        }
    }

    /// Display name of the favorite language, or "—" when there is none.
    pub fn favorite_language_label(&self) -> String {
        self.favorite_language
            .as_deref()
            .map(language_name)
            .unwrap_or_else(|| "—".to_string())
    }
}

fn favorite_language(records: &[VoiceGenerationRecord]) -> Option<String> {
    // code -> (count, index of first (most recent) occurrence)
    let mut tally: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, record) in records.iter().enumerate() {
        tally
            .entry(record.language.as_str())
            .and_modify(|(count, _)| *count += 1)
            .or_insert((1, idx));
    }
    tally
        .into_iter()
        .max_by(|(_, (ca, ia)), (_, (cb, ib))| ca.cmp(cb).then(ib.cmp(ia)))
        .map(|(code, _)| code.to_string())
}

// ── Rows ─────────────────────────────────────────────────────────

/// One voiceover as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRow {
    pub id: String,
    pub language: String,
    pub language_name: String,
    pub voice: String,
    pub voice_name: String,
    pub speed: f32,
    pub script: String,
    pub characters: usize,
    pub audio_url: String,
    pub created_at: DateTime<Utc>,
    pub created_label: String,
}

impl From<Stored<VoiceGenerationRecord>> for GenerationRow {
    fn from(stored: Stored<VoiceGenerationRecord>) -> Self {
        let r = stored.record;
        Self {
            id: stored.id,
            language_name: language_name(&r.language),
            voice_name: persona_name(&r.voice),
            characters: r.script.chars().count(),
            created_label: format_date(r.created_at),
            language: r.language,
            voice: r.voice,
            speed: r.speed,
            script: r.script,
            audio_url: r.audio_url,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DubbingRow {
    pub id: String,
    pub original_language_name: String,
    pub target_language_name: String,
    pub voice_name: String,
    pub translated_text: String,
    pub processed_video_url: String,
    pub created_at: DateTime<Utc>,
    pub created_label: String,
}

impl From<Stored<VideoDubbingRecord>> for DubbingRow {
    fn from(stored: Stored<VideoDubbingRecord>) -> Self {
        let r = stored.record;
        Self {
            id: stored.id,
            original_language_name: language_name(&r.original_language),
            target_language_name: language_name(&r.target_language),
            voice_name: persona_name(&r.voice),
            translated_text: r.translated_text,
            processed_video_url: r.processed_video_url,
            created_label: format_date(r.created_at),
            created_at: r.created_at,
        }
    }
}

/// e.g. "05 Mar 2026, 02:30 PM".
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%d %b %Y, %I:%M %p").to_string()
}

// ── Loader ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub generations: Vec<GenerationRow>,
    pub dubbings: Vec<DubbingRow>,
}

pub struct DashboardLoader {
    generations: Collection<VoiceGenerationRecord>,
    dubbings: Collection<VideoDubbingRecord>,
    page_size: usize,
}

impl DashboardLoader {
    pub fn new(db: Arc<dyn Database>, page_size: usize) -> Self {
        Self {
            generations: Collection::voice_generations(db.clone()),
            dubbings: Collection::video_dubbings(db),
            page_size: page_size.max(1),
        }
    }

    pub async fn load(&self, user_id: &str, now: DateTime<Utc>) -> anyhow::Result<Dashboard> {
        let query = ListQuery::recent_for_user(user_id, self.page_size);

        let generations = self.generations.list(&query).await?;
        let dubbings = self.dubbings.list(&query).await?;

        let records: Vec<VoiceGenerationRecord> =
            generations.iter().map(|s| s.record.clone()).collect();
        let stats = DashboardStats::compute(&records, now);
        tracing::debug!(
            user_id,
            generations = generations.len(),
            dubbings = dubbings.len(),
            "Loaded dashboard"
        );

        Ok(Dashboard {
            stats,
            generations: generations.into_iter().map(GenerationRow::from).collect(),
            dubbings: dubbings.into_iter().map(DubbingRow::from).collect(),
        })
    }
}
