//! Generation workflows: voiceover synthesis and video dubbing.
//!
//! Each workflow is a strictly sequential chain of remote calls. The chain
//! is modelled as an explicit state machine: every stage is a separate
//! async function returning `Result`, checkpoints are published as
//! [`Progress`] on a `tokio::sync::watch` channel before each await, and the
//! first failing stage aborts the rest with a [`WorkflowError`] naming it.
//!
//! ## Design
//! - No retries, no cancellation, no fan-out
//! - Nothing is persisted unless every upstream stage succeeded
//! - Progress percentages never decrease within one run

pub mod dubbing;
pub mod mux;
pub mod voice;

pub use dubbing::{
    DubbingInput, DubbingOutput, DubbingWorkflow, UploadRejection, UploadedVideo, MAX_VIDEO_BYTES,
};
pub use mux::{PassthroughMuxer, VideoMuxer};
pub use voice::{VoiceInput, VoiceOutput, VoiceWorkflow};

use crate::catalog::LanguageCode;
use crate::config::GenerationConfig;
use serde::Serialize;
use tokio::sync::watch;

// ── Stages ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    Idle,
    Uploading,
    Transcribing,
    Translating,
    Synthesizing,
    Processing,
    Persisting,
    Done,
    Failed,
}

impl WorkflowStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Uploading => "uploading",
            Self::Transcribing => "transcribing",
            Self::Translating => "translating",
            Self::Synthesizing => "synthesizing",
            Self::Processing => "processing",
            Self::Persisting => "persisting",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl std::fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Progress ─────────────────────────────────────────────────────

/// One checkpoint of a running workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub stage: WorkflowStage,
    pub percent: u8,
    pub label: String,
}

impl Progress {
    pub fn idle() -> Self {
        Self {
            stage: WorkflowStage::Idle,
            percent: 0,
            label: String::new(),
        }
    }
}

/// Publishing side of a workflow's progress channel.
pub type ProgressSender = watch::Sender<Progress>;

/// A fresh progress channel starting at [`Progress::idle`].
pub fn progress_channel() -> (ProgressSender, watch::Receiver<Progress>) {
    watch::channel(Progress::idle())
}

/// Publish a checkpoint. The percentage never moves backwards.
pub(crate) fn checkpoint(tx: &ProgressSender, stage: WorkflowStage, percent: u8, label: &str) {
    tx.send_modify(|p| {
        p.stage = stage;
        p.percent = p.percent.max(percent.min(100));
        p.label = label.to_string();
    });
    tracing::info!(stage = %stage, percent, "{label}");
}

/// Mark the run as failed, keeping the last percentage.
pub(crate) fn fail(tx: &ProgressSender, error: &WorkflowError) {
    tx.send_modify(|p| {
        p.stage = WorkflowStage::Failed;
        p.label = "Failed".into();
    });
    tracing::warn!(stage = %error.stage(), "Workflow failed: {error}");
}

// ── Errors ───────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// The input was refused before any network call.
    #[error(transparent)]
    Rejected(#[from] UploadRejection),

    /// A remote call failed.
    #[error("{stage} failed: {cause:#}")]
    Stage {
        stage: WorkflowStage,
        cause: anyhow::Error,
    },
}

impl WorkflowError {
    pub(crate) fn at(stage: WorkflowStage, cause: anyhow::Error) -> Self {
        Self::Stage { stage, cause }
    }

    /// Stage the failure happened in.
    pub fn stage(&self) -> WorkflowStage {
        match self {
            Self::Rejected(_) => WorkflowStage::Uploading,
            Self::Stage { stage, .. } => *stage,
        }
    }

    /// The underlying message, without the stage prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Rejected(r) => r.to_string(),
            Self::Stage { cause, .. } => format!("{cause:#}"),
        }
    }
}

/// Attach a stage to a fallible remote call.
pub(crate) trait StageContext<T> {
    fn stage(self, stage: WorkflowStage) -> Result<T, WorkflowError>;
}

impl<T> StageContext<T> for anyhow::Result<T> {
    fn stage(self, stage: WorkflowStage) -> Result<T, WorkflowError> {
        self.map_err(|e| WorkflowError::at(stage, e))
    }
}

// ── Settings ─────────────────────────────────────────────────────

/// Model and language settings shared by both workflows.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub source_language: LanguageCode,
    pub translation_model: String,
    pub speech_model: String,
    pub dubbing_max_tokens: u32,
}

impl GenerationSettings {
    pub fn from_config(config: &GenerationConfig) -> Self {
        let source_language = LanguageCode::from_str_code(&config.source_language)
            .unwrap_or_else(|| {
                tracing::warn!(
                    value = %config.source_language,
                    "Unknown source language, falling back to English"
                );
                LanguageCode::En
            });

        Self {
            source_language,
            translation_model: config.translation_model.clone(),
            speech_model: config.speech_model.clone(),
            dubbing_max_tokens: config.dubbing_max_tokens,
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self::from_config(&GenerationConfig::default())
    }
}

/// Estimated playback length: one second per ten characters, rounded up.
pub fn estimated_duration_secs(text: &str) -> u64 {
    let chars = text.chars().count() as u64;
    chars.div_ceil(10)
}

/// Milliseconds since the Unix epoch.
pub(crate) fn epoch_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
