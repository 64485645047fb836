//! Voiceover workflow: translate → pick provider voice → synthesize → persist.

use super::{
    checkpoint, epoch_millis, estimated_duration_secs, fail, GenerationSettings, ProgressSender,
    StageContext, WorkflowError, WorkflowStage,
};
use crate::baas::{
    AiClient, Collection, SpeechRequest, Stored, TextRequest, VoiceGenerationRecord,
};
use crate::catalog::{provider_voice_for, LanguageCode, ProviderVoice};
use crate::download::audio_filename;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

/// Everything the voice wizard collected.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceInput {
    pub user_id: String,
    pub script: String,
    pub language: LanguageCode,
    /// Persona id (e.g. "male-1").
    pub persona_id: String,
    pub speed: f32,
}

/// Result slot of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceOutput {
    pub record_id: String,
    pub audio_url: String,
    pub translated_text: String,
    pub estimated_duration_secs: u64,
    pub download_filename: String,
    #[serde(skip)]
    pub record: VoiceGenerationRecord,
}

pub struct VoiceWorkflow {
    ai: Arc<dyn AiClient>,
    generations: Collection<VoiceGenerationRecord>,
    settings: GenerationSettings,
}

impl VoiceWorkflow {
    pub fn new(
        ai: Arc<dyn AiClient>,
        generations: Collection<VoiceGenerationRecord>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            ai,
            generations,
            settings,
        }
    }

    /// Whether a script must be translated before synthesis.
    pub fn needs_translation(&self, language: LanguageCode) -> bool {
        language != self.settings.source_language
    }

    pub fn translation_prompt(language: LanguageCode, script: &str) -> String {
        format!(
            "Translate the following text to {}. Only return the translated text, nothing else:\n\n{script}",
            language.display_name()
        )
    }

    /// Translate `script` into `language`, returning the trimmed reply.
    pub async fn translate(
        &self,
        script: &str,
        language: LanguageCode,
    ) -> Result<String, WorkflowError> {
        let request = TextRequest {
            prompt: Self::translation_prompt(language, script),
            model: Some(self.settings.translation_model.clone()),
            max_tokens: None,
        };
        let response = self
            .ai
            .generate_text(&request)
            .await
            .stage(WorkflowStage::Translating)?;
        Ok(response.text.trim().to_string())
    }

    /// Synthesize `text` and return the audio URL.
    pub async fn synthesize(
        &self,
        text: &str,
        voice: ProviderVoice,
        speed: f32,
    ) -> Result<String, WorkflowError> {
        let request = SpeechRequest {
            text: text.to_string(),
            voice: voice.as_str().to_string(),
            model: self.settings.speech_model.clone(),
            speed: Some(speed),
        };
        let response = self
            .ai
            .generate_speech(&request)
            .await
            .stage(WorkflowStage::Synthesizing)?;

        if response.url.trim().is_empty() {
            return Err(WorkflowError::at(
                WorkflowStage::Synthesizing,
                anyhow::anyhow!("speech service returned no audio URL"),
            ));
        }
        Ok(response.url)
    }

    /// Store the record of a finished voiceover.
    pub async fn persist(
        &self,
        record: &VoiceGenerationRecord,
    ) -> Result<Stored<VoiceGenerationRecord>, WorkflowError> {
        self.generations
            .create(record)
            .await
            .stage(WorkflowStage::Persisting)
    }

    /// Run the whole chain, publishing checkpoints to `progress`.
    pub async fn run(
        &self,
        input: &VoiceInput,
        progress: &ProgressSender,
    ) -> Result<VoiceOutput, WorkflowError> {
        match self.run_stages(input, progress).await {
            Ok(output) => {
                checkpoint(progress, WorkflowStage::Done, 100, "Voiceover ready");
                Ok(output)
            }
            Err(e) => {
                fail(progress, &e);
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        input: &VoiceInput,
        progress: &ProgressSender,
    ) -> Result<VoiceOutput, WorkflowError> {
        let text = if self.needs_translation(input.language) {
            checkpoint(
                progress,
                WorkflowStage::Translating,
                25,
                &format!("Translating to {}...", input.language.display_name()),
            );
            self.translate(&input.script, input.language).await?
        } else {
            input.script.clone()
        };

        let voice = provider_voice_for(&input.persona_id);
        tracing::debug!(persona = %input.persona_id, voice = %voice, "Resolved provider voice");

        checkpoint(progress, WorkflowStage::Synthesizing, 50, "Generating voiceover...");
        let audio_url = self.synthesize(&text, voice, input.speed).await?;

        checkpoint(progress, WorkflowStage::Persisting, 75, "Saving voiceover...");
        let record = VoiceGenerationRecord {
            user_id: input.user_id.clone(),
            script: input.script.clone(),
            translated_text: text.clone(),
            language: input.language.as_str().to_string(),
            voice: input.persona_id.clone(),
            speed: input.speed,
            audio_url: audio_url.clone(),
            created_at: Utc::now(),
        };
        let stored = self.persist(&record).await?;

        Ok(VoiceOutput {
            record_id: stored.id,
            audio_url,
            estimated_duration_secs: estimated_duration_secs(&text),
            download_filename: audio_filename(
                input.language.as_str(),
                &input.persona_id,
                epoch_millis(),
            ),
            translated_text: text,
            record: stored.record,
        })
    }
}
