//! Video dubbing workflow.
//!
//! Upload (validated before any network call), then:
//! transcribe → translate → synthesize → mux → persist.

use super::{
    checkpoint, epoch_millis, fail, GenerationSettings, ProgressSender, StageContext,
    VideoMuxer, WorkflowError, WorkflowStage,
};
use crate::baas::{
    AiClient, BlobStorage, Collection, SpeechRequest, Stored, TextRequest, TranscriptionRequest,
    UploadOptions, VideoDubbingRecord,
};
use crate::catalog::{provider_voice_for, LanguageCode};
use chrono::Utc;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Largest accepted video: 100 MiB.
pub const MAX_VIDEO_BYTES: u64 = 100 * 1024 * 1024;

// ── Upload validation ────────────────────────────────────────────

/// Why a file was refused before upload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejection {
    #[error("Please select a valid video file")]
    NotVideo,
    #[error("File size must be less than 100MB")]
    TooLarge { size: u64 },
    #[error("The selected file is empty")]
    Empty,
}

/// Check a file's shape and return the content type to upload it with.
///
/// When `content_type` is missing or blank it is guessed from the file name.
pub fn validate_video(
    file_name: &str,
    content_type: Option<&str>,
    size: u64,
) -> Result<String, UploadRejection> {
    let content_type = match content_type.map(str::trim).filter(|ct| !ct.is_empty()) {
        Some(ct) => ct.to_string(),
        None => mime_guess::from_path(file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
    };

    if !content_type.starts_with("video/") {
        return Err(UploadRejection::NotVideo);
    }
    if size > MAX_VIDEO_BYTES {
        return Err(UploadRejection::TooLarge { size });
    }
    if size == 0 {
        return Err(UploadRejection::Empty);
    }
    Ok(content_type)
}

/// Last path segment of a client-supplied file name.
fn base_name(file_name: &str) -> &str {
    file_name
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("video")
}

/// Storage path for an upload: `videos/{user}/{epochMillis}-{name}`.
pub fn upload_path(user_id: &str, file_name: &str, epoch_ms: i64) -> String {
    format!("videos/{user_id}/{epoch_ms}-{}", base_name(file_name))
}

/// A video that has been stored and can be dubbed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedVideo {
    pub name: String,
    pub size_bytes: u64,
    pub content_type: String,
    pub url: String,
}

impl UploadedVideo {
    /// Size in MiB with one decimal, as shown after upload.
    pub fn size_label(&self) -> String {
        format!("{:.1} MB", self.size_bytes as f64 / (1024.0 * 1024.0))
    }
}

// ── Processing ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct DubbingInput {
    pub user_id: String,
    pub video_url: String,
    pub original_language: LanguageCode,
    pub target_language: LanguageCode,
    pub persona_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DubbingOutput {
    pub record_id: String,
    pub processed_video_url: String,
    pub new_audio_url: String,
    pub original_text: String,
    pub translated_text: String,
    #[serde(skip)]
    pub record: VideoDubbingRecord,
}

pub struct DubbingWorkflow {
    ai: Arc<dyn AiClient>,
    storage: Arc<dyn BlobStorage>,
    dubbings: Collection<VideoDubbingRecord>,
    muxer: Arc<dyn VideoMuxer>,
    settings: GenerationSettings,
}

impl DubbingWorkflow {
    pub fn new(
        ai: Arc<dyn AiClient>,
        storage: Arc<dyn BlobStorage>,
        dubbings: Collection<VideoDubbingRecord>,
        muxer: Arc<dyn VideoMuxer>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            ai,
            storage,
            dubbings,
            muxer,
            settings,
        }
    }

    /// Validate and store a video. Nothing is sent when validation fails.
    pub async fn upload(
        &self,
        user_id: &str,
        file_name: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<UploadedVideo, WorkflowError> {
        let size = bytes.len() as u64;
        let content_type = validate_video(file_name, content_type, size)?;
        let path = upload_path(user_id, file_name, epoch_millis());

        tracing::info!(user_id, path = %path, size, "Uploading video");
        let stored = self
            .storage
            .upload(bytes, &path, &content_type, UploadOptions { upsert: true })
            .await
            .stage(WorkflowStage::Uploading)?;

        Ok(UploadedVideo {
            name: base_name(file_name).to_string(),
            size_bytes: size,
            content_type,
            url: stored.public_url,
        })
    }

    pub fn translation_prompt(from: LanguageCode, to: LanguageCode, text: &str) -> String {
        format!(
            "Translate the following text from {} to {}. Maintain the same tone and meaning:\n\n{text}",
            from.display_name(),
            to.display_name()
        )
    }

    pub async fn transcribe(
        &self,
        video_url: &str,
        language: LanguageCode,
    ) -> Result<String, WorkflowError> {
        let request = TranscriptionRequest {
            audio: video_url.to_string(),
            language: language.as_str().to_string(),
        };
        let response = self
            .ai
            .transcribe_audio(&request)
            .await
            .stage(WorkflowStage::Transcribing)?;

        let text = response.text.trim().to_string();
        if text.is_empty() {
            return Err(WorkflowError::at(
                WorkflowStage::Transcribing,
                anyhow::anyhow!("no speech was detected in the video"),
            ));
        }
        Ok(text)
    }

    /// Translate a transcript. Identity when both languages are the same.
    pub async fn translate(
        &self,
        text: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<String, WorkflowError> {
        if from == to {
            return Ok(text.to_string());
        }

        let request = TextRequest {
            prompt: Self::translation_prompt(from, to, text),
            model: None,
            max_tokens: Some(self.settings.dubbing_max_tokens),
        };
        let response = self
            .ai
            .generate_text(&request)
            .await
            .stage(WorkflowStage::Translating)?;

        let translated = response.text.trim().to_string();
        if translated.is_empty() {
            return Err(WorkflowError::at(
                WorkflowStage::Translating,
                anyhow::anyhow!("translation came back empty"),
            ));
        }
        Ok(translated)
    }

    pub async fn synthesize(&self, text: &str, persona_id: &str) -> Result<String, WorkflowError> {
        let request = SpeechRequest {
            text: text.to_string(),
            voice: provider_voice_for(persona_id).as_str().to_string(),
            model: self.settings.speech_model.clone(),
            speed: None,
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

    pub async fn persist(
        &self,
        record: &VideoDubbingRecord,
    ) -> Result<Stored<VideoDubbingRecord>, WorkflowError> {
        self.dubbings
            .create(record)
            .await
            .stage(WorkflowStage::Persisting)
    }

    /// Run the processing chain for an uploaded video.
    pub async fn run(
        &self,
        input: &DubbingInput,
        progress: &ProgressSender,
    ) -> Result<DubbingOutput, WorkflowError> {
        match self.run_stages(input, progress).await {
            Ok(output) => {
                checkpoint(progress, WorkflowStage::Done, 100, "Dubbed video ready");
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
        input: &DubbingInput,
        progress: &ProgressSender,
    ) -> Result<DubbingOutput, WorkflowError> {
        checkpoint(progress, WorkflowStage::Transcribing, 0, "Extracting audio...");
        checkpoint(progress, WorkflowStage::Transcribing, 20, "Transcribing speech...");
        let original_text = self
            .transcribe(&input.video_url, input.original_language)
            .await?;

        checkpoint(progress, WorkflowStage::Translating, 40, "Translating text...");
        let translated_text = self
            .translate(&original_text, input.original_language, input.target_language)
            .await?;

        checkpoint(progress, WorkflowStage::Synthesizing, 60, "Generating new voiceover...");
        let new_audio_url = self.synthesize(&translated_text, &input.persona_id).await?;

        checkpoint(progress, WorkflowStage::Processing, 80, "Processing video...");
        let processed_video_url = self
            .muxer
            .mux(&input.video_url, &new_audio_url)
            .await
            .stage(WorkflowStage::Processing)?;

        checkpoint(progress, WorkflowStage::Persisting, 90, "Finalizing...");
        let record = VideoDubbingRecord {
            user_id: input.user_id.clone(),
            original_video_url: input.video_url.clone(),
            original_language: input.original_language.as_str().to_string(),
            target_language: input.target_language.as_str().to_string(),
            voice: input.persona_id.clone(),
            original_text: original_text.clone(),
            translated_text: translated_text.clone(),
            new_audio_url: new_audio_url.clone(),
            processed_video_url: processed_video_url.clone(),
            created_at: Utc::now(),
        };
        let stored = self.persist(&record).await?;

        Ok(DubbingOutput {
            record_id: stored.id,
            processed_video_url,
            new_audio_url,
            original_text,
            translated_text,
            record: stored.record,
        })
    }

    /// Upload a local file, then run the processing chain on it.
    pub async fn run_from_file(
        &self,
        user_id: &str,
        path: &Path,
        original_language: LanguageCode,
        target_language: LanguageCode,
        persona_id: &str,
        progress: &ProgressSender,
    ) -> Result<(UploadedVideo, DubbingOutput), WorkflowError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());

        // Check the shape from metadata first so oversized files are never read.
        let size = tokio::fs::metadata(path)
            .await
            .map_err(|e| WorkflowError::at(WorkflowStage::Uploading, e.into()))?
            .len();
        validate_video(&file_name, None, size)?;

        checkpoint(progress, WorkflowStage::Uploading, 0, "Uploading video...");
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| WorkflowError::at(WorkflowStage::Uploading, e.into()))?;
        let video = match self.upload(user_id, &file_name, None, bytes).await {
            Ok(video) => video,
            Err(e) => {
                fail(progress, &e);
                return Err(e);
            }
        };

        let input = DubbingInput {
            user_id: user_id.to_string(),
            video_url: video.url.clone(),
            original_language,
            target_language,
            persona_id: persona_id.to_string(),
        };
        let output = self.run(&input, progress).await?;
        Ok((video, output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baas::testing::{FakeAi, FakeStorage, MemoryDatabase};
    use crate::baas::{Database, VIDEO_DUBBINGS};
    use crate::workflow::{progress_channel, PassthroughMuxer};

    struct Fixture {
        ai: Arc<FakeAi>,
        storage: Arc<FakeStorage>,
        db: Arc<MemoryDatabase>,
        workflow: DubbingWorkflow,
    }

    fn fixture_with(ai: FakeAi, storage: FakeStorage, db: MemoryDatabase) -> Fixture {
        let ai = Arc::new(ai);
        let storage = Arc::new(storage);
        let db = Arc::new(db);
        let db_dyn: Arc<dyn Database> = db.clone();
        let workflow = DubbingWorkflow::new(
            ai.clone(),
            storage.clone(),
            Collection::video_dubbings(db_dyn),
            Arc::new(PassthroughMuxer),
            GenerationSettings::default(),
        );
        Fixture {
            ai,
            storage,
            db,
            workflow,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(FakeAi::new(), FakeStorage::default(), MemoryDatabase::default())
    }

    fn input(from: LanguageCode, to: LanguageCode) -> DubbingInput {
        DubbingInput {
            user_id: "u1".into(),
            video_url: "https://cdn.test/videos/u1/1-clip.mp4".into(),
            original_language: from,
            target_language: to,
            persona_id: "female-2".into(),
        }
    }

    #[test]
    fn validation_rules() {
        assert_eq!(
            validate_video("clip.mp4", Some("video/mp4"), 10),
            Ok("video/mp4".to_string())
        );
        assert_eq!(
            validate_video("notes.txt", Some("text/plain"), 10),
            Err(UploadRejection::NotVideo)
        );
        assert_eq!(
            validate_video("clip.mp4", None, MAX_VIDEO_BYTES + 1),
            Err(UploadRejection::TooLarge {
                size: MAX_VIDEO_BYTES + 1
            })
        );
        assert!(validate_video("clip.mp4", None, MAX_VIDEO_BYTES).is_ok());
        assert_eq!(validate_video("clip.mp4", None, 0), Err(UploadRejection::Empty));
    }

    #[test]
    fn content_type_is_guessed_from_name() {
        assert_eq!(validate_video("clip.mp4", None, 1), Ok("video/mp4".to_string()));
        assert_eq!(validate_video("clip.mp4", Some("  "), 1), Ok("video/mp4".to_string()));
        assert_eq!(
            validate_video("mystery", None, 1),
            Err(UploadRejection::NotVideo)
        );
    }

    #[test]
    fn upload_path_uses_base_name() {
        assert_eq!(upload_path("u1", "clip.mp4", 1700), "videos/u1/1700-clip.mp4");
        assert_eq!(
            upload_path("u1", "C:\\Users\\me\\clip.mp4", 5),
            "videos/u1/5-clip.mp4"
        );
        assert_eq!(upload_path("u1", "dir/", 5), "videos/u1/5-video");
    }

    #[test]
    fn size_label_in_megabytes() {
        let video = UploadedVideo {
            name: "a.mp4".into(),
            size_bytes: 5 * 1024 * 1024 + 512 * 1024,
            content_type: "video/mp4".into(),
            url: "u".into(),
        };
        assert_eq!(video.size_label(), "5.5 MB");
    }

    #[tokio::test]
    async fn rejected_upload_makes_no_network_call() {
        let f = fixture();
        let err = f
            .workflow
            .upload("u1", "notes.txt", Some("text/plain"), vec![1, 2, 3])
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Rejected(UploadRejection::NotVideo)));
        assert!(f.storage.uploads.lock().is_empty());
    }

    #[tokio::test]
    async fn upload_stores_with_upsert() {
        let f = fixture();
        let video = f
            .workflow
            .upload("u1", "clip.mp4", Some("video/mp4"), vec![0; 2048])
            .await
            .unwrap();
        let uploads = f.storage.uploads.lock();
        assert_eq!(uploads.len(), 1);
        let (path, ct, len, upsert) = &uploads[0];
        assert!(path.starts_with("videos/u1/"));
        assert!(path.ends_with("-clip.mp4"));
        assert_eq!(ct, "video/mp4");
        assert_eq!(*len, 2048);
        assert!(*upsert);
        assert_eq!(video.url, format!("https://cdn.test/{path}"));
        assert_eq!(video.name, "clip.mp4");
    }

    #[tokio::test]
    async fn storage_failure_is_upload_stage() {
        let f = fixture_with(
            FakeAi::new(),
            FakeStorage {
                fail: true,
                ..FakeStorage::default()
            },
            MemoryDatabase::default(),
        );
        let err = f
            .workflow
            .upload("u1", "clip.mp4", None, vec![1])
            .await
            .unwrap_err();
        assert_eq!(err.stage(), WorkflowStage::Uploading);
    }

    #[tokio::test]
    async fn full_chain_in_order() {
        let f = fixture();
        let (tx, rx) = progress_channel();

        let out = f
            .workflow
            .run(&input(LanguageCode::En, LanguageCode::Hi), &tx)
            .await
            .unwrap();

        assert_eq!(f.ai.calls(), vec!["transcribe", "text", "speech"]);

        let tr = &f.ai.transcription_requests.lock()[0];
        assert_eq!(tr.audio, "https://cdn.test/videos/u1/1-clip.mp4");
        assert_eq!(tr.language, "en");

        let text_req = &f.ai.text_requests.lock()[0];
        assert_eq!(
            text_req.prompt,
            "Translate the following text from English to Hindi. Maintain the same tone and meaning:\n\nHello world"
        );
        assert_eq!(text_req.max_tokens, Some(2000));

        let speech = &f.ai.speech_requests.lock()[0];
        assert_eq!(speech.voice, "shimmer");
        assert_eq!(speech.text, "नमस्ते");

        assert_eq!(out.original_text, "Hello world");
        assert_eq!(out.translated_text, "नमस्ते");
        assert_eq!(out.processed_video_url, "https://cdn.test/videos/u1/1-clip.mp4");
        assert_eq!(out.new_audio_url, "https://cdn.test/audio/shimmer.mp3");
        assert_eq!(out.record.target_language, "hi");
        assert_eq!(f.db.count(VIDEO_DUBBINGS), 1);
        assert_eq!(rx.borrow().stage, WorkflowStage::Done);
    }

    #[tokio::test]
    async fn same_language_skips_translation() {
        let f = fixture();
        let (tx, _rx) = progress_channel();
        let out = f
            .workflow
            .run(&input(LanguageCode::Hi, LanguageCode::Hi), &tx)
            .await
            .unwrap();
        assert_eq!(f.ai.calls(), vec!["transcribe", "speech"]);
        assert_eq!(out.translated_text, "Hello world");
    }

    #[tokio::test]
    async fn transcription_failure_persists_nothing() {
        let f = fixture_with(
            FakeAi {
                fail_transcribe: true,
                ..FakeAi::new()
            },
            FakeStorage::default(),
            MemoryDatabase::default(),
        );
        let (tx, rx) = progress_channel();
        let err = f
            .workflow
            .run(&input(LanguageCode::En, LanguageCode::Ta), &tx)
            .await
            .unwrap_err();
        assert_eq!(err.stage(), WorkflowStage::Transcribing);
        assert_eq!(f.db.count(VIDEO_DUBBINGS), 0);
        assert_eq!(rx.borrow().percent, 20);
        assert_eq!(rx.borrow().stage, WorkflowStage::Failed);
    }

    #[tokio::test]
    async fn persist_failure_stops_short_of_complete() {
        let f = fixture_with(FakeAi::new(), FakeStorage::default(), MemoryDatabase::failing());
        let (tx, rx) = progress_channel();
        let err = f
            .workflow
            .run(&input(LanguageCode::En, LanguageCode::Ta), &tx)
            .await
            .unwrap_err();
        assert_eq!(err.stage(), WorkflowStage::Persisting);
        assert_eq!(rx.borrow().stage, WorkflowStage::Failed);
        assert_eq!(rx.borrow().percent, 90);
    }

    #[tokio::test]
    async fn empty_transcript_is_rejected() {
        let f = fixture_with(
            FakeAi {
                transcript: "   ".into(),
                ..FakeAi::new()
            },
            FakeStorage::default(),
            MemoryDatabase::default(),
        );
        let (tx, _rx) = progress_channel();
        let err = f
            .workflow
            .run(&input(LanguageCode::En, LanguageCode::Ta), &tx)
            .await
            .unwrap_err();
        assert_eq!(err.stage(), WorkflowStage::Transcribing);
        assert_eq!(f.ai.calls(), vec!["transcribe"]);
    }

    #[tokio::test]
    async fn progress_labels_follow_checkpoints() {
        let f = fixture();
        let (tx, mut rx) = progress_channel();
        let seen = tokio::spawn(async move {
            let mut labels = Vec::new();
            while rx.changed().await.is_ok() {
                let p = rx.borrow_and_update().clone();
                labels.push((p.percent, p.label));
                if p.stage.is_terminal() {
                    break;
                }
            }
            labels
        });

        f.workflow
            .run(&input(LanguageCode::En, LanguageCode::Hi), &tx)
            .await
            .unwrap();
        drop(tx);
        let labels = seen.await.unwrap();

        let percents: Vec<u8> = labels.iter().map(|(p, _)| *p).collect();
        assert!(percents.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(labels.last().map(|(p, _)| *p), Some(100));
    }

    #[tokio::test]
    async fn run_from_file_uploads_then_processes() {
        let f = fixture();
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("demo.mp4");
        std::fs::write(&path, vec![7u8; 1024]).unwrap();
        let (tx, _rx) = progress_channel();

        let (video, out) = f
            .workflow
            .run_from_file("u1", &path, LanguageCode::En, LanguageCode::Bn, "male-1", &tx)
            .await
            .unwrap();

        assert_eq!(video.content_type, "video/mp4");
        assert_eq!(out.processed_video_url, video.url);
        assert_eq!(f.storage.uploads.lock().len(), 1);
        assert_eq!(f.db.count(VIDEO_DUBBINGS), 1);
    }

    #[tokio::test]
    async fn run_from_file_rejects_non_video() {
        let f = fixture();
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();
        let (tx, _rx) = progress_channel();

        let err = f
            .workflow
            .run_from_file("u1", &path, LanguageCode::En, LanguageCode::Bn, "male-1", &tx)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Rejected(UploadRejection::NotVideo)));
        assert!(f.storage.uploads.lock().is_empty());
    }
}
