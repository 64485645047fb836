//! Video dubbing wizard: Upload → Original language → Target language → Voice → Process.

use super::{Notice, StepController, StepInfo, WizardForm};
use crate::catalog::{LanguageCode, DUBBING_PERSONA_IDS};
use crate::workflow::{
    progress_channel, DubbingInput, DubbingOutput, Progress, ProgressSender, UploadedVideo,
    WorkflowError,
};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DubbingStep {
    Upload,
    OriginalLanguage,
    TargetLanguage,
    Voice,
    Process,
}

pub const DUBBING_STEPS: [StepInfo; 5] = [
    StepInfo {
        number: 1,
        title: "Upload Video",
        description: "Select your video file",
    },
    StepInfo {
        number: 2,
        title: "Original Language",
        description: "Current audio language",
    },
    StepInfo {
        number: 3,
        title: "Target Language",
        description: "Desired language",
    },
    StepInfo {
        number: 4,
        title: "Voice Selection",
        description: "Choose voice style",
    },
    StepInfo {
        number: 5,
        title: "Process",
        description: "Generate dubbed video",
    },
];

impl DubbingStep {
    pub fn from_number(n: usize) -> Option<Self> {
        match n {
            1 => Some(Self::Upload),
            2 => Some(Self::OriginalLanguage),
            3 => Some(Self::TargetLanguage),
            4 => Some(Self::Voice),
            5 => Some(Self::Process),
            _ => None,
        }
    }
}

/// A user action on the dubbing wizard (JSON body of `POST /api/wizards/dubbing`).
///
/// Uploads are not commands: they arrive as multipart bodies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DubbingCommand {
    SetOriginalLanguage { language: String },
    SetTargetLanguage { language: String },
    SetVoice { voice: String },
    /// "Choose a different video".
    ClearUpload,
    Next,
    Back,
    Process,
    StartOver,
}

impl DubbingCommand {
    pub fn from_form(form: &WizardForm) -> Vec<Self> {
        let mut commands = Vec::new();
        if let Some(language) = &form.original_language {
            commands.push(Self::SetOriginalLanguage {
                language: language.clone(),
            });
        }
        if let Some(language) = &form.target_language {
            commands.push(Self::SetTargetLanguage {
                language: language.clone(),
            });
        }
        if let Some(voice) = &form.voice {
            commands.push(Self::SetVoice {
                voice: voice.clone(),
            });
        }
        match form.action.as_str() {
            "clear_upload" => commands.push(Self::ClearUpload),
            "next" => commands.push(Self::Next),
            "back" => commands.push(Self::Back),
            "process" => commands.push(Self::Process),
            "start_over" => commands.push(Self::StartOver),
            _ => {}
        }
        commands
    }
}

pub struct DubbingWizard {
    steps: StepController,
    upload: Option<UploadedVideo>,
    uploading: bool,
    original_language: Option<LanguageCode>,
    target_language: Option<LanguageCode>,
    voice: Option<String>,
    processing: bool,
    progress: Option<watch::Receiver<Progress>>,
    result: Option<DubbingOutput>,
    notice: Option<Notice>,
}

impl Default for DubbingWizard {
    fn default() -> Self {
        Self::new()
    }
}

fn dubbing_language(code: &str) -> Option<LanguageCode> {
    LanguageCode::from_str_code(code).filter(|l| l.is_dubbing_language())
}

impl DubbingWizard {
    pub fn new() -> Self {
        Self {
            steps: StepController::new(DUBBING_STEPS.len()),
            upload: None,
            uploading: false,
            original_language: None,
            target_language: None,
            voice: None,
            processing: false,
            progress: None,
            result: None,
            notice: None,
        }
    }

    fn busy(&self) -> bool {
        self.processing || self.uploading
    }

    pub fn current_step(&self) -> DubbingStep {
        DubbingStep::from_number(self.steps.current()).unwrap_or(DubbingStep::Upload)
    }

    pub fn step_number(&self) -> usize {
        self.steps.current()
    }

    pub fn can_advance(&self) -> bool {
        match self.current_step() {
            DubbingStep::Upload => self.upload.is_some(),
            DubbingStep::OriginalLanguage => self.original_language.is_some(),
            DubbingStep::TargetLanguage => {
                self.target_language.is_some() && self.target_language != self.original_language
            }
            DubbingStep::Voice => self.voice.is_some(),
            DubbingStep::Process => false,
        }
    }

    pub fn advance(&mut self) -> bool {
        !self.busy() && self.steps.advance(self.can_advance())
    }

    pub fn retreat(&mut self) -> bool {
        !self.busy() && self.steps.retreat()
    }

    pub fn set_original_language(&mut self, code: &str) -> bool {
        if self.busy() {
            return false;
        }
        match dubbing_language(code) {
            Some(language) => {
                self.original_language = Some(language);
                true
            }
            None => false,
        }
    }

    /// The target must differ from the original language.
    pub fn set_target_language(&mut self, code: &str) -> bool {
        if self.busy() {
            return false;
        }
        match dubbing_language(code) {
            Some(language) if Some(language) != self.original_language => {
                self.target_language = Some(language);
                true
            }
            _ => false,
        }
    }

    pub fn set_voice(&mut self, persona_id: &str) -> bool {
        if self.busy() || !DUBBING_PERSONA_IDS.contains(&persona_id) {
            return false;
        }
        self.voice = Some(persona_id.to_string());
        true
    }

    /// Mark an upload as in flight. Returns `false` if the wizard is busy.
    pub fn begin_upload(&mut self) -> bool {
        if self.busy() {
            return false;
        }
        self.uploading = true;
        self.notice = None;
        true
    }

    /// Record the outcome of an upload started with [`begin_upload`](Self::begin_upload).
    pub fn finish_upload(&mut self, outcome: Result<UploadedVideo, WorkflowError>) {
        self.uploading = false;
        match outcome {
            Ok(video) => {
                self.upload = Some(video);
                self.result = None;
            }
            Err(WorkflowError::Rejected(rejection)) => {
                self.notice = Some(Notice::error(rejection.to_string()));
            }
            Err(_) => {
                self.notice = Some(Notice::error("Failed to upload video. Please try again."));
            }
        }
    }

    /// Drop the uploaded video so another can be chosen.
    pub fn clear_upload(&mut self) {
        if !self.busy() {
            self.upload = None;
            self.result = None;
        }
    }

    pub fn start_over(&mut self) {
        if !self.busy() {
            *self = Self::new();
        }
    }

    pub fn upload(&self) -> Option<&UploadedVideo> {
        self.upload.as_ref()
    }

    pub fn original_language(&self) -> Option<LanguageCode> {
        self.original_language
    }

    pub fn target_language(&self) -> Option<LanguageCode> {
        self.target_language
    }

    pub fn voice(&self) -> Option<&str> {
        self.voice.as_deref()
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn result(&self) -> Option<&DubbingOutput> {
        self.result.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn progress(&self) -> Option<Progress> {
        self.progress.as_ref().map(|rx| rx.borrow().clone())
    }

    pub fn ready_input(&self, user_id: &str) -> Option<DubbingInput> {
        Some(DubbingInput {
            user_id: user_id.to_string(),
            video_url: self.upload.as_ref()?.url.clone(),
            original_language: self.original_language?,
            target_language: self.target_language?,
            persona_id: self.voice.clone()?,
        })
    }

    pub fn begin_processing(&mut self, user_id: &str) -> Option<(DubbingInput, ProgressSender)> {
        if self.busy() || self.current_step() != DubbingStep::Process {
            return None;
        }
        let input = self.ready_input(user_id)?;
        let (tx, rx) = progress_channel();
        self.processing = true;
        self.progress = Some(rx);
        self.result = None;
        self.notice = None;
        Some((input, tx))
    }

    pub fn finish_processing(&mut self, outcome: Result<DubbingOutput, WorkflowError>) {
        self.processing = false;
        match outcome {
            Ok(output) => {
                self.result = Some(output);
                self.notice = None;
            }
            Err(_) => {
                self.result = None;
                self.notice = Some(Notice::error("Failed to process video. Please try again."));
            }
        }
    }

    pub fn apply(
        &mut self,
        command: DubbingCommand,
        user_id: &str,
    ) -> Option<(DubbingInput, ProgressSender)> {
        match command {
            DubbingCommand::SetOriginalLanguage { language } => {
                self.set_original_language(&language);
            }
            DubbingCommand::SetTargetLanguage { language } => {
                self.set_target_language(&language);
            }
            DubbingCommand::SetVoice { voice } => {
                self.set_voice(&voice);
            }
            DubbingCommand::ClearUpload => self.clear_upload(),
            DubbingCommand::Next => {
                self.advance();
            }
            DubbingCommand::Back => {
                self.retreat();
            }
            DubbingCommand::Process => return self.begin_processing(user_id),
            DubbingCommand::StartOver => self.start_over(),
        }
        None
    }

    pub fn view(&self) -> DubbingWizardView {
        DubbingWizardView {
            step: self.steps.current(),
            step_count: self.steps.count(),
            steps: DUBBING_STEPS.to_vec(),
            can_advance: self.can_advance(),
            upload: self.upload.clone(),
            upload_size: self.upload.as_ref().map(UploadedVideo::size_label),
            uploading: self.uploading,
            original_language: self.original_language,
            target_language: self.target_language,
            voice: self.voice.clone(),
            processing: self.processing,
            progress: self.progress(),
            result: self.result.clone(),
            notice: self.notice.clone(),
        }
    }
}

/// Serializable snapshot of a [`DubbingWizard`].
#[derive(Debug, Clone, Serialize)]
pub struct DubbingWizardView {
    pub step: usize,
    pub step_count: usize,
    pub steps: Vec<StepInfo>,
    pub can_advance: bool,
    pub upload: Option<UploadedVideo>,
    pub upload_size: Option<String>,
    pub uploading: bool,
    pub original_language: Option<LanguageCode>,
    pub target_language: Option<LanguageCode>,
    pub voice: Option<String>,
    pub processing: bool,
    pub progress: Option<Progress>,
    pub result: Option<DubbingOutput>,
    pub notice: Option<Notice>,
}
