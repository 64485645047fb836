//! Voice generator wizard: Script → Language → Voice → Settings → Generate.

use super::{Notice, StepController, StepInfo, WizardForm};
use crate::catalog::{LanguageCode, VOICE_PERSONA_IDS};
use crate::workflow::{
    estimated_duration_secs, progress_channel, Progress, ProgressSender, VoiceInput, VoiceOutput,
    WorkflowError,
};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

pub const MIN_SPEED: f32 = 0.5;
pub const MAX_SPEED: f32 = 2.0;
pub const SPEED_STEP: f32 = 0.1;
pub const DEFAULT_SPEED: f32 = 1.0;

/// Snap a requested speed onto the slider: `[0.5, 2.0]` in `0.1` steps.
pub fn clamp_speed(speed: f32) -> f32 {
    if !speed.is_finite() {
        return DEFAULT_SPEED;
    }
    let snapped = (speed.clamp(MIN_SPEED, MAX_SPEED) * 10.0).round() / 10.0;
    snapped.clamp(MIN_SPEED, MAX_SPEED)
}

// ── Steps ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceStep {
    Script,
    Language,
    Voice,
    Settings,
    Generate,
}

pub const VOICE_STEPS: [StepInfo; 5] = [
    StepInfo {
        number: 1,
        title: "Script",
        description: "Enter your text",
    },
    StepInfo {
        number: 2,
        title: "Language",
        description: "Choose language",
    },
    StepInfo {
        number: 3,
        title: "Voice",
        description: "Select voice",
    },
    StepInfo {
        number: 4,
        title: "Settings",
        description: "Adjust parameters",
    },
    StepInfo {
        number: 5,
        title: "Generate",
        description: "Create voiceover",
    },
];

impl VoiceStep {
    pub fn from_number(n: usize) -> Option<Self> {
        match n {
            1 => Some(Self::Script),
            2 => Some(Self::Language),
            3 => Some(Self::Voice),
            4 => Some(Self::Settings),
            5 => Some(Self::Generate),
            _ => None,
        }
    }
}

// ── Commands ─────────────────────────────────────────────────────

/// A user action on the voice wizard (JSON body of `POST /api/wizards/voice`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum VoiceCommand {
    SetScript { script: String },
    SetLanguage { language: String },
    SetVoice { voice: String },
    SetSpeed { speed: f32 },
    Next,
    Back,
    Generate,
    StartOver,
}

impl VoiceCommand {
    /// Expand a posted form into field updates followed by its action.
    pub fn from_form(form: &WizardForm) -> Vec<Self> {
        let mut commands = Vec::new();
        if let Some(script) = &form.script {
            commands.push(Self::SetScript {
                script: script.clone(),
            });
        }
        if let Some(language) = &form.language {
            commands.push(Self::SetLanguage {
                language: language.clone(),
            });
        }
        if let Some(voice) = &form.voice {
            commands.push(Self::SetVoice {
                voice: voice.clone(),
            });
        }
        if let Some(speed) = form.speed.as_deref().and_then(|s| s.trim().parse().ok()) {
            commands.push(Self::SetSpeed { speed });
        }
        match form.action.as_str() {
            "next" => commands.push(Self::Next),
            "back" => commands.push(Self::Back),
            "generate" => commands.push(Self::Generate),
            "start_over" => commands.push(Self::StartOver),
            _ => {}
        }
        commands
    }
}

// ── Wizard ───────────────────────────────────────────────────────

pub struct VoiceWizard {
    steps: StepController,
    script: String,
    language: Option<LanguageCode>,
    voice: Option<String>,
    speed: f32,
    generating: bool,
    progress: Option<watch::Receiver<Progress>>,
    result: Option<VoiceOutput>,
    notice: Option<Notice>,
}

impl Default for VoiceWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceWizard {
    pub fn new() -> Self {
        Self {
            steps: StepController::new(VOICE_STEPS.len()),
            script: String::new(),
            language: None,
            voice: None,
            speed: DEFAULT_SPEED,
            generating: false,
            progress: None,
            result: None,
            notice: None,
        }
    }

    pub fn current_step(&self) -> VoiceStep {
        VoiceStep::from_number(self.steps.current()).unwrap_or(VoiceStep::Script)
    }

    pub fn step_number(&self) -> usize {
        self.steps.current()
    }

    /// Whether the fields owned by the current step are complete.
    pub fn can_advance(&self) -> bool {
        match self.current_step() {
            VoiceStep::Script => !self.script.trim().is_empty(),
            VoiceStep::Language => self.language.is_some(),
            VoiceStep::Voice => self.voice.is_some(),
            VoiceStep::Settings => true,
            VoiceStep::Generate => false,
        }
    }

    pub fn advance(&mut self) -> bool {
        !self.generating && self.steps.advance(self.can_advance())
    }

    pub fn retreat(&mut self) -> bool {
        !self.generating && self.steps.retreat()
    }

    pub fn set_script(&mut self, script: &str) {
        if !self.generating {
            self.script = script.to_string();
        }
    }

    /// Select a language; codes outside the voice language set are ignored.
    pub fn set_language(&mut self, code: &str) -> bool {
        if self.generating {
            return false;
        }
        match LanguageCode::from_str_code(code).filter(|l| l.is_voice_language()) {
            Some(language) => {
                self.language = Some(language);
                true
            }
            None => false,
        }
    }

    /// Select a persona; ids outside the voice persona set are ignored.
    pub fn set_voice(&mut self, persona_id: &str) -> bool {
        if self.generating || !VOICE_PERSONA_IDS.contains(&persona_id) {
            return false;
        }
        self.voice = Some(persona_id.to_string());
        true
    }

    pub fn set_speed(&mut self, speed: f32) {
        if !self.generating {
            self.speed = clamp_speed(speed);
        }
    }

    /// Clear every field, the result, the notice and the progress.
    pub fn start_over(&mut self) {
        if !self.generating {
            *self = Self::new();
        }
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn language(&self) -> Option<LanguageCode> {
        self.language
    }

    pub fn voice(&self) -> Option<&str> {
        self.voice.as_deref()
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn result(&self) -> Option<&VoiceOutput> {
        self.result.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn progress(&self) -> Option<Progress> {
        self.progress.as_ref().map(|rx| rx.borrow().clone())
    }

    /// Workflow input when every required field is valid.
    pub fn ready_input(&self, user_id: &str) -> Option<VoiceInput> {
        if self.script.trim().is_empty() {
            return None;
        }
        Some(VoiceInput {
            user_id: user_id.to_string(),
            script: self.script.clone(),
            language: self.language?,
            persona_id: self.voice.clone()?,
            speed: self.speed,
        })
    }

    /// Enter the generating state if on the Generate step with complete input.
    ///
    /// Returns the input and the progress sender the workflow must publish to.
    pub fn begin_generation(&mut self, user_id: &str) -> Option<(VoiceInput, ProgressSender)> {
        if self.generating || self.current_step() != VoiceStep::Generate {
            return None;
        }
        let input = self.ready_input(user_id)?;
        let (tx, rx) = progress_channel();
        self.generating = true;
        self.progress = Some(rx);
        self.result = None;
        self.notice = None;
        Some((input, tx))
    }

    /// Leave the generating state with the workflow's result.
    pub fn finish_generation(&mut self, outcome: Result<VoiceOutput, WorkflowError>) {
        self.generating = false;
        match outcome {
            Ok(output) => {
                self.result = Some(output);
                self.notice = None;
            }
            Err(e) => {
                self.result = None;
                self.notice = Some(Notice::error(format!(
                    "Failed to generate voiceover: {}. Please try again.",
                    e.message()
                )));
            }
        }
    }

    /// Apply one command. Returns a generation to start, if the command began one.
    pub fn apply(
        &mut self,
        command: VoiceCommand,
        user_id: &str,
    ) -> Option<(VoiceInput, ProgressSender)> {
        match command {
            VoiceCommand::SetScript { script } => self.set_script(&script),
            VoiceCommand::SetLanguage { language } => {
                self.set_language(&language);
            }
            VoiceCommand::SetVoice { voice } => {
                self.set_voice(&voice);
            }
            VoiceCommand::SetSpeed { speed } => self.set_speed(speed),
            VoiceCommand::Next => {
                self.advance();
            }
            VoiceCommand::Back => {
                self.retreat();
            }
            VoiceCommand::Generate => return self.begin_generation(user_id),
            VoiceCommand::StartOver => self.start_over(),
        }
        None
    }

    pub fn view(&self) -> VoiceWizardView {
        VoiceWizardView {
            step: self.steps.current(),
            step_count: self.steps.count(),
            steps: VOICE_STEPS.to_vec(),
            can_advance: self.can_advance(),
            script: self.script.clone(),
            language: self.language,
            voice: self.voice.clone(),
            speed: self.speed,
            estimated_duration_secs: estimated_duration_secs(&self.script),
            generating: self.generating,
            progress: self.progress(),
            result: self.result.clone(),
            notice: self.notice.clone(),
        }
    }
}

/// Serializable snapshot of a [`VoiceWizard`].
#[derive(Debug, Clone, Serialize)]
pub struct VoiceWizardView {
    pub step: usize,
    pub step_count: usize,
    pub steps: Vec<StepInfo>,
    pub can_advance: bool,
    pub script: String,
    pub language: Option<LanguageCode>,
    pub voice: Option<String>,
    pub speed: f32,
    pub estimated_duration_secs: u64,
    pub generating: bool,
    pub progress: Option<Progress>,
    pub result: Option<VoiceOutput>,
    pub notice: Option<Notice>,
}
