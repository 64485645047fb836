//! Per-user wizard state for the gateway.
//!
//! ## Design
//! - One voice wizard and one dubbing wizard per signed-in user, created lazily
//! - The map lock is a `parking_lot::Mutex` and is never held across an await:
//!   commands run synchronously, workflows are spawned and report back through
//!   `finish_*`
//! - State is in-memory only and is dropped on logout; outcomes that land
//!   after logout are discarded

use super::dubbing::DubbingWizardView;
use super::voice::VoiceWizardView;
use super::{DubbingCommand, DubbingWizard, VoiceCommand, VoiceWizard};
use crate::workflow::{
    DubbingInput, DubbingOutput, DubbingWorkflow, ProgressSender, UploadedVideo, VoiceInput,
    VoiceOutput, VoiceWorkflow, WorkflowError, WorkflowStage,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Default)]
struct UserWizards {
    voice: VoiceWizard,
    dubbing: DubbingWizard,
}

#[derive(Clone, Default)]
pub struct WizardStore {
    users: Arc<Mutex<HashMap<String, UserWizards>>>,
}

impl WizardStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_user<R>(&self, user_id: &str, f: impl FnOnce(&mut UserWizards) -> R) -> R {
        let mut users = self.users.lock();
        let wizards = users.entry(user_id.to_string()).or_default();
        f(wizards)
    }

    /// Like `with_user`, but never recreates state for a signed-out user.
    fn with_existing<R>(
        &self,
        user_id: &str,
        f: impl FnOnce(&mut UserWizards) -> R,
    ) -> Option<R> {
        self.users.lock().get_mut(user_id).map(f)
    }

    /// Number of users with wizard state.
    pub fn len(&self) -> usize {
        self.users.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.lock().is_empty()
    }

    /// Drop a user's wizards (on logout).
    pub fn remove(&self, user_id: &str) {
        self.users.lock().remove(user_id);
    }

    // ── Voice ────────────────────────────────────────────────────

    pub fn voice_view(&self, user_id: &str) -> VoiceWizardView {
        self.with_user(user_id, |w| w.voice.view())
    }

    /// Apply commands in order. Returns the new view and the generation to
    /// start, if one of the commands began it.
    pub fn voice_commands(
        &self,
        user_id: &str,
        commands: Vec<VoiceCommand>,
    ) -> (VoiceWizardView, Option<(VoiceInput, ProgressSender)>) {
        self.with_user(user_id, |w| {
            let mut started = None;
            for command in commands {
                if let Some(job) = w.voice.apply(command, user_id) {
                    started = Some(job);
                }
            }
            (w.voice.view(), started)
        })
    }

    pub fn finish_voice(&self, user_id: &str, outcome: Result<VoiceOutput, WorkflowError>) {
        if self
            .with_existing(user_id, |w| w.voice.finish_generation(outcome))
            .is_none()
        {
            tracing::debug!(user_id, "Discarding voice outcome for signed-out user");
        }
    }

    /// Run a voice generation in the background and record its outcome.
    pub fn spawn_voice(
        &self,
        workflow: Arc<VoiceWorkflow>,
        input: VoiceInput,
        progress: ProgressSender,
    ) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let outcome = workflow.run(&input, &progress).await;
            store.finish_voice(&input.user_id, outcome);
        })
    }

    // ── Dubbing ──────────────────────────────────────────────────

    pub fn dubbing_view(&self, user_id: &str) -> DubbingWizardView {
        self.with_user(user_id, |w| w.dubbing.view())
    }

    pub fn dubbing_commands(
        &self,
        user_id: &str,
        commands: Vec<DubbingCommand>,
    ) -> (DubbingWizardView, Option<(DubbingInput, ProgressSender)>) {
        self.with_user(user_id, |w| {
            let mut started = None;
            for command in commands {
                if let Some(job) = w.dubbing.apply(command, user_id) {
                    started = Some(job);
                }
            }
            (w.dubbing.view(), started)
        })
    }

    /// Claim the upload slot. `None` while another upload or processing runs.
    pub fn begin_upload(&self, user_id: &str) -> Option<UploadSlot> {
        self.with_user(user_id, |w| w.dubbing.begin_upload())
            .then(|| UploadSlot {
                store: self.clone(),
                user_id: user_id.to_string(),
                finished: false,
            })
    }

    fn finish_upload(
        &self,
        user_id: &str,
        outcome: Result<UploadedVideo, WorkflowError>,
    ) -> DubbingWizardView {
        self.with_existing(user_id, |w| {
            w.dubbing.finish_upload(outcome);
            w.dubbing.view()
        })
        .unwrap_or_else(|| DubbingWizard::new().view())
    }

    pub fn finish_dubbing(&self, user_id: &str, outcome: Result<DubbingOutput, WorkflowError>) {
        if self
            .with_existing(user_id, |w| w.dubbing.finish_processing(outcome))
            .is_none()
        {
            tracing::debug!(user_id, "Discarding dubbing outcome for signed-out user");
        }
    }

    pub fn spawn_dubbing(
        &self,
        workflow: Arc<DubbingWorkflow>,
        input: DubbingInput,
        progress: ProgressSender,
    ) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let outcome = workflow.run(&input, &progress).await;
            store.finish_dubbing(&input.user_id, outcome);
        })
    }
}

/// A claimed dubbing upload slot.
///
/// Dropping the slot without [`finish`](Self::finish) records the upload as
/// failed, so a dropped request never leaves the wizard busy.
pub struct UploadSlot {
    store: WizardStore,
    user_id: String,
    finished: bool,
}

impl UploadSlot {
    pub fn finish(mut self, outcome: Result<UploadedVideo, WorkflowError>) -> DubbingWizardView {
        self.finished = true;
        self.store.finish_upload(&self.user_id, outcome)
    }
}

impl Drop for UploadSlot {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        tracing::warn!(user_id = %self.user_id, "Video upload interrupted");
        self.store.finish_upload(
            &self.user_id,
            Err(WorkflowError::at(
                WorkflowStage::Uploading,
                anyhow::anyhow!("upload interrupted"),
            )),
        );
    }
}
