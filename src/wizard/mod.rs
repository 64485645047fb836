//! Multi-step wizards for the voice generator and the dubbing studio.
//!
//! ## Design
//! - A [`StepController`] owns the step index and keeps it in `[1, N]`
//! - Each wizard decides `can_advance()` from the fields of its current step only
//! - Blocked navigation is a silent no-op, never an error
//! - Wizards are transient: they live in a [`store::WizardStore`] (gateway)
//!   or on the stack (CLI) and are never persisted

pub mod dubbing;
pub mod store;
pub mod voice;

pub use dubbing::{DubbingCommand, DubbingStep, DubbingWizard};
pub use store::{UploadSlot, WizardStore};
pub use voice::{VoiceCommand, VoiceStep, VoiceWizard};

use serde::Serialize;

// ── Step controller ──────────────────────────────────────────────

/// Step index clamped to `[1, count]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepController {
    current: usize,
    count: usize,
}

impl StepController {
    pub fn new(count: usize) -> Self {
        Self {
            current: 1,
            count: count.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_last(&self) -> bool {
        self.current == self.count
    }

    /// Move forward when `allowed` and not already on the last step.
    pub fn advance(&mut self, allowed: bool) -> bool {
        if allowed && self.current < self.count {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Move back unless already on the first step.
    pub fn retreat(&mut self) -> bool {
        if self.current > 1 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }
}

/// Title and subtitle of one step, for step indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepInfo {
    pub number: usize,
    pub title: &'static str,
    pub description: &'static str,
}

// ── Notices ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Error,
}

/// A one-off message shown above the wizard (the web app's `alert`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

// ── Form bindings ────────────────────────────────────────────────

/// Flat form body posted by the wizard pages. Every field is a string so
/// urlencoded bodies deserialize without type coercion.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct WizardForm {
    pub action: String,
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub target_language: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub speed: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retreat_below_one_is_noop() {
        let mut steps = StepController::new(5);
        assert!(!steps.retreat());
        assert_eq!(steps.current(), 1);
    }

    #[test]
    fn advance_past_last_is_noop() {
        let mut steps = StepController::new(3);
        assert!(steps.advance(true));
        assert!(steps.advance(true));
        assert!(steps.is_last());
        assert!(!steps.advance(true));
        assert_eq!(steps.current(), 3);
    }

    #[test]
    fn blocked_advance_is_noop() {
        let mut steps = StepController::new(5);
        assert!(!steps.advance(false));
        assert_eq!(steps.current(), 1);
    }

    #[test]
    fn zero_steps_is_clamped() {
        let steps = StepController::new(0);
        assert_eq!(steps.count(), 1);
        assert!(steps.is_last());
    }

    #[test]
    fn reset_returns_to_first_step() {
        let mut steps = StepController::new(5);
        steps.advance(true);
        steps.advance(true);
        steps.reset();
        assert_eq!(steps.current(), 1);
    }
}
