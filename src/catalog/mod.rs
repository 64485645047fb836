//! Closed catalogs: languages, voice personas and the UI manifest built from them.

pub mod language;
pub mod persona;

pub use language::{language_name, LanguageCode, DUBBING_LANGUAGES, VOICE_LANGUAGES};
pub use persona::{
    find_persona, persona_name, personas_for, provider_voice, provider_voice_for, Gender,
    ProviderVoice, Tone, VoicePersona, DEFAULT_PROVIDER_VOICE, DUBBING_PERSONA_IDS, PERSONAS,
    VOICE_PERSONA_IDS,
};

use serde::Serialize;

// ── UI manifest ──────────────────────────────────────────────────

/// A single language option for a wizard's language selector.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageOption {
    /// ISO 639-1 code (e.g. "hi").
    pub code: String,
    /// English name (e.g. "Hindi").
    pub label: String,
}

/// A single persona option for a wizard's voice selector.
#[derive(Debug, Clone, Serialize)]
pub struct PersonaOption {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub tone: Tone,
}

/// Options one wizard offers.
#[derive(Debug, Clone, Serialize)]
pub struct WizardCatalog {
    pub languages: Vec<LanguageOption>,
    pub personas: Vec<PersonaOption>,
}

/// Returned by `GET /api/catalog` so a frontend can render both wizards.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogManifest {
    pub voice: WizardCatalog,
    pub dubbing: WizardCatalog,
    /// Speed slider bounds for the voice wizard.
    pub speed: SpeedRange,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SpeedRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default: f32,
}

impl CatalogManifest {
    pub fn build() -> Self {
        Self {
            voice: WizardCatalog::build(VOICE_LANGUAGES, VOICE_PERSONA_IDS),
            dubbing: WizardCatalog::build(DUBBING_LANGUAGES, DUBBING_PERSONA_IDS),
            speed: SpeedRange {
                min: crate::wizard::voice::MIN_SPEED,
                max: crate::wizard::voice::MAX_SPEED,
                step: crate::wizard::voice::SPEED_STEP,
                default: crate::wizard::voice::DEFAULT_SPEED,
            },
        }
    }
}

impl WizardCatalog {
    fn build(languages: &[LanguageCode], persona_ids: &[&str]) -> Self {
        Self {
            languages: languages
                .iter()
                .map(|l| LanguageOption {
                    code: l.as_str().to_string(),
                    label: l.display_name().to_string(),
                })
                .collect(),
            personas: personas_for(persona_ids)
                .into_iter()
                .map(|p| PersonaOption {
                    id: p.id.to_string(),
                    name: p.name.to_string(),
                    gender: p.gender,
                    tone: p.tone,
                })
                .collect(),
        }
    }
}
