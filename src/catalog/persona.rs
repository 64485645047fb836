//! Voice personas and the persona → provider voice lookup.
//!
//! A persona is what the user picks in the UI ("Arjun, professional male").
//! The speech provider only knows its own voice names, so every persona is
//! resolved through [`provider_voice`], a pure function of gender and tone.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    Professional,
    Warm,
    Energetic,
    Calm,
    Friendly,
    Authoritative,
}

/// A named voice choice exposed to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoicePersona {
    pub id: &'static str,
    pub name: &'static str,
    pub gender: Gender,
    pub tone: Tone,
}

/// Every persona PariVaani knows about.
pub const PERSONAS: &[VoicePersona] = &[
    VoicePersona {
        id: "male-1",
        name: "Arjun",
        gender: Gender::Male,
        tone: Tone::Professional,
    },
    VoicePersona {
        id: "female-1",
        name: "Priya",
        gender: Gender::Female,
        tone: Tone::Warm,
    },
    VoicePersona {
        id: "male-2",
        name: "Vikram",
        gender: Gender::Male,
        tone: Tone::Energetic,
    },
    VoicePersona {
        id: "female-2",
        name: "Anita",
        gender: Gender::Female,
        tone: Tone::Calm,
    },
    VoicePersona {
        id: "male-3",
        name: "Rohit",
        gender: Gender::Male,
        tone: Tone::Friendly,
    },
    VoicePersona {
        id: "female-3",
        name: "Kavya",
        gender: Gender::Female,
        tone: Tone::Authoritative,
    },
    VoicePersona {
        id: "neutral-1",
        name: "Alex",
        gender: Gender::Neutral,
        tone: Tone::Friendly,
    },
];

/// Personas offered by the voice generator.
pub const VOICE_PERSONA_IDS: &[&str] = &[
    "male-1", "female-1", "male-2", "female-2", "male-3", "female-3",
];

/// Personas offered by the dubbing studio.
pub const DUBBING_PERSONA_IDS: &[&str] = &["male-1", "female-1", "male-2", "female-2", "neutral-1"];

/// Look up a persona by id.
pub fn find_persona(id: &str) -> Option<&'static VoicePersona> {
    PERSONAS.iter().find(|p| p.id == id)
}

/// Resolve a list of persona ids into personas, skipping unknown ids.
pub fn personas_for(ids: &[&str]) -> Vec<&'static VoicePersona> {
    ids.iter().filter_map(|id| find_persona(id)).collect()
}

/// Display name for a stored persona id, falling back to the raw id.
pub fn persona_name(id: &str) -> String {
    find_persona(id)
        .map(|p| p.name.to_string())
        .unwrap_or_else(|| id.to_string())
}

// ── Provider voices ──────────────────────────────────────────────

/// Voice identifiers understood by the speech provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderVoice {
    Alloy,
    Echo,
    Fable,
    Onyx,
    Nova,
    Shimmer,
}

/// Provider voice used when a persona id is not in the catalog.
pub const DEFAULT_PROVIDER_VOICE: ProviderVoice = ProviderVoice::Nova;

impl ProviderVoice {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alloy => "alloy",
            Self::Echo => "echo",
            Self::Fable => "fable",
            Self::Onyx => "onyx",
            Self::Nova => "nova",
            Self::Shimmer => "shimmer",
        }
    }
}

impl std::fmt::Display for ProviderVoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a (gender, tone) pair to a provider voice.
///
/// Male personas get the male provider voices; every other gender shares the
/// female set. Tones without a dedicated voice fall through to `fable` (male)
/// or `alloy` (everyone else).
pub fn provider_voice(gender: Gender, tone: Tone) -> ProviderVoice {
    match (gender, tone) {
        (Gender::Male, Tone::Professional) => ProviderVoice::Onyx,
        (Gender::Male, Tone::Energetic) => ProviderVoice::Echo,
        (Gender::Male, _) => ProviderVoice::Fable,
        (_, Tone::Warm) => ProviderVoice::Nova,
        (_, Tone::Calm) => ProviderVoice::Shimmer,
        (_, _) => ProviderVoice::Alloy,
    }
}

/// Resolve a persona id to its provider voice, or [`DEFAULT_PROVIDER_VOICE`].
pub fn provider_voice_for(persona_id: &str) -> ProviderVoice {
    find_persona(persona_id)
        .map(|p| provider_voice(p.gender, p.tone))
        .unwrap_or(DEFAULT_PROVIDER_VOICE)
}
