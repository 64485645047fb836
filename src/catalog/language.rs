//! Language codes offered by the voice generator and the dubbing studio.

use serde::{Deserialize, Serialize};

/// ISO 639-1 language codes supported by PariVaani.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    // Indian languages
    Hi, // Hindi
    Ta, // Tamil
    Te, // Telugu
    Gu, // Gujarati
    Mr, // Marathi
    Bn, // Bengali
    Kn, // Kannada
    Ml, // Malayalam
    Pa, // Punjabi
    Or, // Odia
    As, // Assamese
    Ur, // Urdu

    // Dubbing-only source/target languages
    En, // English
    Es, // Spanish
    Fr, // French
    De, // German
    Zh, // Chinese
    Ja, // Japanese
}

/// Languages a voiceover can be generated in, in display order.
pub const VOICE_LANGUAGES: &[LanguageCode] = &[
    LanguageCode::Hi,
    LanguageCode::Ta,
    LanguageCode::Te,
    LanguageCode::Gu,
    LanguageCode::Mr,
    LanguageCode::Bn,
    LanguageCode::Kn,
    LanguageCode::Ml,
    LanguageCode::Pa,
    LanguageCode::Or,
    LanguageCode::As,
    LanguageCode::Ur,
];

/// Languages a video can be dubbed from or into, in display order.
pub const DUBBING_LANGUAGES: &[LanguageCode] = &[
    LanguageCode::En,
    LanguageCode::Hi,
    LanguageCode::Ta,
    LanguageCode::Te,
    LanguageCode::Gu,
    LanguageCode::Mr,
    LanguageCode::Bn,
    LanguageCode::Kn,
    LanguageCode::Ml,
    LanguageCode::Pa,
    LanguageCode::Ur,
    LanguageCode::Es,
    LanguageCode::Fr,
    LanguageCode::De,
    LanguageCode::Zh,
    LanguageCode::Ja,
];

impl LanguageCode {
    /// Get the ISO 639-1 code string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hi => "hi",
            Self::Ta => "ta",
            Self::Te => "te",
            Self::Gu => "gu",
            Self::Mr => "mr",
            Self::Bn => "bn",
            Self::Kn => "kn",
            Self::Ml => "ml",
            Self::Pa => "pa",
            Self::Or => "or",
            Self::As => "as",
            Self::Ur => "ur",
            Self::En => "en",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::De => "de",
            Self::Zh => "zh",
            Self::Ja => "ja",
        }
    }

    /// Get the English language name used in prompts and labels.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Hi => "Hindi",
            Self::Ta => "Tamil",
            Self::Te => "Telugu",
            Self::Gu => "Gujarati",
            Self::Mr => "Marathi",
            Self::Bn => "Bengali",
            Self::Kn => "Kannada",
            Self::Ml => "Malayalam",
            Self::Pa => "Punjabi",
            Self::Or => "Odia",
            Self::As => "Assamese",
            Self::Ur => "Urdu",
            Self::En => "English",
            Self::Es => "Spanish",
            Self::Fr => "French",
            Self::De => "German",
            Self::Zh => "Chinese",
            Self::Ja => "Japanese",
        }
    }

    /// Parse from string code (case-insensitive, surrounding whitespace ignored).
    pub fn from_str_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "hi" => Some(Self::Hi),
            "ta" => Some(Self::Ta),
            "te" => Some(Self::Te),
            "gu" => Some(Self::Gu),
            "mr" => Some(Self::Mr),
            "bn" => Some(Self::Bn),
            "kn" => Some(Self::Kn),
            "ml" => Some(Self::Ml),
            "pa" => Some(Self::Pa),
            "or" => Some(Self::Or),
            "as" => Some(Self::As),
            "ur" => Some(Self::Ur),
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            "fr" => Some(Self::Fr),
            "de" => Some(Self::De),
            "zh" => Some(Self::Zh),
            "ja" => Some(Self::Ja),
            _ => None,
        }
    }

    /// Whether a voiceover can be generated in this language.
    pub fn is_voice_language(self) -> bool {
        VOICE_LANGUAGES.contains(&self)
    }

    /// Whether the dubbing studio accepts this language.
    pub fn is_dubbing_language(self) -> bool {
        DUBBING_LANGUAGES.contains(&self)
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable name for a stored language code, falling back to the raw code.
pub fn language_name(code: &str) -> String {
    LanguageCode::from_str_code(code)
        .map(|l| l.display_name().to_string())
        .unwrap_or_else(|| code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_code_roundtrip() {
        for lang in VOICE_LANGUAGES.iter().chain(DUBBING_LANGUAGES) {
            let code = lang.as_str();
            assert_eq!(LanguageCode::from_str_code(code), Some(*lang), "{code}");
        }
    }

    #[test]
    fn language_sets_have_expected_sizes() {
        assert_eq!(VOICE_LANGUAGES.len(), 12);
        assert_eq!(DUBBING_LANGUAGES.len(), 16);
    }

    #[test]
    fn odia_and_assamese_are_voice_only() {
        assert!(LanguageCode::Or.is_voice_language());
        assert!(!LanguageCode::Or.is_dubbing_language());
        assert!(LanguageCode::As.is_voice_language());
        assert!(!LanguageCode::As.is_dubbing_language());
    }

    #[test]
    fn english_is_dubbing_only() {
        assert!(LanguageCode::En.is_dubbing_language());
        assert!(!LanguageCode::En.is_voice_language());
    }

    #[test]
    fn case_insensitive_parse() {
        assert_eq!(LanguageCode::from_str_code("HI"), Some(LanguageCode::Hi));
        assert_eq!(LanguageCode::from_str_code(" Ta "), Some(LanguageCode::Ta));
        assert_eq!(LanguageCode::from_str_code("xx"), None);
        assert_eq!(LanguageCode::from_str_code(""), None);
    }

    #[test]
    fn serde_uses_lowercase_codes() {
        let json = serde_json::to_string(&LanguageCode::Ml).unwrap();
        assert_eq!(json, "\"ml\"");
        let parsed: LanguageCode = serde_json::from_str("\"or\"").unwrap();
        assert_eq!(parsed, LanguageCode::Or);
    }

    #[test]
    fn language_name_falls_back_to_code() {
        assert_eq!(language_name("bn"), "Bengali");
        assert_eq!(language_name("xx"), "xx");
    }
}
