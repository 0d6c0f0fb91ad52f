//! Language-aware provider selection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two interchangeable remote backends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    #[default]
    Gemini,
}

impl ProviderKind {
    /// Parse a configured provider name. Anything other than `openai`
    /// (case-insensitive) selects Gemini.
    pub fn from_setting(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("openai") {
            Self::OpenAi
        } else {
            Self::Gemini
        }
    }

    /// Wire name used in responses and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Route by detected language: English goes to Gemini, everything else to
/// OpenAI. Without a detection result the configured default is used; a
/// failed detection never forces local-only mode.
pub fn route(detected: Option<&str>, default_provider: ProviderKind) -> ProviderKind {
    match detected {
        Some("en") => ProviderKind::Gemini,
        Some(_) => ProviderKind::OpenAi,
        None => default_provider,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_routes_to_gemini() {
        assert_eq!(route(Some("en"), ProviderKind::OpenAi), ProviderKind::Gemini);
        assert_eq!(route(Some("en"), ProviderKind::Gemini), ProviderKind::Gemini);
    }

    #[test]
    fn test_other_languages_route_to_openai() {
        for code in ["es", "fr", "ja", "zh", "de"] {
            assert_eq!(route(Some(code), ProviderKind::Gemini), ProviderKind::OpenAi);
        }
    }

    #[test]
    fn test_no_detection_uses_default() {
        assert_eq!(route(None, ProviderKind::Gemini), ProviderKind::Gemini);
        assert_eq!(route(None, ProviderKind::OpenAi), ProviderKind::OpenAi);
    }

    #[test]
    fn test_from_setting() {
        assert_eq!(ProviderKind::from_setting("openai"), ProviderKind::OpenAi);
        assert_eq!(ProviderKind::from_setting("OpenAI"), ProviderKind::OpenAi);
        assert_eq!(ProviderKind::from_setting("gemini"), ProviderKind::Gemini);
        assert_eq!(ProviderKind::from_setting("anthropic"), ProviderKind::Gemini);
        assert_eq!(ProviderKind::from_setting(""), ProviderKind::Gemini);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&ProviderKind::OpenAi).unwrap(), "\"openai\"");
        assert_eq!(ProviderKind::Gemini.to_string(), "gemini");
    }
}
