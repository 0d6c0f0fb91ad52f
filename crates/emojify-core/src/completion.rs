/// Sampling temperature for translations; repeated inputs should vary.
pub const TRANSLATION_TEMPERATURE: f32 = 0.9;

/// Output budget for translations.
pub const TRANSLATION_MAX_TOKENS: u32 = 75;

/// Output budget for language detection; a code is all we need.
pub const DETECTION_MAX_TOKENS: u32 = 5;

/// A single-shot completion request passed to a [`Provider`](crate::traits::Provider).
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Full prompt text, sent as one user message.
    pub prompt: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Completion {
    /// Emoji translation request for already-truncated input.
    pub fn translation(input: &str, temperature: f32, max_output_tokens: u32) -> Self {
        Self {
            prompt: translation_prompt(input),
            temperature,
            max_output_tokens,
        }
    }

    /// Deterministic language classification request.
    pub fn language_detection(input: &str) -> Self {
        Self {
            prompt: detection_prompt(input),
            temperature: 0.0,
            max_output_tokens: DETECTION_MAX_TOKENS,
        }
    }
}

/// Build the translation prompt.
pub fn translation_prompt(input: &str) -> String {
    format!(
        "You are an Emoji Translator. Translate the given text into emojis wherever possible.\n\
         - Support any language.\n\
         - Keep only the essential words if emojis are insufficient.\n\
         - Preserve sentiment and tone.\n\
         - Do NOT add explanations. Output ONLY the emoji string (optionally with minimal words).\n\
         \n\
         Text: {input}"
    )
}

/// Build the language detection prompt. The text is embedded as a JSON string
/// literal so quotes and newlines in user input stay inside the payload.
pub fn detection_prompt(input: &str) -> String {
    let quoted = serde_json::to_string(input).unwrap_or_else(|_| format!("\"{input}\""));
    format!(
        "Return only the ISO 639-1 language code for the language of this text. \
         Use \"en\" for English. If mixed, return the dominant language. Text: {quoted}"
    )
}
