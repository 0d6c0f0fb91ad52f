//! Default value functions used by serde for config deserialization.

use crate::completion::{TRANSLATION_MAX_TOKENS, TRANSLATION_TEMPERATURE};
use crate::ratelimit::{DEFAULT_MAX_REQUESTS, DEFAULT_SWEEP_INTERVAL_MS, DEFAULT_WINDOW_MS};

pub fn default_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_port() -> u16 {
    8787
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_body_limit() -> usize {
    1024 * 1024
}

pub fn default_provider() -> String {
    "gemini".to_string()
}

pub fn default_max_input_chars() -> usize {
    100
}

pub fn default_max_output_tokens() -> u32 {
    TRANSLATION_MAX_TOKENS
}

pub fn default_temperature() -> f32 {
    TRANSLATION_TEMPERATURE
}

pub fn default_window_ms() -> i64 {
    DEFAULT_WINDOW_MS
}

pub fn default_max_requests() -> usize {
    DEFAULT_MAX_REQUESTS
}

pub fn default_sweep_interval_secs() -> u64 {
    (DEFAULT_SWEEP_INTERVAL_MS / 1000) as u64
}

pub fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

pub fn default_gemini_model() -> String {
    "gemini-2.5-flash-lite".to_string()
}

pub fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
