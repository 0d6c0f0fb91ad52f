mod defaults;
mod providers;

#[cfg(test)]
mod tests;

pub use providers::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::error::EmojifyError;
use crate::routing::ProviderKind;
use defaults::*;

/// Environment keys recognized by [`Config::apply_env`].
pub mod env {
    pub const DEFAULT_PROVIDER: &str = "DEFAULT_PROVIDER";
    pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const GEMINI_MODEL: &str = "GEMINI_MODEL";
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
    /// Credential read by the Google SDK when nothing else is set.
    pub const GOOGLE_GENERATIVE_AI_API_KEY: &str = "GOOGLE_GENERATIVE_AI_API_KEY";

    /// Every key either deployment may read.
    pub const ALL: &[&str] = &[
        DEFAULT_PROVIDER,
        OPENAI_MODEL,
        OPENAI_API_KEY,
        GEMINI_MODEL,
        GEMINI_API_KEY,
        GOOGLE_API_KEY,
        GOOGLE_GENERATIVE_AI_API_KEY,
    ];
}

/// Top-level Emojify configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub translate: TranslateConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub edge: EdgeConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

/// Translation pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Provider used when language detection is unavailable.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Input is cut to this many characters before anything else happens.
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl TranslateConfig {
    pub fn default_provider_kind(&self) -> ProviderKind {
        ProviderKind::from_setting(&self.default_provider)
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            max_input_chars: default_max_input_chars(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Sliding window rate limit settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_window_ms")]
    pub window_ms: i64,
    #[serde(default = "default_max_requests")]
    pub max_requests: usize,
    /// How often idle identifiers are evicted.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            max_requests: default_max_requests(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

/// Settings for the edge deployment variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgeConfig {
    /// Environment bindings. The edge variant reads configuration from here
    /// instead of the process environment.
    #[serde(default)]
    pub bindings: HashMap<String, String>,
}

impl Config {
    /// Overlay recognized environment values on top of the file config.
    ///
    /// Empty values count as unset. Gemini credentials are taken from the
    /// first non-empty of `GEMINI_API_KEY`, `GOOGLE_API_KEY`, and (only when
    /// `sdk_fallback` is set) `GOOGLE_GENERATIVE_AI_API_KEY`.
    pub fn apply_env<F>(&mut self, lookup: F, sdk_fallback: bool)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(p) = get(env::DEFAULT_PROVIDER) {
            self.translate.default_provider = p.trim().to_lowercase();
        }
        if let Some(m) = get(env::OPENAI_MODEL) {
            self.provider.openai.model = Some(m);
        }
        if let Some(k) = get(env::OPENAI_API_KEY) {
            self.provider.openai.api_key = k;
        }
        if let Some(m) = get(env::GEMINI_MODEL) {
            self.provider.gemini.model = m;
        }

        let gemini_key = get(env::GEMINI_API_KEY)
            .or_else(|| get(env::GOOGLE_API_KEY))
            .or_else(|| {
                if sdk_fallback {
                    get(env::GOOGLE_GENERATIVE_AI_API_KEY)
                } else {
                    None
                }
            });
        if let Some(k) = gemini_key {
            self.provider.gemini.api_key = k;
        }
    }
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist. A file that exists but
/// cannot be read is an [`EmojifyError::Io`]; a parse failure is
/// [`EmojifyError::Config`].
pub fn load(path: &str) -> Result<Config, EmojifyError> {
    let path = Path::new(path);
    if !path.exists() {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| EmojifyError::Config(format!("failed to parse config: {}", e)))?;

    Ok(config)
}
