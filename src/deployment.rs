//! Deployment adapters.
//!
//! Two thin variants share one pipeline. They differ only in where the
//! endpoint is mounted, where environment configuration comes from, and the
//! OpenAI model used when none is configured.

use crate::outcome_log::TracingOutcomeLogger;
use crate::pipeline::Pipeline;
use clap::ValueEnum;
use emojify_core::{
    config::{env, Config},
    ratelimit::SlidingWindowLimiter,
    traits::Provider,
};
use emojify_providers::{
    detect::ModelLanguageDetector, gemini::GeminiProvider, openai::OpenAiProvider,
};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Which deployment variant this process runs as.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Deployment {
    /// Long-running server. Reads the process environment.
    #[default]
    Node,
    /// Edge function. Reads `[edge.bindings]` from the config file only.
    Edge,
}

impl Deployment {
    /// Path of the translation endpoint.
    pub fn mount_path(&self) -> &'static str {
        match self {
            Self::Node => "/api/translate",
            Self::Edge => "/functions/api/translate",
        }
    }

    /// OpenAI model used when neither the file nor the environment sets one.
    pub fn default_openai_model(&self) -> &'static str {
        match self {
            Self::Node => "gpt-4.1-nano",
            Self::Edge => "gpt-4o-mini",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Edge => "edge",
        }
    }

    /// Overlay this variant's environment source onto the file config.
    pub fn configure(&self, mut cfg: Config) -> Config {
        match self {
            Self::Node => cfg.apply_env(|key| std::env::var(key).ok(), true),
            Self::Edge => {
                let bindings = cfg.edge.bindings.clone();
                cfg.apply_env(|key| bindings.get(key).cloned(), false);
            }
        }
        cfg
    }

    /// Build both backends from an already-configured [`Config`].
    pub fn build_providers(&self, cfg: &Config) -> (Arc<dyn Provider>, Arc<dyn Provider>) {
        let oa = &cfg.provider.openai;
        let openai = OpenAiProvider::from_config(
            oa.base_url.clone(),
            oa.api_key.clone(),
            oa.model_or(self.default_openai_model()).to_string(),
        );
        let gm = &cfg.provider.gemini;
        let gemini =
            GeminiProvider::from_config(gm.base_url.clone(), gm.api_key.clone(), gm.model.clone());
        (Arc::new(openai), Arc::new(gemini))
    }

    /// Assemble the shared pipeline for this variant.
    pub fn build_pipeline(&self, cfg: &Config) -> Pipeline {
        let (openai, gemini) = self.build_providers(cfg);
        let detector = Arc::new(ModelLanguageDetector::new(gemini.clone()));

        let rl = &cfg.rate_limit;
        let limiter = Arc::new(SlidingWindowLimiter::with_sweep_interval(
            rl.window_ms,
            rl.max_requests,
            (rl.sweep_interval_secs as i64).saturating_mul(1000),
        ));
        let retry_after_secs = (rl.window_ms.max(0) as u64).div_ceil(1000);

        let openai_state = credential_state(openai.as_ref());
        let gemini_state = credential_state(gemini.as_ref());
        let pipeline = Pipeline::new(
            openai,
            gemini,
            detector,
            limiter,
            Arc::new(TracingOutcomeLogger),
            cfg.translate.clone(),
            retry_after_secs,
        );

        info!(
            "{self} pipeline | default provider: {} | openai: {openai_state} | gemini: {gemini_state} | limit: {}/{}ms",
            pipeline.default_provider(),
            rl.max_requests,
            rl.window_ms,
        );
        pipeline
    }
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn credential_state(provider: &dyn Provider) -> &'static str {
    if provider.has_api_key() {
        "configured"
    } else {
        "no key"
    }
}

/// Keys an operator may set for this binary, for `status` output.
pub fn recognized_env_keys() -> &'static [&'static str] {
    env::ALL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_paths_differ() {
        assert_eq!(Deployment::Node.mount_path(), "/api/translate");
        assert_eq!(Deployment::Edge.mount_path(), "/functions/api/translate");
    }

    #[test]
    fn test_edge_reads_bindings_only() {
        let mut cfg = Config::default();
        cfg.edge
            .bindings
            .insert("OPENAI_API_KEY".into(), "sk-binding".into());
        cfg.edge
            .bindings
            .insert("DEFAULT_PROVIDER".into(), "openai".into());
        let cfg = Deployment::Edge.configure(cfg);
        assert_eq!(cfg.provider.openai.api_key, "sk-binding");
        assert_eq!(cfg.translate.default_provider, "openai");
    }

    #[test]
    fn test_default_openai_model_per_variant() {
        let cfg = Config::default();
        let (node_openai, _) = Deployment::Node.build_providers(&cfg);
        let (edge_openai, _) = Deployment::Edge.build_providers(&cfg);
        assert_eq!(node_openai.name(), "openai");
        assert_eq!(edge_openai.name(), "openai");
        assert_eq!(
            cfg.provider.openai.model_or(Deployment::Edge.default_openai_model()),
            "gpt-4o-mini"
        );
        assert_eq!(
            cfg.provider.openai.model_or(Deployment::Node.default_openai_model()),
            "gpt-4.1-nano"
        );
    }

    #[test]
    fn test_build_pipeline_uses_configured_default() {
        let mut cfg = Config::default();
        cfg.translate.default_provider = "openai".into();
        let pipeline = Deployment::Edge.build_pipeline(&cfg);
        assert_eq!(
            pipeline.default_provider(),
            emojify_core::routing::ProviderKind::OpenAi
        );
    }
}
