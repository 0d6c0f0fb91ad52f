use super::*;
use std::collections::HashMap;

fn env_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_defaults() {
    let cfg = Config::default();
    assert_eq!(cfg.server.host, "127.0.0.1");
    assert_eq!(cfg.server.port, 8787);
    assert_eq!(cfg.translate.default_provider, "gemini");
    assert_eq!(cfg.translate.max_input_chars, 100);
    assert_eq!(cfg.translate.max_output_tokens, 75);
    assert_eq!(cfg.rate_limit.window_ms, 60_000);
    assert_eq!(cfg.rate_limit.max_requests, 3);
    assert_eq!(cfg.provider.gemini.model, "gemini-2.5-flash-lite");
    assert!(cfg.provider.openai.model.is_none());
    assert!(cfg.provider.openai.api_key.is_empty());
}

#[test]
fn test_partial_toml_fills_defaults() {
    let toml_str = r#"
        [server]
        port = 9000

        [provider.openai]
        api_key = "sk-test"
        model = "gpt-4o"

        [edge.bindings]
        GEMINI_API_KEY = "AIza-edge"
    "#;
    let cfg: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(cfg.server.port, 9000);
    assert_eq!(cfg.server.host, "127.0.0.1");
    assert_eq!(cfg.provider.openai.api_key, "sk-test");
    assert_eq!(cfg.provider.openai.model_or("gpt-4.1-nano"), "gpt-4o");
    assert_eq!(
        cfg.provider.openai.base_url,
        "https://api.openai.com/v1"
    );
    assert_eq!(cfg.rate_limit.max_requests, 3);
    assert_eq!(
        cfg.edge.bindings.get("GEMINI_API_KEY").map(String::as_str),
        Some("AIza-edge")
    );
}

#[test]
fn test_model_or_fallback() {
    let oa = OpenAiConfig::default();
    assert_eq!(oa.model_or("gpt-4o-mini"), "gpt-4o-mini");
}

#[test]
fn test_apply_env_overrides() {
    let vars = env_map(&[
        ("DEFAULT_PROVIDER", " OpenAI "),
        ("OPENAI_MODEL", "gpt-4o"),
        ("OPENAI_API_KEY", "sk-env"),
        ("GEMINI_MODEL", "gemini-2.0-flash"),
        ("GEMINI_API_KEY", "AIza-env"),
    ]);
    let mut cfg = Config::default();
    cfg.apply_env(|k| vars.get(k).cloned(), false);
    assert_eq!(cfg.translate.default_provider, "openai");
    assert_eq!(cfg.translate.default_provider_kind(), ProviderKind::OpenAi);
    assert_eq!(cfg.provider.openai.model.as_deref(), Some("gpt-4o"));
    assert_eq!(cfg.provider.openai.api_key, "sk-env");
    assert_eq!(cfg.provider.gemini.model, "gemini-2.0-flash");
    assert_eq!(cfg.provider.gemini.api_key, "AIza-env");
}

#[test]
fn test_google_api_key_fallback() {
    let vars = env_map(&[("GEMINI_API_KEY", ""), ("GOOGLE_API_KEY", "AIza-google")]);
    let mut cfg = Config::default();
    cfg.apply_env(|k| vars.get(k).cloned(), false);
    assert_eq!(cfg.provider.gemini.api_key, "AIza-google");
}

#[test]
fn test_sdk_fallback_only_when_enabled() {
    let vars = env_map(&[("GOOGLE_GENERATIVE_AI_API_KEY", "AIza-sdk")]);

    let mut edge = Config::default();
    edge.apply_env(|k| vars.get(k).cloned(), false);
    assert!(edge.provider.gemini.api_key.is_empty());

    let mut node = Config::default();
    node.apply_env(|k| vars.get(k).cloned(), true);
    assert_eq!(node.provider.gemini.api_key, "AIza-sdk");
}

#[test]
fn test_apply_env_keeps_file_values_when_unset() {
    let mut cfg = Config::default();
    cfg.provider.openai.api_key = "sk-file".into();
    cfg.apply_env(|_| None, true);
    assert_eq!(cfg.provider.openai.api_key, "sk-file");
    assert_eq!(cfg.translate.default_provider, "gemini");
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let cfg = load("/nonexistent/__emojify_test__/config.toml").unwrap();
    assert_eq!(cfg.server.port, 8787);
}

#[test]
fn test_load_invalid_toml_is_config_error() {
    let tmp = std::env::temp_dir().join("__emojify_test_bad_config__.toml");
    std::fs::write(&tmp, "[server\nport = ").unwrap();
    let err = load(tmp.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, EmojifyError::Config(_)));
    let _ = std::fs::remove_file(&tmp);
}

#[test]
fn test_load_unreadable_path_is_io_error() {
    // A directory exists but cannot be read as a file.
    let dir = std::env::temp_dir();
    let err = load(dir.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, EmojifyError::Io(_)));
}
