//! Translation pipeline: rate gate, validation, detection, routing, remote
//! call, and local fallback.
//!
//! Every request ends in exactly one [`Terminal`] state and produces exactly
//! one [`LogEvent`], whichever path it takes.

use emojify_core::{
    completion::Completion,
    config::TranslateConfig,
    dictionary,
    identity::ClientIdentity,
    outcome::{LogEvent, TranslationOutcome, UNKNOWN_LANG},
    routing::{self, ProviderKind},
    traits::{LanguageDetector, OutcomeLogger, Provider, RateLimiter},
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// How a request ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Terminal {
    /// Client exceeded its window; nothing else was evaluated.
    RateRejected { retry_after_secs: u64 },
    /// Text was empty after truncation and trimming.
    InvalidInput,
    /// The remote model answered with usable text.
    RemoteSucceeded(TranslationOutcome),
    /// The remote call failed or came back blank; local result served.
    RemoteFailedOrEmpty(TranslationOutcome),
    /// The body did not parse but text was salvaged and translated locally.
    Recovered(TranslationOutcome),
    /// The body did not parse and nothing could be salvaged.
    Unparseable,
}

impl Terminal {
    /// The successful outcome, if this state carries one.
    pub fn outcome(&self) -> Option<&TranslationOutcome> {
        match self {
            Self::RemoteSucceeded(o) | Self::RemoteFailedOrEmpty(o) | Self::Recovered(o) => {
                Some(o)
            }
            _ => None,
        }
    }
}

/// Result of reading the request body.
#[derive(Debug, PartialEq)]
enum Body {
    /// Well-formed input. The text may still be empty.
    Text(String),
    /// Malformed input, with whatever text could be salvaged.
    Malformed(Option<String>),
}

/// Shared translation pipeline. One instance serves every request.
pub struct Pipeline {
    openai: Arc<dyn Provider>,
    gemini: Arc<dyn Provider>,
    detector: Arc<dyn LanguageDetector>,
    limiter: Arc<dyn RateLimiter>,
    logger: Arc<dyn OutcomeLogger>,
    settings: TranslateConfig,
    default_provider: ProviderKind,
    retry_after_secs: u64,
}

impl Pipeline {
    pub fn new(
        openai: Arc<dyn Provider>,
        gemini: Arc<dyn Provider>,
        detector: Arc<dyn LanguageDetector>,
        limiter: Arc<dyn RateLimiter>,
        logger: Arc<dyn OutcomeLogger>,
        settings: TranslateConfig,
        retry_after_secs: u64,
    ) -> Self {
        let default_provider = settings.default_provider_kind();
        Self {
            openai,
            gemini,
            detector,
            limiter,
            logger,
            settings,
            default_provider,
            retry_after_secs,
        }
    }

    /// Provider used when detection yields nothing.
    pub fn default_provider(&self) -> ProviderKind {
        self.default_provider
    }

    /// Backend for a routing decision.
    pub fn backend(&self, kind: ProviderKind) -> &Arc<dyn Provider> {
        match kind {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Gemini => &self.gemini,
        }
    }

    /// Handle one inbound request body from `client`.
    pub async fn handle(&self, client: &ClientIdentity, body: &[u8]) -> Terminal {
        self.dispatch(client, Some(body)).await
    }

    /// Handle a request whose body could not be read at all, for example one
    /// over the size limit. It still passes the rate gate and is logged.
    pub async fn handle_unreadable(&self, client: &ClientIdentity) -> Terminal {
        self.dispatch(client, None).await
    }

    async fn dispatch(&self, client: &ClientIdentity, body: Option<&[u8]>) -> Terminal {
        let start = Instant::now();
        let mut event = LogEvent::new(&client.hash);

        let terminal = if self.limiter.is_limited(&client.raw) {
            event.rate_limited = true;
            Terminal::RateRejected {
                retry_after_secs: self.retry_after_secs,
            }
        } else {
            match body.map(parse_body) {
                Some(Body::Text(text)) => self.run(&text, &mut event).await,
                Some(Body::Malformed(salvaged)) => self.recover(salvaged, &mut event),
                None => Terminal::Unparseable,
            }
        };

        event.duration_ms = start.elapsed().as_millis() as u64;
        self.logger.record(&event);
        terminal
    }

    /// Translate text directly, bypassing the rate gate and outcome log.
    pub async fn translate(&self, text: &str) -> Terminal {
        let mut scratch = LogEvent::new("");
        self.run(text, &mut scratch).await
    }

    async fn run(&self, text: &str, event: &mut LogEvent) -> Terminal {
        let input = truncate_chars(text, self.settings.max_input_chars);
        if input.trim().is_empty() {
            return Terminal::InvalidInput;
        }

        // Computed up front so every remote failure has an answer ready.
        let local = dictionary::translate(input);

        let detected = self.detector.detect(input).await;
        event.lang = detected.clone().unwrap_or_else(|| UNKNOWN_LANG.to_string());

        let kind = routing::route(detected.as_deref(), self.default_provider);
        event.provider = kind.to_string();
        debug!("routing to {kind} (detected: {detected:?})");

        let completion = Completion::translation(
            input,
            self.settings.temperature,
            self.settings.max_output_tokens,
        );
        let terminal = match self.backend(kind).complete(&completion).await {
            Ok(reply) if !reply.trim().is_empty() => {
                Terminal::RemoteSucceeded(TranslationOutcome::ai(reply.trim().to_string(), kind))
            }
            Ok(_) => {
                warn!("{kind} returned an empty translation, serving local result");
                Terminal::RemoteFailedOrEmpty(TranslationOutcome::degraded(local, Some(kind)))
            }
            Err(e) => {
                warn!("{kind} translation failed, serving local result: {e}");
                Terminal::RemoteFailedOrEmpty(TranslationOutcome::degraded(local, Some(kind)))
            }
        };

        if let Some(outcome) = terminal.outcome() {
            event.source = outcome.source.as_str().to_string();
        }
        terminal
    }

    fn recover(&self, salvaged: Option<String>, event: &mut LogEvent) -> Terminal {
        let Some(text) = salvaged else {
            return Terminal::Unparseable;
        };
        let input = truncate_chars(&text, self.settings.max_input_chars);
        let output = dictionary::translate(input);
        if output.is_empty() {
            return Terminal::Unparseable;
        }
        warn!("malformed request body, served local translation of salvaged text");
        let outcome = TranslationOutcome::degraded(output, None);
        event.source = outcome.source.as_str().to_string();
        Terminal::Recovered(outcome)
    }
}

/// Cut `text` to at most `max` characters.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Read the `text` field of a JSON object body.
///
/// Scalars are stringified and a missing or null field reads as empty. A
/// body that is not JSON goes through [`salvage_text`].
fn parse_body(body: &[u8]) -> Body {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("text") {
            None | Some(Value::Null) => Body::Text(String::new()),
            Some(Value::String(s)) => Body::Text(s.clone()),
            Some(Value::Number(n)) => Body::Text(n.to_string()),
            Some(Value::Bool(b)) => Body::Text(b.to_string()),
            Some(_) => Body::Malformed(None),
        },
        Ok(_) => Body::Malformed(None),
        Err(_) => Body::Malformed(salvage_text(&String::from_utf8_lossy(body))),
    }
}

/// Best-effort extraction of the string following a `"text"` key in a body
/// that failed to parse, e.g. a truncated upload. Returns `None` when nothing
/// non-blank can be recovered.
fn salvage_text(raw: &str) -> Option<String> {
    let after_key = &raw[raw.find("\"text\"")? + "\"text\"".len()..];
    let after_colon = after_key.trim_start().strip_prefix(':')?;
    let value = after_colon.trim_start().strip_prefix('"')?;

    let mut out = String::new();
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => break,
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some(other) => out.push(other),
                None => break,
            },
            _ => out.push(c),
        }
    }

    if out.trim().is_empty() {
        None
    } else {
        Some(out)
    }
}
