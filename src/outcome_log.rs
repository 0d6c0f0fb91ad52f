//! Outcome logging: one JSON line per handled request.

use emojify_core::{outcome::LogEvent, traits::OutcomeLogger};
use tracing::{info, warn};

/// Writes each [`LogEvent`] as a JSON line through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingOutcomeLogger;

impl OutcomeLogger for TracingOutcomeLogger {
    fn record(&self, event: &LogEvent) {
        match serde_json::to_string(event) {
            Ok(line) => info!(target: "emojify::outcome", "{line}"),
            Err(e) => warn!("failed to serialize outcome event: {e}"),
        }
    }
}
