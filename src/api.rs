//! HTTP API server.
//!
//! Mounts the translation endpoint at the deployment's path plus a health
//! check. Every response carries the site security headers.

use crate::deployment::Deployment;
use crate::pipeline::{Pipeline, Terminal};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use emojify_core::{
    identity::{ClientIdentity, FORWARDED_FOR_HEADER, REAL_IP_HEADER},
    routing::ProviderKind,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Headers applied to every response.
const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("x-frame-options", "DENY"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    (
        "permissions-policy",
        "camera=(), microphone=(), geolocation=()",
    ),
    ("content-security-policy", CONTENT_SECURITY_POLICY),
];

const CONTENT_SECURITY_POLICY: &str = concat!(
    "default-src 'self'; ",
    "base-uri 'self'; ",
    "frame-ancestors 'none'; ",
    "img-src 'self' data: blob:; ",
    "font-src 'self'; ",
    "media-src 'self' data: blob:; ",
    "script-src 'self' 'unsafe-inline' 'unsafe-eval' 'wasm-unsafe-eval'; ",
    "style-src 'self' 'unsafe-inline'; ",
    "connect-src 'self'; ",
    "object-src 'none'; ",
    "form-action 'self'; ",
    "upgrade-insecure-requests",
);

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pipeline: Arc<Pipeline>,
    deployment: Deployment,
    uptime: Instant,
}

impl ApiState {
    pub fn new(pipeline: Arc<Pipeline>, deployment: Deployment) -> Self {
        Self {
            pipeline,
            deployment,
            uptime: Instant::now(),
        }
    }
}

impl IntoResponse for Terminal {
    fn into_response(self) -> Response {
        match self {
            Terminal::RateRejected { retry_after_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after_secs.to_string())],
                Json(json!({"error": "rate_limited"})),
            )
                .into_response(),
            Terminal::InvalidInput => (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Missing text"})),
            )
                .into_response(),
            Terminal::RemoteSucceeded(outcome)
            | Terminal::RemoteFailedOrEmpty(outcome)
            | Terminal::Recovered(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
            Terminal::Unparseable => (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Invalid request"})),
            )
                .into_response(),
        }
    }
}

/// Resolve the client from forwarding headers. Non-UTF-8 values are ignored.
fn client_identity(headers: &HeaderMap) -> ClientIdentity {
    let get = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    ClientIdentity::resolve(get(FORWARDED_FOR_HEADER), get(REAL_IP_HEADER))
}

/// `POST <mount>`: translate `{ "text": ... }` into emoji.
///
/// A body that cannot be buffered (over the size limit, or a broken stream)
/// still goes through the pipeline so it is rate limited and logged.
async fn translate(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let client = client_identity(&headers);
    let terminal = match body {
        Ok(body) => state.pipeline.handle(&client, &body).await,
        Err(rejection) => {
            warn!("unreadable request body: {rejection}");
            state.pipeline.handle_unreadable(&client).await
        }
    };
    terminal.into_response()
}

/// `GET /api/health`: liveness plus which backends have credentials.
async fn health(State(state): State<ApiState>) -> Json<Value> {
    let pipeline = &state.pipeline;
    Json(json!({
        "status": "ok",
        "uptime_secs": state.uptime.elapsed().as_secs(),
        "deployment": state.deployment.as_str(),
        "providers": {
            "openai": pipeline.backend(ProviderKind::OpenAi).has_api_key(),
            "gemini": pipeline.backend(ProviderKind::Gemini).has_api_key(),
        },
    }))
}

async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    for &(name, value) in SECURITY_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    response
}

/// Build the axum router with shared state.
pub fn build_router(state: ApiState, body_limit: usize) -> Router {
    Router::new()
        .route(state.deployment.mount_path(), post(translate))
        .route("/api/health", get(health))
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(security_headers))
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn serve(state: ApiState, addr: &str, body_limit: usize) -> anyhow::Result<()> {
    let mount = state.deployment.mount_path();
    let app = build_router(state, body_limit);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("API server failed to bind to {addr}: {e}"))?;

    info!("API server listening on {addr} (POST {mount})");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("API server error: {e}");
        return Err(e.into());
    }
    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}
