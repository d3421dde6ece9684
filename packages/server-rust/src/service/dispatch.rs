//! The dispatch pipeline for inbound events.
//!
//! Every request walks the same fixed sequence:
//!
//! 1. **Resolve** the event name from the path and look it up in the registry
//! 2. **Parse** the body into a payload document
//! 3. **Construct** a handler through the event's factory
//! 4. **Execute** the handler
//! 5. **Respond** with the serialized result document
//!
//! A failure at any step ends the request with a classified [`HookResponse`].
//! Syntax problems (bad path, bad JSON) are rejected before any event-specific
//! code runs, and validation failures stay distinct from internal ones.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::StatusCode;
use team_events_core::{parse_payload, serialize_payload, PayloadError, ValidationError};
use thiserror::Error;
use tower::Service;
use tracing::{error, warn};

use super::path::{event_name_from_path, url_prefix};
use super::registry::{EventRegistry, RegisteredEvent};

pub const APPLICATION_JSON_UTF_8: &str = "application/json; charset=utf-8";
pub const TEXT_PLAIN_UTF_8: &str = "text/plain; charset=utf-8";

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

/// An inbound event submission: the request path and the raw body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookRequest {
    pub path: String,
    pub body: String,
}

impl HookRequest {
    pub fn new(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            body: body.into(),
        }
    }
}

/// The classified result of one dispatch, written out by the HTTP adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookResponse {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
    /// Registered name of the event, once the path resolved to one.
    pub event: Option<String>,
}

impl HookResponse {
    fn json(body: String, event: String) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: APPLICATION_JSON_UTF_8,
            body,
            event: Some(event),
        }
    }

    fn failed(err: &DispatchError, event: Option<String>) -> Self {
        Self {
            status: err.status_code(),
            content_type: TEXT_PLAIN_UTF_8,
            body: err.to_string(),
            event,
        }
    }

    /// Coarse outcome label: `"ok"`, `"client_error"` or `"server_error"`.
    #[must_use]
    pub fn outcome(&self) -> &'static str {
        if self.status.is_success() {
            "ok"
        } else if self.status.is_client_error() {
            "client_error"
        } else {
            "server_error"
        }
    }
}

// ---------------------------------------------------------------------------
// DispatchError
// ---------------------------------------------------------------------------

/// Why a dispatch failed. Each variant maps to exactly one HTTP status.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No event name in the path, a blank one, or one that is not registered.
    #[error("Invalid event")]
    InvalidEvent,
    /// The body is not a JSON object.
    #[error(transparent)]
    MalformedPayload(#[from] PayloadError),
    /// The payload parsed but does not suit the event.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The handler failed while performing its action.
    #[error("Error while performing reaction to '{event}' event: {source:#}")]
    Internal {
        event: String,
        source: anyhow::Error,
    },
}

impl DispatchError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidEvent | Self::MalformedPayload(_) | Self::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Routes event submissions to their factories and classifies every outcome.
///
/// Cheap to clone: the registry is shared read-only behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<EventRegistry>,
    prefix: Arc<str>,
}

impl Dispatcher {
    /// Creates a dispatcher serving events under `/<url_name>/`.
    #[must_use]
    pub fn new(registry: Arc<EventRegistry>, url_name: &str) -> Self {
        Self {
            registry,
            prefix: url_prefix(url_name).into(),
        }
    }

    /// Runs the full pipeline for one request. Never fails: errors become
    /// 400 or 500 responses.
    pub async fn dispatch(&self, request: HookRequest) -> HookResponse {
        let entry = match self.resolve(&request.path) {
            Ok(entry) => entry,
            Err(err) => return reject(&err, &request, None),
        };
        let event = entry.name().to_string();

        match execute(entry, &request.body).await {
            Ok(body) => HookResponse::json(body, event),
            Err(err) => reject(&err, &request, Some(event)),
        }
    }

    fn resolve(&self, path: &str) -> Result<&RegisteredEvent, DispatchError> {
        let name = event_name_from_path(path, &self.prefix)
            .filter(|name| !name.trim().is_empty())
            .ok_or(DispatchError::InvalidEvent)?;
        self.registry.lookup(name).ok_or(DispatchError::InvalidEvent)
    }
}

async fn execute(entry: &RegisteredEvent, body: &str) -> Result<String, DispatchError> {
    let payload = parse_payload(body)?;
    let handler = entry.factory().create(&payload)?;
    let result = handler
        .perform(payload)
        .await
        .map_err(|source| DispatchError::Internal {
            event: entry.name().to_string(),
            source,
        })?;
    Ok(serialize_payload(result))
}

fn reject(err: &DispatchError, request: &HookRequest, event: Option<String>) -> HookResponse {
    match err {
        DispatchError::Internal { event: name, source } => {
            error!(
                event = %name,
                error = %format!("{source:#}"),
                "error while performing reaction to event"
            );
        }
        _ => {
            warn!(
                path = %request.path,
                event = event.as_deref().unwrap_or_default(),
                error = %err,
                "rejected event request"
            );
        }
    }
    HookResponse::failed(err, event)
}

impl Service<HookRequest> for Dispatcher {
    type Response = HookResponse;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<HookResponse, Infallible>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: HookRequest) -> Self::Future {
        let dispatcher = self.clone();
        Box::pin(async move { Ok(dispatcher.dispatch(request).await) })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
