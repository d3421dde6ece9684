//! `POST /<root>/<eventName>`: hands the request to the dispatcher.

use std::borrow::Cow;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;

use super::AppState;
use crate::service::{HookRequest, HookResponse};

/// Dispatches one event submission and writes out the classified result.
///
/// The path is percent-decoded before the event name is resolved. The body is
/// decoded lossily, so invalid UTF-8 surfaces as a malformed payload from the
/// dispatcher rather than as an extractor rejection.
///
/// Requests arriving after shutdown began get a 503 and are not dispatched.
pub async fn events_handler(State(state): State<AppState>, uri: Uri, body: Bytes) -> Response {
    if !state.shutdown.health_state().accepts_events() {
        return (StatusCode::SERVICE_UNAVAILABLE, "Server is shutting down").into_response();
    }
    let _guard = state.shutdown.in_flight_guard();

    let request = HookRequest::new(decode_path(uri.path()), String::from_utf8_lossy(&body));
    match state.dispatcher.oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// Percent-decodes `path`, keeping it as is when the decoded bytes are not UTF-8.
fn decode_path(path: &str) -> Cow<'_, str> {
    urlencoding::decode(path).unwrap_or(Cow::Borrowed(path))
}

impl IntoResponse for HookResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, self.content_type)],
            self.body,
        )
            .into_response()
    }
}
