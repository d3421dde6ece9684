//! Metrics middleware for event dispatch.
//!
//! Records dispatch duration and outcome on a `tracing` span and through the
//! `metrics` facade. Without an installed recorder the `metrics` calls are
//! no-ops.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use tower::{Layer, Service};
use tracing::{info_span, Instrument};

use crate::service::dispatch::{HookRequest, HookResponse};

/// Counter of dispatched requests, labelled by `event` and `outcome`.
pub const DISPATCH_TOTAL: &str = "team_events_dispatch_total";
/// Histogram of dispatch durations in seconds, labelled by `event`.
pub const DISPATCH_DURATION_SECONDS: &str = "team_events_dispatch_duration_seconds";

/// Label used when the path did not resolve to a registered event.
const UNKNOWN_EVENT: &str = "unknown";

// ---------------------------------------------------------------------------
// MetricsLayer
// ---------------------------------------------------------------------------

/// Tower layer that instruments dispatches with timing and counting.
#[derive(Debug, Clone)]
pub struct MetricsLayer;

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsService { inner }
    }
}

// ---------------------------------------------------------------------------
// MetricsService
// ---------------------------------------------------------------------------

/// Service wrapper that records dispatch duration and outcome.
#[derive(Debug, Clone)]
pub struct MetricsService<S> {
    inner: S,
}

impl<S> Service<HookRequest> for MetricsService<S>
where
    S: Service<HookRequest, Response = HookResponse, Error = Infallible> + Send,
    S::Future: Send + 'static,
{
    type Response = HookResponse;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<HookResponse, Infallible>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: HookRequest) -> Self::Future {
        let span = info_span!(
            "dispatch",
            path = %request.path,
            event = tracing::field::Empty,
            status = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
            outcome = tracing::field::Empty,
        );

        let fut = self.inner.call(request);

        Box::pin(
            async move {
                let start = Instant::now();
                let response = match fut.await {
                    Ok(response) => response,
                    Err(never) => match never {},
                };
                let elapsed = start.elapsed();

                let event = response
                    .event
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_EVENT.to_string());
                let outcome = response.outcome();

                #[allow(clippy::cast_possible_truncation)]
                let duration_ms = elapsed.as_millis() as u64;
                let span = tracing::Span::current();
                span.record("event", event.as_str());
                span.record("status", response.status.as_u16());
                span.record("duration_ms", duration_ms);
                span.record("outcome", outcome);

                metrics::counter!(DISPATCH_TOTAL, "event" => event.clone(), "outcome" => outcome)
                    .increment(1);
                metrics::histogram!(DISPATCH_DURATION_SECONDS, "event" => event.clone())
                    .record(elapsed.as_secs_f64());

                tracing::info!(
                    event = %event,
                    status = response.status.as_u16(),
                    duration_ms = duration_ms,
                    outcome = outcome,
                    "dispatch complete"
                );

                Ok(response)
            }
            .instrument(span),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
