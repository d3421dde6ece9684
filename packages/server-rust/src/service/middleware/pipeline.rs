//! Pipeline composition: wraps the dispatcher in its middleware layers.

use tower::ServiceBuilder;

use super::metrics::{MetricsLayer, MetricsService};
use crate::service::dispatch::Dispatcher;

/// The dispatcher as seen by the HTTP layer.
pub type DispatchPipeline = MetricsService<Dispatcher>;

/// Build the dispatch pipeline by wrapping the `Dispatcher` with middleware layers.
///
/// Only `MetricsLayer` applies: the dispatcher itself never fails, never
/// queues and has no timeout of its own.
#[must_use]
pub fn build_dispatch_pipeline(dispatcher: Dispatcher) -> DispatchPipeline {
    ServiceBuilder::new().layer(MetricsLayer).service(dispatcher)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
