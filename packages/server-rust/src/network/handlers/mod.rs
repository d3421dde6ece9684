//! axum handlers and the state they share.

pub mod events;
pub mod health;
pub mod index;

pub use events::events_handler;
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use index::index_handler;

use std::sync::Arc;
use std::time::Instant;

use super::ShutdownController;
use crate::service::{DispatchPipeline, EndpointConfig, EventRegistry};

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Everything is behind `Arc` or cheaply clonable, so cloning per request is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Dispatcher wrapped in its middleware.
    pub dispatcher: DispatchPipeline,
    /// Registered events, for the index page.
    pub registry: Arc<EventRegistry>,
    pub endpoint: Arc<EndpointConfig>,
    /// Base URL shown on the index page, ending in `/`.
    pub root_url: Arc<str>,
    pub shutdown: Arc<ShutdownController>,
    /// Used for the uptime in `/health`.
    pub start_time: Instant,
}
