//! Event routing and execution.
//!
//! 1. **Path** (`path`): request path -> event name
//! 2. **Registry** (`registry`): event name -> factory, case-insensitively
//! 3. **Dispatch** (`dispatch`): parse, validate, perform, classify
//! 4. **Middleware** (`middleware`): Tower layers around the dispatcher
//! 5. **Documentation** (`describe`): the HTML index of registered events

pub mod config;
pub mod describe;
pub mod dispatch;
pub mod middleware;
pub mod path;
pub mod registry;

// Re-export key types for convenient access.
pub use config::EndpointConfig;
pub use describe::{describe_events, escape_html, render_index, INDEX_TEMPLATE};
pub use dispatch::{DispatchError, Dispatcher, HookRequest, HookResponse};
pub use middleware::{build_dispatch_pipeline, DispatchPipeline};
pub use path::{event_name_from_path, url_prefix};
pub use registry::{default_registry, EventRegistry, EventRegistryBuilder, RegisteredEvent};
