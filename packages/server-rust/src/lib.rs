//! Team events server: receives TFS / Team Services event notifications over
//! HTTP and reacts to them through a [`BuildScheduler`].

pub mod events;
pub mod jobs;
pub mod network;
pub mod service;
pub mod traits;

pub use events::{HookEvent, HookEventFactory};
pub use jobs::{JobCatalog, JobDefinition, JobTrigger};
pub use network::{NetworkConfig, NetworkModule, TlsConfig};
pub use service::{default_registry, Dispatcher, EndpointConfig, EventRegistry};
pub use traits::{BuildScheduler, TriggerKind, TriggerOutcome};
