use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use team_events_core::event_names;
use tracing::warn;

use crate::events::{
    GitCodePushedHookEventFactory, GitPushHookEventFactory, HookEventFactory,
    PingHookEventFactory, PullRequestMergeCommitCreatedHookEventFactory,
};
use crate::traits::BuildScheduler;

// ---------------------------------------------------------------------------
// RegisteredEvent
// ---------------------------------------------------------------------------

/// A registry entry: the event name as registered plus its factory.
#[derive(Clone)]
pub struct RegisteredEvent {
    name: String,
    factory: Arc<dyn HookEventFactory>,
}

impl RegisteredEvent {
    /// The event name with the casing it was registered under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn factory(&self) -> &dyn HookEventFactory {
        self.factory.as_ref()
    }
}

impl fmt::Debug for RegisteredEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredEvent")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// EventRegistryBuilder
// ---------------------------------------------------------------------------

/// Collects registrations during startup. [`build`](Self::build) freezes them.
#[derive(Default)]
pub struct EventRegistryBuilder {
    entries: BTreeMap<String, RegisteredEvent>,
}

impl EventRegistryBuilder {
    /// Registers `factory` under `name`.
    ///
    /// Keys are case-insensitive. Registering a name that differs only in case
    /// from an earlier one replaces the earlier factory but keeps the earlier
    /// spelling, and logs a warning.
    #[must_use]
    pub fn register(mut self, name: &str, factory: impl HookEventFactory + 'static) -> Self {
        let key = fold_case(name);
        let factory: Arc<dyn HookEventFactory> = Arc::new(factory);
        if let Some(existing) = self.entries.get_mut(&key) {
            warn!(
                event = name,
                existing = %existing.name,
                "event registered twice ignoring case, replacing earlier factory"
            );
            existing.factory = factory;
        } else {
            self.entries.insert(
                key,
                RegisteredEvent {
                    name: name.to_string(),
                    factory,
                },
            );
        }
        self
    }

    #[must_use]
    pub fn build(self) -> EventRegistry {
        EventRegistry {
            entries: self.entries,
        }
    }
}

// ---------------------------------------------------------------------------
// EventRegistry
// ---------------------------------------------------------------------------

/// Immutable, case-insensitive map from event name to factory.
///
/// Built once at startup and shared behind an `Arc`; it has no interior
/// mutability, so concurrent lookups need no locking. Iteration follows
/// case-insensitive lexicographic order of the names.
#[derive(Debug)]
pub struct EventRegistry {
    /// Lower-cased name -> entry.
    entries: BTreeMap<String, RegisteredEvent>,
}

impl EventRegistry {
    #[must_use]
    pub fn builder() -> EventRegistryBuilder {
        EventRegistryBuilder::default()
    }

    /// Looks up an event by name, ignoring case.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&RegisteredEvent> {
        self.entries.get(&fold_case(name))
    }

    /// Returns `true` if `name` is registered, ignoring case.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// All entries in case-insensitive name order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredEvent> {
        self.entries.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Registers the four built-in events, all acting on `scheduler`.
#[must_use]
pub fn default_registry(scheduler: Arc<dyn BuildScheduler>) -> EventRegistry {
    EventRegistry::builder()
        .register(event_names::PING, PingHookEventFactory)
        .register(
            event_names::GIT_CODE_PUSHED,
            GitCodePushedHookEventFactory::new(Arc::clone(&scheduler)),
        )
        .register(
            event_names::GIT_PUSH,
            GitPushHookEventFactory::new(Arc::clone(&scheduler)),
        )
        .register(
            event_names::PULL_REQUEST_MERGE_COMMIT_CREATED,
            PullRequestMergeCommitCreatedHookEventFactory::new(scheduler),
        )
        .build()
}

fn fold_case(name: &str) -> String {
    name.to_lowercase()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
