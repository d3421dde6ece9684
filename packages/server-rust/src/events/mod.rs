//! Hook event factories and the per-request handlers they build.
//!
//! Each event name maps to one [`HookEventFactory`]. A factory validates the
//! parsed payload and returns a [`HookEvent`]; the handler is performed once
//! and dropped. Factories are stateless apart from shared collaborator handles,
//! so one instance serves every request.

pub mod git_code_pushed;
pub mod git_push;
pub mod ping;
pub mod pull_request_merge_commit_created;

pub use git_code_pushed::GitCodePushedHookEventFactory;
pub use git_push::GitPushHookEventFactory;
pub use ping::PingHookEventFactory;
pub use pull_request_merge_commit_created::PullRequestMergeCommitCreatedHookEventFactory;

use async_trait::async_trait;
use serde_json::Value;
use team_events_core::{Payload, ValidationError};

use crate::traits::TriggerOutcome;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// A validated, single-use reaction to one inbound event.
#[async_trait]
pub trait HookEvent: Send {
    /// Performs the event's downstream action and returns the result document.
    ///
    /// Consumes the handler: it runs exactly once.
    async fn perform(self: Box<Self>, payload: Payload) -> anyhow::Result<Payload>;
}

/// Builds [`HookEvent`]s for one event name.
pub trait HookEventFactory: Send + Sync {
    /// Validates `payload` and builds a handler for it.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when required fields are missing or have
    /// the wrong shape for this event. The message is shown to the caller.
    fn create(&self, payload: &Payload) -> Result<Box<dyn HookEvent>, ValidationError>;

    /// Example request body for the index page. Never executed.
    fn sample_request_payload(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Result documents
// ---------------------------------------------------------------------------

/// Builds the result document shared by the push and pull-request handlers.
///
/// `fields` come first in the given order, followed by `messages`.
pub(crate) fn triggered_result(
    event_name: &str,
    fields: impl IntoIterator<Item = (&'static str, Value)>,
    outcomes: &[TriggerOutcome],
) -> Payload {
    let mut result = Payload::new();
    result.insert("eventName".to_string(), Value::from(event_name));
    for (key, value) in fields {
        result.insert(key.to_string(), value);
    }
    let messages = outcomes
        .iter()
        .map(|o| Value::String(o.to_string()))
        .collect();
    result.insert("messages".to_string(), Value::Array(messages));
    result
}

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use team_events_core::{GitCodePushedEventArgs, PullRequestMergeCommitCreatedEventArgs};

    use crate::traits::{BuildScheduler, TriggerOutcome};

    /// Scheduler that records every call and answers with fixed outcomes,
    /// or fails when `fail_with` is set.
    #[derive(Default)]
    pub(crate) struct RecordingScheduler {
        pub pushes: Mutex<Vec<GitCodePushedEventArgs>>,
        pub pull_requests: Mutex<Vec<PullRequestMergeCommitCreatedEventArgs>>,
        pub outcomes: Vec<TriggerOutcome>,
        pub fail_with: Option<&'static str>,
    }

    impl RecordingScheduler {
        pub(crate) fn with_outcomes(outcomes: Vec<TriggerOutcome>) -> Self {
            Self {
                outcomes,
                ..Self::default()
            }
        }

        pub(crate) fn failing(message: &'static str) -> Self {
            Self {
                fail_with: Some(message),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl BuildScheduler for RecordingScheduler {
        async fn poll_or_schedule(
            &self,
            args: &GitCodePushedEventArgs,
        ) -> anyhow::Result<Vec<TriggerOutcome>> {
            self.pushes.lock().unwrap().push(args.clone());
            match self.fail_with {
                Some(message) => Err(anyhow::anyhow!(message)),
                None => Ok(self.outcomes.clone()),
            }
        }

        async fn schedule_pull_request(
            &self,
            args: &PullRequestMergeCommitCreatedEventArgs,
        ) -> anyhow::Result<Vec<TriggerOutcome>> {
            self.pull_requests.lock().unwrap().push(args.clone());
            match self.fail_with {
                Some(message) => Err(anyhow::anyhow!(message)),
                None => Ok(self.outcomes.clone()),
            }
        }
    }
}
