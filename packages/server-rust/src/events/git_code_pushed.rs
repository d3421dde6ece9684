//! `gitCodePushed`: a `git.push` service hook notification.
//!
//! The handler built here is shared with `gitPush`, which carries the same
//! arguments without the service hook envelope.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use team_events_core::{event_names, samples, GitCodePushedEventArgs, Payload, ValidationError};
use tracing::info;

use super::{triggered_result, HookEvent, HookEventFactory};
use crate::traits::BuildScheduler;

/// Factory for `gitCodePushed` events.
pub struct GitCodePushedHookEventFactory {
    scheduler: Arc<dyn BuildScheduler>,
}

impl GitCodePushedHookEventFactory {
    #[must_use]
    pub fn new(scheduler: Arc<dyn BuildScheduler>) -> Self {
        Self { scheduler }
    }
}

impl HookEventFactory for GitCodePushedHookEventFactory {
    fn create(&self, payload: &Payload) -> Result<Box<dyn HookEvent>, ValidationError> {
        let args = GitCodePushedEventArgs::from_code_pushed_payload(payload)?;
        Ok(Box::new(PushHookEvent::new(
            event_names::GIT_CODE_PUSHED,
            args,
            Arc::clone(&self.scheduler),
        )))
    }

    fn sample_request_payload(&self) -> &str {
        samples::GIT_CODE_PUSHED
    }
}

/// Polls or builds every job watching the pushed repository and branch.
pub struct PushHookEvent {
    event_name: &'static str,
    args: GitCodePushedEventArgs,
    scheduler: Arc<dyn BuildScheduler>,
}

impl PushHookEvent {
    pub(crate) fn new(
        event_name: &'static str,
        args: GitCodePushedEventArgs,
        scheduler: Arc<dyn BuildScheduler>,
    ) -> Self {
        Self {
            event_name,
            args,
            scheduler,
        }
    }
}

#[async_trait]
impl HookEvent for PushHookEvent {
    async fn perform(self: Box<Self>, _payload: Payload) -> anyhow::Result<Payload> {
        let args = &self.args;
        let outcomes = self
            .scheduler
            .poll_or_schedule(args)
            .await
            .with_context(|| format!("scheduling jobs for {} at {}", args.repo_uri, args.commit))?;

        info!(
            event = self.event_name,
            repo = %args.repo_uri,
            commit = %args.commit,
            triggered = outcomes.len(),
            "push processed"
        );

        Ok(triggered_result(
            self.event_name,
            [("commit", Value::from(args.commit.as_str()))],
            &outcomes,
        ))
    }
}
