//! `pullRequestMergeCommitCreated`: builds the merge commit of a pull request.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use team_events_core::{
    event_names, samples, Payload, PullRequestMergeCommitCreatedEventArgs, ValidationError,
};
use tracing::info;

use super::{triggered_result, HookEvent, HookEventFactory};
use crate::traits::BuildScheduler;

/// Factory for `pullRequestMergeCommitCreated` events.
pub struct PullRequestMergeCommitCreatedHookEventFactory {
    scheduler: Arc<dyn BuildScheduler>,
}

impl PullRequestMergeCommitCreatedHookEventFactory {
    #[must_use]
    pub fn new(scheduler: Arc<dyn BuildScheduler>) -> Self {
        Self { scheduler }
    }
}

impl HookEventFactory for PullRequestMergeCommitCreatedHookEventFactory {
    fn create(&self, payload: &Payload) -> Result<Box<dyn HookEvent>, ValidationError> {
        let args = PullRequestMergeCommitCreatedEventArgs::from_merge_commit_payload(payload)?;
        Ok(Box::new(PullRequestMergeCommitCreatedHookEvent {
            args,
            scheduler: Arc::clone(&self.scheduler),
        }))
    }

    fn sample_request_payload(&self) -> &str {
        samples::PULL_REQUEST_MERGE_COMMIT_CREATED
    }
}

/// Schedules builds of the jobs watching the pull request's target branch.
pub struct PullRequestMergeCommitCreatedHookEvent {
    args: PullRequestMergeCommitCreatedEventArgs,
    scheduler: Arc<dyn BuildScheduler>,
}

#[async_trait]
impl HookEvent for PullRequestMergeCommitCreatedHookEvent {
    async fn perform(self: Box<Self>, _payload: Payload) -> anyhow::Result<Payload> {
        let args = &self.args;
        let outcomes = self
            .scheduler
            .schedule_pull_request(args)
            .await
            .with_context(|| {
                format!(
                    "scheduling builds for pull request {} at {}",
                    args.pull_request_id, args.push.commit
                )
            })?;

        info!(
            repo = %args.push.repo_uri,
            pull_request = args.pull_request_id,
            commit = %args.push.commit,
            triggered = outcomes.len(),
            "pull request merge commit processed"
        );

        Ok(triggered_result(
            event_names::PULL_REQUEST_MERGE_COMMIT_CREATED,
            [
                ("pullRequestId", Value::from(args.pull_request_id)),
                ("commit", Value::from(args.push.commit.as_str())),
            ],
            &outcomes,
        ))
    }
}
