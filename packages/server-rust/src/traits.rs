use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use team_events_core::{GitCodePushedEventArgs, PullRequestMergeCommitCreatedEventArgs};

/// What was done to a single job in reaction to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerKind {
    /// The job's SCM polling was scheduled; it builds only if polling finds changes.
    PollingScheduled,
    /// A build of the job was queued directly.
    BuildScheduled,
}

/// One job reacting to one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerOutcome {
    /// Name of the job that was triggered.
    pub job: String,
    /// How it was triggered.
    pub kind: TriggerKind,
}

impl TriggerOutcome {
    #[must_use]
    pub fn polling(job: impl Into<String>) -> Self {
        Self {
            job: job.into(),
            kind: TriggerKind::PollingScheduled,
        }
    }

    #[must_use]
    pub fn build(job: impl Into<String>) -> Self {
        Self {
            job: job.into(),
            kind: TriggerKind::BuildScheduled,
        }
    }
}

impl fmt::Display for TriggerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TriggerKind::PollingScheduled => write!(f, "Scheduled polling of {}", self.job),
            TriggerKind::BuildScheduled => write!(f, "Scheduled {}", self.job),
        }
    }
}

/// Downstream build system the push and pull-request events act upon.
/// Implementations: `JobCatalog` (configured job list), test doubles.
#[async_trait]
pub trait BuildScheduler: Send + Sync {
    /// React to pushed code: poll or build every job watching the repository and branch.
    async fn poll_or_schedule(
        &self,
        args: &GitCodePushedEventArgs,
    ) -> anyhow::Result<Vec<TriggerOutcome>>;

    /// React to a pull request merge commit: build every job watching the target branch.
    async fn schedule_pull_request(
        &self,
        args: &PullRequestMergeCommitCreatedEventArgs,
    ) -> anyhow::Result<Vec<TriggerOutcome>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_messages() {
        assert_eq!(
            TriggerOutcome::polling("app-ci").to_string(),
            "Scheduled polling of app-ci"
        );
        assert_eq!(TriggerOutcome::build("app-pr").to_string(), "Scheduled app-pr");
    }

    #[test]
    fn outcome_serializes_kind_camel_case() {
        let value = serde_json::to_value(TriggerOutcome::polling("x")).unwrap();
        assert_eq!(value["kind"], "pollingScheduled");
        assert_eq!(value["job"], "x");
    }
}
