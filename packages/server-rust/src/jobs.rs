//! The configured job list and the default [`BuildScheduler`].
//!
//! Jobs are read from a JSON array:
//!
//! ```json
//! [
//!   { "name": "fabrikam-ci", "repositoryUrl": "https://host/DefaultCollection/_git/Fabrikam",
//!     "branches": ["master"], "trigger": "poll" }
//! ]
//! ```

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context as _;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use team_events_core::args::branch_name;
use team_events_core::{GitCodePushedEventArgs, PullRequestMergeCommitCreatedEventArgs};
use tracing::{debug, info};

use crate::traits::{BuildScheduler, TriggerOutcome};

/// How a job reacts to pushed code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobTrigger {
    /// Schedule SCM polling; the job builds only if polling sees changes.
    #[default]
    Poll,
    /// Queue a build straight away.
    Build,
}

/// One job watching a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDefinition {
    pub name: String,
    pub repository_url: String,
    /// Branch names, with or without `refs/heads/`. Empty or `*` means all.
    #[serde(default)]
    pub branches: Vec<String>,
    #[serde(default)]
    pub trigger: JobTrigger,
}

impl JobDefinition {
    fn watches_repository(&self, repo_uri: &str) -> bool {
        normalize_repository_url(&self.repository_url) == normalize_repository_url(repo_uri)
    }

    /// An event without a branch matches every branch filter.
    fn watches_branch(&self, branch: Option<&str>) -> bool {
        let Some(branch) = branch else {
            return true;
        };
        let branch = branch_name(branch);
        self.branches.is_empty()
            || self
                .branches
                .iter()
                .any(|b| b == "*" || branch_name(b) == branch)
    }

    fn matches(&self, args: &GitCodePushedEventArgs) -> bool {
        self.watches_repository(&args.repo_uri) && self.watches_branch(args.target_branch.as_deref())
    }
}

/// Lower-cases and strips a trailing `/` and `.git`.
fn normalize_repository_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    let lower = url.to_ascii_lowercase();
    lower
        .strip_suffix(".git")
        .map_or(lower.clone(), str::to_string)
}

// ---------------------------------------------------------------------------
// JobCatalog
// ---------------------------------------------------------------------------

/// A fixed list of jobs; schedules whichever ones an event concerns.
#[derive(Debug, Clone, Default)]
pub struct JobCatalog {
    jobs: Vec<JobDefinition>,
}

impl JobCatalog {
    /// Builds a catalog from definitions.
    ///
    /// # Errors
    ///
    /// Fails if a job has a blank name or repository URL, or if two jobs
    /// share a name.
    pub fn new(jobs: Vec<JobDefinition>) -> anyhow::Result<Self> {
        let mut seen = HashSet::new();
        for job in &jobs {
            anyhow::ensure!(!job.name.trim().is_empty(), "job with a blank name");
            anyhow::ensure!(
                !job.repository_url.trim().is_empty(),
                "job '{}' has a blank repositoryUrl",
                job.name
            );
            anyhow::ensure!(seen.insert(job.name.as_str()), "duplicate job '{}'", job.name);
        }
        Ok(Self { jobs })
    }

    /// Loads the catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, is not a JSON array of jobs, or
    /// violates the checks of [`JobCatalog::new`].
    pub async fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading job file {}", path.display()))?;
        let jobs: Vec<JobDefinition> = serde_json::from_str(&text)
            .with_context(|| format!("parsing job file {}", path.display()))?;
        let catalog =
            Self::new(jobs).with_context(|| format!("invalid job file {}", path.display()))?;
        info!(path = %path.display(), jobs = catalog.len(), "loaded job catalog");
        Ok(catalog)
    }

    #[must_use]
    pub fn jobs(&self) -> &[JobDefinition] {
        &self.jobs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    fn matching<'a>(
        &'a self,
        args: &'a GitCodePushedEventArgs,
    ) -> impl Iterator<Item = &'a JobDefinition> + 'a {
        self.jobs.iter().filter(move |job| job.matches(args))
    }
}

#[async_trait]
impl BuildScheduler for JobCatalog {
    async fn poll_or_schedule(
        &self,
        args: &GitCodePushedEventArgs,
    ) -> anyhow::Result<Vec<TriggerOutcome>> {
        let outcomes: Vec<TriggerOutcome> = self
            .matching(args)
            .map(|job| match job.trigger {
                JobTrigger::Poll => TriggerOutcome::polling(&job.name),
                JobTrigger::Build => TriggerOutcome::build(&job.name),
            })
            .collect();

        if outcomes.is_empty() {
            debug!(repo = %args.repo_uri, "no job watches pushed repository");
        }
        for outcome in &outcomes {
            info!(
                job = %outcome.job,
                kind = ?outcome.kind,
                repo = %args.repo_uri,
                commit = %args.commit,
                pushed_by = %args.pushed_by,
                "{outcome}"
            );
        }
        Ok(outcomes)
    }

    async fn schedule_pull_request(
        &self,
        args: &PullRequestMergeCommitCreatedEventArgs,
    ) -> anyhow::Result<Vec<TriggerOutcome>> {
        let outcomes: Vec<TriggerOutcome> = self
            .matching(&args.push)
            .map(|job| TriggerOutcome::build(&job.name))
            .collect();

        for outcome in &outcomes {
            info!(
                job = %outcome.job,
                pull_request_id = args.pull_request_id,
                iteration_id = args.iteration_id,
                commit = %args.push.commit,
                "{outcome}"
            );
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const REPO: &str = "https://fabrikam.visualstudio.com/DefaultCollection/_git/Fabrikam";

    fn job(name: &str, branches: &[&str], trigger: JobTrigger) -> JobDefinition {
        JobDefinition {
            name: name.to_string(),
            repository_url: REPO.to_string(),
            branches: branches.iter().map(ToString::to_string).collect(),
            trigger,
        }
    }

    fn push(repo_uri: &str, target_branch: Option<&str>) -> GitCodePushedEventArgs {
        GitCodePushedEventArgs {
            collection_uri: "https://fabrikam.visualstudio.com/DefaultCollection/".to_string(),
            repo_uri: repo_uri.to_string(),
            project_id: "Fabrikam".to_string(),
            repo_id: "Fabrikam".to_string(),
            commit: "33b55f7cb7e7e245323987634f960cf4a6e6bc74".to_string(),
            pushed_by: "Jamal Hartnett".to_string(),
            target_branch: target_branch.map(str::to_string),
        }
    }

    #[test]
    fn repository_urls_compare_loosely() {
        assert_eq!(
            normalize_repository_url("https://Host/_git/Repo.git/"),
            "https://host/_git/repo"
        );
        let job = job("ci", &[], JobTrigger::Poll);
        assert!(job.watches_repository(&format!("{}.git", REPO.to_uppercase())));
        assert!(!job.watches_repository("https://fabrikam.visualstudio.com/_git/Other"));
    }

    #[test]
    fn branch_filters() {
        assert!(job("a", &[], JobTrigger::Poll).watches_branch(Some("refs/heads/dev")));
        assert!(job("a", &["*"], JobTrigger::Poll).watches_branch(Some("refs/heads/dev")));
        assert!(job("a", &["master"], JobTrigger::Poll).watches_branch(Some("refs/heads/master")));
        assert!(job("a", &["refs/heads/master"], JobTrigger::Poll).watches_branch(Some("master")));
        assert!(!job("a", &["master"], JobTrigger::Poll).watches_branch(Some("refs/heads/dev")));
        assert!(job("a", &["master"], JobTrigger::Poll).watches_branch(None));
    }

    #[tokio::test]
    async fn push_polls_or_builds_by_trigger() {
        let catalog = JobCatalog::new(vec![
            job("ci", &["master"], JobTrigger::Poll),
            job("deploy", &["master"], JobTrigger::Build),
            job("dev-only", &["dev"], JobTrigger::Build),
        ])
        .unwrap();

        let outcomes = catalog
            .poll_or_schedule(&push(REPO, Some("refs/heads/master")))
            .await
            .unwrap();

        assert_eq!(
            outcomes,
            vec![TriggerOutcome::polling("ci"), TriggerOutcome::build("deploy")]
        );
    }

    #[tokio::test]
    async fn pull_request_builds_every_match() {
        let catalog = JobCatalog::new(vec![
            job("ci", &[], JobTrigger::Poll),
            job("release", &["release"], JobTrigger::Poll),
        ])
        .unwrap();
        let args = PullRequestMergeCommitCreatedEventArgs {
            push: push(REPO, Some("refs/heads/master")),
            pull_request_id: 1,
            iteration_id: -1,
        };

        let outcomes = catalog.schedule_pull_request(&args).await.unwrap();
        assert_eq!(outcomes, vec![TriggerOutcome::build("ci")]);
    }

    #[tokio::test]
    async fn unrelated_repository_schedules_nothing() {
        let catalog = JobCatalog::new(vec![job("ci", &[], JobTrigger::Poll)]).unwrap();
        let outcomes = catalog
            .poll_or_schedule(&push("https://elsewhere/_git/x", None))
            .await
            .unwrap();
        assert!(outcomes.is_empty());
    }

    #[test]
    fn rejects_duplicate_and_blank_names() {
        let err = JobCatalog::new(vec![
            job("ci", &[], JobTrigger::Poll),
            job("ci", &[], JobTrigger::Build),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate job 'ci'"));

        assert!(JobCatalog::new(vec![job(" ", &[], JobTrigger::Poll)]).is_err());
    }

    #[tokio::test]
    async fn loads_json_file_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "ci", "repositoryUrl": "{REPO}"}},
                {{"name": "deploy", "repositoryUrl": "{REPO}", "branches": ["master"], "trigger": "build"}}]"#
        )
        .unwrap();

        let catalog = JobCatalog::from_file(file.path()).await.unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.jobs()[0].trigger, JobTrigger::Poll);
        assert!(catalog.jobs()[0].branches.is_empty());
        assert_eq!(catalog.jobs()[1].trigger, JobTrigger::Build);
    }

    #[tokio::test]
    async fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");

        let err = JobCatalog::from_file(&path).await.unwrap_err();
        assert!(format!("{err:#}").contains("jobs.json"));
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "ci"}}"#).unwrap();

        let err = JobCatalog::from_file(file.path()).await.unwrap_err();
        assert!(err.to_string().starts_with("parsing job file"));
    }
}
