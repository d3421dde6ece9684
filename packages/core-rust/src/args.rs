//! Typed arguments extracted from push and pull-request notifications.
//!
//! Service hooks wrap the interesting data in a `resource` envelope whose
//! layout differs per event type. These structs are the flattened form that
//! downstream build scheduling works with. All structs use
//! `#[serde(rename_all = "camelCase")]` so they serialize in the same shape the
//! `gitPush` event accepts as input.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ValidationError;
use crate::payload::{
    optional_int, optional_str, required_positive_int, required_str, Payload,
};

const HEADS_PREFIX: &str = "refs/heads/";
const GIT_SEGMENT: &str = "/_git/";

// ---------------------------------------------------------------------------
// GitCodePushedEventArgs
// ---------------------------------------------------------------------------

/// Where code was pushed, which commit it produced, and who pushed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitCodePushedEventArgs {
    /// Team project collection URL, always ending in `/`.
    pub collection_uri: String,
    /// Git remote URL of the repository.
    pub repo_uri: String,
    /// Team project name.
    pub project_id: String,
    /// Repository name.
    pub repo_id: String,
    /// Commit the pushed ref now points at.
    pub commit: String,
    /// Display name of the pusher; empty when the notification omits it.
    #[serde(default)]
    pub pushed_by: String,
    /// Branch name without the `refs/heads/` prefix, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_branch: Option<String>,
}

impl GitCodePushedEventArgs {
    /// Extracts arguments from a `git.push` service hook notification.
    ///
    /// Only the first entry of `resource.refUpdates` is considered.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first missing or malformed field.
    pub fn from_code_pushed_payload(payload: &Payload) -> Result<Self, ValidationError> {
        let repo_uri = required_str(payload, "resource.repository.remoteUrl")?;
        let repo_id = required_str(payload, "resource.repository.name")?;
        let project_id = required_str(payload, "resource.repository.project.name")?;
        let ref_name = required_str(payload, "resource.refUpdates.0.name")?;
        let commit = required_str(payload, "resource.refUpdates.0.newObjectId")?;
        let pushed_by = optional_str(payload, "resource.pushedBy.displayName")?;

        Ok(Self {
            collection_uri: collection_uri_from_remote_url(
                repo_uri,
                project_id,
                "resource.repository.remoteUrl",
            )?,
            repo_uri: repo_uri.to_string(),
            project_id: project_id.to_string(),
            repo_id: repo_id.to_string(),
            commit: commit.to_string(),
            pushed_by: pushed_by.unwrap_or_default().to_string(),
            target_branch: Some(branch_name(ref_name).to_string()),
        })
    }

    /// Reads arguments posted directly as a flat object (the `gitPush` form).
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first missing or malformed field.
    pub fn from_push_args(payload: &Payload) -> Result<Self, ValidationError> {
        let collection_uri = required_str(payload, "collectionUri")?;
        let target_branch = optional_str(payload, "targetBranch")?
            .filter(|b| !b.trim().is_empty())
            .map(|b| branch_name(b).to_string());

        Ok(Self {
            collection_uri: with_trailing_slash(collection_uri),
            repo_uri: required_str(payload, "repoUri")?.to_string(),
            project_id: required_str(payload, "projectId")?.to_string(),
            repo_id: required_str(payload, "repoId")?.to_string(),
            commit: required_str(payload, "commit")?.to_string(),
            pushed_by: optional_str(payload, "pushedBy")?
                .unwrap_or_default()
                .to_string(),
            target_branch,
        })
    }
}

// ---------------------------------------------------------------------------
// PullRequestMergeCommitCreatedEventArgs
// ---------------------------------------------------------------------------

/// A pull request's merge commit plus the repository it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestMergeCommitCreatedEventArgs {
    /// Repository coordinates; `commit` is the merge commit and
    /// `target_branch` the branch the pull request merges into.
    #[serde(flatten)]
    pub push: GitCodePushedEventArgs,
    /// Pull request number.
    pub pull_request_id: u64,
    /// Pull request iteration, `-1` when the notification does not carry one.
    pub iteration_id: i64,
}

impl PullRequestMergeCommitCreatedEventArgs {
    /// Extracts arguments from a `git.pullrequest.merged` notification.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first missing or malformed field.
    pub fn from_merge_commit_payload(payload: &Payload) -> Result<Self, ValidationError> {
        let repo_uri = required_str(payload, "resource.repository.remoteUrl")?;
        let repo_id = required_str(payload, "resource.repository.name")?;
        let project_id = required_str(payload, "resource.repository.project.name")?;
        let pull_request_id = required_positive_int(payload, "resource.pullRequestId")?;
        let commit = required_str(payload, "resource.lastMergeCommit.commitId")?;
        let target_ref = required_str(payload, "resource.targetRefName")?;
        let created_by = optional_str(payload, "resource.createdBy.displayName")?;
        let iteration_id = optional_int(payload, "resource.iterationId")?.unwrap_or(-1);

        Ok(Self {
            push: GitCodePushedEventArgs {
                collection_uri: collection_uri_from_remote_url(
                    repo_uri,
                    project_id,
                    "resource.repository.remoteUrl",
                )?,
                repo_uri: repo_uri.to_string(),
                project_id: project_id.to_string(),
                repo_id: repo_id.to_string(),
                commit: commit.to_string(),
                pushed_by: created_by.unwrap_or_default().to_string(),
                target_branch: Some(branch_name(target_ref).to_string()),
            },
            pull_request_id,
            iteration_id,
        })
    }
}

// ---------------------------------------------------------------------------
// URL and ref helpers
// ---------------------------------------------------------------------------

/// Strips `refs/heads/` from a ref name; other refs (tags, notes) are kept whole.
#[must_use]
pub fn branch_name(ref_name: &str) -> &str {
    ref_name.strip_prefix(HEADS_PREFIX).unwrap_or(ref_name)
}

/// Derives the collection URL from a Git remote URL.
///
/// Remote URLs look like `<collection>/<project>/_git/<repo>` or, when the
/// repository shares the project's name, `<collection>/_git/<repo>`.
fn collection_uri_from_remote_url(
    remote_url: &str,
    project: &str,
    path: &str,
) -> Result<String, ValidationError> {
    let Some(idx) = remote_url.find(GIT_SEGMENT) else {
        return Err(ValidationError::invalid(
            path,
            "a Git remote URL containing '/_git/'",
        ));
    };
    let before = &remote_url[..idx];
    let project_suffix = format!("/{project}");
    let start = before.len().saturating_sub(project_suffix.len());
    let collection = match before.get(start..) {
        Some(tail) if start > 0 && tail.eq_ignore_ascii_case(&project_suffix) => &before[..start],
        _ => {
            debug!(remote_url, project, "remote URL has no project segment");
            before
        }
    };
    Ok(with_trailing_slash(collection))
}

fn with_trailing_slash(uri: &str) -> String {
    if uri.ends_with('/') {
        uri.to_string()
    } else {
        format!("{uri}/")
    }
}
