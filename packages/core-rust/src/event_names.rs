//! Names of the events the endpoint accepts.
//!
//! These are the path segments a service hook posts to, e.g.
//! `/team-events/gitCodePushed`. Matching is case-insensitive.

/// Connectivity check sent when a service hook subscription is created.
pub const PING: &str = "ping";

/// A `git.push` service hook notification.
pub const GIT_CODE_PUSHED: &str = "gitCodePushed";

/// Pre-digested push arguments posted directly (no service hook envelope).
pub const GIT_PUSH: &str = "gitPush";

/// A `git.pullrequest.merged` notification carrying a merge commit.
pub const PULL_REQUEST_MERGE_COMMIT_CREATED: &str = "pullRequestMergeCommitCreated";

/// Every built-in event name, in registration order.
pub const ALL: [&str; 4] = [
    PING,
    GIT_CODE_PUSHED,
    GIT_PUSH,
    PULL_REQUEST_MERGE_COMMIT_CREATED,
];
