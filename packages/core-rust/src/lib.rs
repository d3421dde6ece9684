//! Team Events Core: event names, payload codec, and typed event arguments.

pub mod args;
pub mod error;
pub mod event_names;
pub mod payload;
pub mod samples;

pub use args::{GitCodePushedEventArgs, PullRequestMergeCommitCreatedEventArgs};
pub use error::{PayloadError, ValidationError};
pub use payload::{parse_payload, serialize_payload, Payload};
