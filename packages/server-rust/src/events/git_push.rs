//! `gitPush`: push arguments posted as a flat object.

use std::sync::Arc;

use team_events_core::{event_names, samples, GitCodePushedEventArgs, Payload, ValidationError};

use super::git_code_pushed::PushHookEvent;
use super::{HookEvent, HookEventFactory};
use crate::traits::BuildScheduler;

/// Factory for `gitPush` events.
pub struct GitPushHookEventFactory {
    scheduler: Arc<dyn BuildScheduler>,
}

impl GitPushHookEventFactory {
    #[must_use]
    pub fn new(scheduler: Arc<dyn BuildScheduler>) -> Self {
        Self { scheduler }
    }
}

impl HookEventFactory for GitPushHookEventFactory {
    fn create(&self, payload: &Payload) -> Result<Box<dyn HookEvent>, ValidationError> {
        let args = GitCodePushedEventArgs::from_push_args(payload)?;
        Ok(Box::new(PushHookEvent::new(
            event_names::GIT_PUSH,
            args,
            Arc::clone(&self.scheduler),
        )))
    }

    fn sample_request_payload(&self) -> &str {
        samples::GIT_PUSH
    }
}
