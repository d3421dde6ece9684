//! `ping`: connectivity check. Echoes the request document back.

use async_trait::async_trait;
use team_events_core::{samples, Payload, ValidationError};

use super::{HookEvent, HookEventFactory};

/// Factory for [`PingHookEvent`]. Accepts any JSON object.
#[derive(Debug, Clone, Copy, Default)]
pub struct PingHookEventFactory;

impl HookEventFactory for PingHookEventFactory {
    fn create(&self, _payload: &Payload) -> Result<Box<dyn HookEvent>, ValidationError> {
        Ok(Box::new(PingHookEvent))
    }

    fn sample_request_payload(&self) -> &str {
        samples::PING
    }
}

/// Acknowledges a ping by returning the payload unchanged.
#[derive(Debug)]
pub struct PingHookEvent;

#[async_trait]
impl HookEvent for PingHookEvent {
    async fn perform(self: Box<Self>, payload: Payload) -> anyhow::Result<Payload> {
        Ok(payload)
    }
}
