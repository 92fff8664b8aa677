//! Simulated SMS and voice channel

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument};

use core_kernel::{
    AdjusterId, Clock, DomainPort, HealthCheckResult, HealthCheckable, PortError,
};
use domain_dispatch::{Adjuster, Message, MessageStatus, OutboundChannel};

use crate::error::SimError;

/// Length logged for an answered call
pub const CALL_DURATION_SECS: u32 = 45;

/// Pretends to reach every adjuster instantly
pub struct SimulatedOutboundChannel {
    clock: Arc<dyn Clock>,
    unreachable: HashSet<AdjusterId>,
    unanswered: HashSet<AdjusterId>,
}

impl SimulatedOutboundChannel {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            unreachable: HashSet::new(),
            unanswered: HashSet::new(),
        }
    }

    /// Every send to this adjuster fails
    pub fn unreachable(mut self, id: impl Into<AdjusterId>) -> Self {
        self.unreachable.insert(id.into());
        self
    }

    /// Calls to this adjuster ring out
    pub fn unanswered(mut self, id: impl Into<AdjusterId>) -> Self {
        self.unanswered.insert(id.into());
        self
    }

    fn check_reachable(&self, adjuster: &Adjuster) -> Result<(), PortError> {
        if self.unreachable.contains(&adjuster.id) {
            return Err(SimError::injected(format!("carrier for {}", adjuster.phone)).into());
        }
        Ok(())
    }
}

impl DomainPort for SimulatedOutboundChannel {}

#[async_trait]
impl HealthCheckable for SimulatedOutboundChannel {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("simulated-outbound-channel")
    }
}

#[async_trait]
impl OutboundChannel for SimulatedOutboundChannel {
    #[instrument(skip(self, adjuster, content), fields(adjuster_id = %adjuster.id))]
    async fn send_sms(&self, adjuster: &Adjuster, content: &str) -> Result<Message, PortError> {
        self.check_reachable(adjuster)?;
        debug!(phone = %adjuster.phone, "SMS sent");
        Ok(Message::sms(adjuster, content, self.clock.now()))
    }

    #[instrument(skip(self, adjuster), fields(adjuster_id = %adjuster.id))]
    async fn place_call(&self, adjuster: &Adjuster) -> Result<Message, PortError> {
        self.check_reachable(adjuster)?;
        let now = self.clock.now();
        let message = if self.unanswered.contains(&adjuster.id) {
            Message::call(adjuster, None, now).with_status(MessageStatus::NoAnswer)
        } else {
            Message::call(adjuster, Some(CALL_DURATION_SECS), now)
        };
        debug!(status = %message.status, "Call placed");
        Ok(message)
    }
}
