//! Dispatch Domain Ports
//!
//! External capabilities the dispatch flow depends on:
//!
//! - `AdjusterDirectory`: who can respond to a loss location
//! - `OutboundChannel`: SMS and voice calls to adjusters
//! - `AssignmentDesk`: the system of record that accepts an assignment
//! - `ResponseSimulator`: feeds scripted answers into a session for demos
//!
//! ```rust,ignore
//! let candidates = directory.candidates_near("Los Angeles, CA", radius).await?;
//! let message = outbound.send_sms(&adjuster, &alert_text(&incident)).await?;
//! desk.confirm(incident.id, &adjuster.id, &metadata).await?;
//! ```

use async_trait::async_trait;

use core_kernel::{AdjusterId, Distance, DomainPort, IncidentId, OperationMetadata, PortError};

use crate::adjuster::Adjuster;
use crate::communication::Message;
use crate::session::DispatchSession;

#[async_trait]
pub trait AdjusterDirectory: DomainPort {
    /// Adjusters within `radius` of `location`, nearest first
    async fn candidates_near(
        &self,
        location: &str,
        radius: Distance,
    ) -> Result<Vec<Adjuster>, PortError>;
}

#[async_trait]
pub trait OutboundChannel: DomainPort {
    /// Sends an SMS, returning the log entry for it
    async fn send_sms(&self, adjuster: &Adjuster, content: &str) -> Result<Message, PortError>;

    /// Places a call, returning the log entry for it
    async fn place_call(&self, adjuster: &Adjuster) -> Result<Message, PortError>;
}

#[async_trait]
pub trait AssignmentDesk: DomainPort {
    async fn confirm(
        &self,
        incident_id: IncidentId,
        adjuster_id: &AdjusterId,
        metadata: &OperationMetadata,
    ) -> Result<(), PortError>;
}

pub trait ResponseSimulator: DomainPort {
    /// Schedules responses on a fresh session, returning how many
    fn attach(&self, session: &DispatchSession) -> Result<usize, PortError>;
}
