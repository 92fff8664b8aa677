//! Scripted adjuster responses

use tracing::debug;

use core_kernel::{DomainPort, PortError};
use domain_dispatch::{DispatchSession, ResponseSimulator};

use crate::error::SimError;
use crate::seed::{self, ScriptedResponse};

/// Replays a fixed script of answers on every new session
#[derive(Debug, Clone)]
pub struct ScriptedResponder {
    script: Vec<ScriptedResponse>,
}

impl ScriptedResponder {
    pub fn new(script: Vec<ScriptedResponse>) -> Self {
        Self { script }
    }

    /// Two available in the first two seconds, one unavailable, the rest later
    pub fn demo() -> Self {
        Self::new(seed::demo_script())
    }

    pub fn script(&self) -> &[ScriptedResponse] {
        &self.script
    }
}

impl DomainPort for ScriptedResponder {}

impl ResponseSimulator for ScriptedResponder {
    fn attach(&self, session: &DispatchSession) -> Result<usize, PortError> {
        for step in &self.script {
            session
                .schedule_response(step.adjuster_id.clone(), step.outcome, step.delay)
                .map_err(|e| SimError::Scheduling(e.to_string()))?;
        }
        debug!(
            incident_id = %session.incident_id(),
            scheduled = self.script.len(),
            "Response script attached"
        );
        Ok(self.script.len())
    }
}
