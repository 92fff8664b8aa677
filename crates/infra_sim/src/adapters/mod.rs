//! Simulated adapters
//!
//! Every adapter here implements a domain port without leaving the process.
//! `SimulatedWorld` wires a consistent set of them from one
//! `SimulationConfig`.

pub mod directory;
pub mod outbound;
pub mod desk;
pub mod store;
pub mod responder;

pub use directory::StaticAdjusterDirectory;
pub use outbound::SimulatedOutboundChannel;
pub use desk::SimulatedAssignmentDesk;
pub use store::InMemoryIncidentStore;
pub use responder::ScriptedResponder;

use std::sync::Arc;

use core_kernel::{Clock, HealthCheckable};
use domain_dispatch::{DispatchPorts, ResponseSimulator};

use crate::config::SimulationConfig;

/// A full set of simulated adapters
pub struct SimulatedWorld {
    pub directory: Arc<StaticAdjusterDirectory>,
    pub outbound: Arc<SimulatedOutboundChannel>,
    pub desk: Arc<SimulatedAssignmentDesk>,
    pub store: Arc<InMemoryIncidentStore>,
    pub responder: Option<Arc<ScriptedResponder>>,
}

impl SimulatedWorld {
    pub fn new(config: &SimulationConfig, clock: Arc<dyn Clock>) -> Self {
        let store = if config.seed_archive {
            InMemoryIncidentStore::seeded()
        } else {
            InMemoryIncidentStore::new()
        };

        Self {
            directory: Arc::new(StaticAdjusterDirectory::demo()),
            outbound: Arc::new(SimulatedOutboundChannel::new(clock)),
            desk: Arc::new(
                SimulatedAssignmentDesk::new(config.assignment_latency())
                    .failing(config.fail_assignments),
            ),
            store: Arc::new(store.with_latency(config.intake_latency())),
            responder: config
                .simulate_responses
                .then(|| Arc::new(ScriptedResponder::demo())),
        }
    }

    /// Ports for `DispatchService::new`
    pub fn ports(&self) -> DispatchPorts {
        DispatchPorts {
            store: self.store.clone(),
            directory: self.directory.clone(),
            outbound: self.outbound.clone(),
            desk: self.desk.clone(),
        }
    }

    pub fn simulator(&self) -> Option<Arc<dyn ResponseSimulator>> {
        self.responder
            .clone()
            .map(|responder| responder as Arc<dyn ResponseSimulator>)
    }

    /// Adapters that answer readiness checks
    pub fn health_checks(&self) -> Vec<Arc<dyn HealthCheckable>> {
        vec![
            self.store.clone() as Arc<dyn HealthCheckable>,
            self.directory.clone() as Arc<dyn HealthCheckable>,
            self.outbound.clone() as Arc<dyn HealthCheckable>,
            self.desk.clone() as Arc<dyn HealthCheckable>,
        ]
    }
}
