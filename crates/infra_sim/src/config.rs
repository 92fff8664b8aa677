//! Simulation settings

use serde::Deserialize;
use std::time::Duration;

/// Knobs for the simulated adapters
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Delay applied to every incident save
    pub intake_latency_ms: u64,
    /// Delay before the assignment desk answers
    pub assignment_latency_ms: u64,
    /// Whether new sessions get scripted adjuster responses
    pub simulate_responses: bool,
    /// Makes the assignment desk refuse every confirmation
    pub fail_assignments: bool,
    /// Seeds the store with the demo archive
    pub seed_archive: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            intake_latency_ms: 1000,
            assignment_latency_ms: 1500,
            simulate_responses: true,
            fail_assignments: false,
            seed_archive: true,
        }
    }
}

impl SimulationConfig {
    /// No latency, no scripted responses; for tests
    pub fn instant() -> Self {
        Self {
            intake_latency_ms: 0,
            assignment_latency_ms: 0,
            simulate_responses: false,
            ..Self::default()
        }
    }

    pub fn intake_latency(&self) -> Duration {
        Duration::from_millis(self.intake_latency_ms)
    }

    pub fn assignment_latency(&self) -> Duration {
        Duration::from_millis(self.assignment_latency_ms)
    }
}
