//! API configuration

use serde::Deserialize;

use core_kernel::{CoreError, Distance, Timezone};
use domain_dispatch::DispatchSettings;
use infra_sim::SimulationConfig;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    /// IANA zone used for "today" and local timestamps
    pub timezone: String,
    /// Adjusters farther than this are not notified
    pub search_radius_miles: u32,
    /// Also call each adjuster after texting them
    pub call_adjusters: bool,
    /// Simulated save delay in milliseconds
    pub intake_latency_ms: u64,
    /// Simulated assignment desk delay in milliseconds
    pub assignment_latency_ms: u64,
    /// Play scripted adjuster responses on new incidents
    pub simulate_responses: bool,
    /// Make the simulated assignment desk refuse every request
    pub fail_assignments: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let simulation = SimulationConfig::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            timezone: "UTC".to_string(),
            search_radius_miles: 100,
            call_adjusters: true,
            intake_latency_ms: simulation.intake_latency_ms,
            assignment_latency_ms: simulation.assignment_latency_ms,
            simulate_responses: simulation.simulate_responses,
            fail_assignments: simulation.fail_assignments,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `DISPATCH_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("DISPATCH"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn timezone(&self) -> Result<Timezone, CoreError> {
        Ok(Timezone::parse(&self.timezone)?)
    }

    pub fn dispatch_settings(&self) -> Result<DispatchSettings, CoreError> {
        if self.search_radius_miles == 0 {
            return Err(CoreError::configuration("search radius must be positive"));
        }
        Ok(DispatchSettings {
            search_radius: Distance::whole_miles(self.search_radius_miles),
            call_adjusters: self.call_adjusters,
            timezone: self.timezone()?,
        })
    }

    pub fn simulation(&self) -> SimulationConfig {
        SimulationConfig {
            intake_latency_ms: self.intake_latency_ms,
            assignment_latency_ms: self.assignment_latency_ms,
            simulate_responses: self.simulate_responses,
            fail_assignments: self.fail_assignments,
            seed_archive: true,
        }
    }

    /// Defaults with every simulated delay removed
    pub fn for_tests() -> Self {
        Self {
            intake_latency_ms: 0,
            assignment_latency_ms: 0,
            simulate_responses: false,
            ..Self::default()
        }
    }
}
