//! Static adjuster directory

use async_trait::async_trait;
use tracing::{debug, instrument};

use core_kernel::{
    Distance, DomainPort, HealthCheckResult, HealthCheckable, PortError,
};
use domain_dispatch::{Adjuster, AdjusterDirectory};

use crate::seed;

/// Directory backed by a fixed list
///
/// Distances are taken as-is; the loss location only appears in logs.
#[derive(Debug, Clone)]
pub struct StaticAdjusterDirectory {
    adjusters: Vec<Adjuster>,
}

impl StaticAdjusterDirectory {
    pub fn new(adjusters: Vec<Adjuster>) -> Self {
        Self { adjusters }
    }

    /// The five demo adjusters
    pub fn demo() -> Self {
        Self::new(seed::demo_roster())
    }
}

impl DomainPort for StaticAdjusterDirectory {}

#[async_trait]
impl HealthCheckable for StaticAdjusterDirectory {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("static-adjuster-directory")
    }
}

#[async_trait]
impl AdjusterDirectory for StaticAdjusterDirectory {
    #[instrument(skip(self), fields(radius = %radius))]
    async fn candidates_near(
        &self,
        location: &str,
        radius: Distance,
    ) -> Result<Vec<Adjuster>, PortError> {
        let candidates: Vec<Adjuster> = self
            .adjusters
            .iter()
            .filter(|a| a.distance.within(radius))
            .cloned()
            .collect();
        debug!(count = candidates.len(), "Candidates found");
        Ok(candidates)
    }
}
