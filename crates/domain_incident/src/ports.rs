//! Incident Domain Ports
//!
//! `IncidentStore` is where incidents are written on intake and updated on
//! status or assignment changes. It also exposes the archive of incidents
//! that predate the running process, already summarized as history rows.
//!
//! ```rust,ignore
//! let store: Arc<dyn IncidentStore> = Arc::new(InMemoryIncidentStore::default());
//! store.save(&incident).await?;
//! let loaded = store.get(incident.id).await?;
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, IncidentId, PortError};

use crate::history::HistoryEntry;
use crate::incident::{Incident, IncidentStatus};

#[async_trait]
pub trait IncidentStore: DomainPort {
    /// Inserts or replaces an incident
    async fn save(&self, incident: &Incident) -> Result<(), PortError>;

    /// Loads an incident, `PortError::NotFound` if absent
    async fn get(&self, id: IncidentId) -> Result<Incident, PortError>;

    /// Lists incidents, optionally by status, oldest first
    async fn list(&self, status: Option<IncidentStatus>) -> Result<Vec<Incident>, PortError>;

    /// History rows for archived incidents
    async fn archived(&self) -> Result<Vec<HistoryEntry>, PortError>;
}
