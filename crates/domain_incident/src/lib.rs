//! Incident Domain
//!
//! This crate covers everything about an incident that does not depend on
//! adjusters: validating the intake form, the incident record and its
//! status lifecycle, and searching past incidents.
//!
//! # Incident Lifecycle
//!
//! ```text
//! Intake -> Active <-> Pending -> Closed
//!              \________________/
//! ```

pub mod intake;
pub mod incident;
pub mod events;
pub mod history;
pub mod ports;
pub mod error;

pub use intake::{IncidentReport, IntakeValidator, ValidationResult};
pub use incident::{Incident, IncidentStatus};
pub use events::IncidentEvent;
pub use history::{HistoryEntry, HistoryQuery};
pub use ports::IncidentStore;
pub use error::IncidentError;
