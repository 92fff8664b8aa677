//! Core Kernel - Foundational types shared by the dispatch domains
//!
//! This crate provides the building blocks used across all domain modules:
//! - Strongly-typed identifiers for incidents, adjusters and assignments
//! - Distances with precise decimal arithmetic and ETA derivation
//! - Clocks, relative time labels and timezone formatting
//! - Port error types and marker traits for adapters
//! - In-flight guards for operations that must not be re-entered

pub mod distance;
pub mod temporal;
pub mod identifiers;
pub mod error;
pub mod ports;
pub mod guard;

pub use distance::{Distance, DistanceError};
pub use temporal::{Clock, SystemClock, ManualClock, RelativeTime, Timezone, TemporalError};
pub use identifiers::{IncidentId, AdjusterId, AssignmentId, MessageId};
pub use error::CoreError;
pub use ports::{
    PortError, DomainPort, AdapterHealth, HealthCheckable, HealthCheckResult,
    OperationMetadata,
};
pub use guard::{InFlightGuard, InFlightPermit, AlreadyInFlight};
