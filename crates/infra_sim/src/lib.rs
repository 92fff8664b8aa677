//! Simulation Infrastructure Layer
//!
//! Adapters that stand in for the real telephony provider, assignment system
//! and incident database, so the whole dispatch flow can run in one process.
//!
//! # Architecture
//!
//! Each adapter implements one domain port:
//! - `StaticAdjusterDirectory` -> `AdjusterDirectory`
//! - `SimulatedOutboundChannel` -> `OutboundChannel`
//! - `SimulatedAssignmentDesk` -> `AssignmentDesk`
//! - `InMemoryIncidentStore` -> `IncidentStore`
//! - `ScriptedResponder` -> `ResponseSimulator`
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_sim::{SimulationConfig, SimulatedWorld};
//!
//! let world = SimulatedWorld::new(SimulationConfig::default(), clock);
//! let service = DispatchService::new(world.ports(), notifier, clock, settings);
//! ```

pub mod config;
pub mod error;
pub mod seed;
pub mod adapters;

pub use config::SimulationConfig;
pub use error::SimError;
pub use adapters::{
    InMemoryIncidentStore, ScriptedResponder, SimulatedAssignmentDesk, SimulatedOutboundChannel,
    SimulatedWorld, StaticAdjusterDirectory,
};
