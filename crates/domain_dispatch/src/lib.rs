//! Dispatch Domain
//!
//! This crate models what happens after an incident is reported: a roster
//! of nearby adjusters is notified, each adjuster answers independently,
//! and one available adjuster is assigned.
//!
//! # Adjuster Response Lifecycle
//!
//! ```text
//! Pending -> Available   (terminal, carries ETA)
//!         -> Unavailable (terminal)
//! ```
//!
//! # Assignment
//!
//! ```text
//! Open -> Tentative -> Confirmed
//!             \-> Open (rolled back)
//! ```

pub mod adjuster;
pub mod roster;
pub mod assignment;
pub mod events;
pub mod notifier;
pub mod communication;
pub mod session;
pub mod dashboard;
pub mod ports;
pub mod service;
pub mod error;

pub use adjuster::{Adjuster, ResponseOutcome, ResponseState};
pub use roster::{AssignmentStart, ReportOutcome, Roster, RosterView};
pub use assignment::Assignment;
pub use events::RosterEvent;
pub use notifier::{Notification, NotificationLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use communication::{
    Channel, CommunicationLog, CommunicationSummary, Direction, Message, MessageStatus,
};
pub use session::{DispatchSession, SessionSnapshot};
pub use dashboard::{DashboardBadge, DashboardIncident, DashboardStats};
pub use ports::{AdjusterDirectory, AssignmentDesk, OutboundChannel, ResponseSimulator};
pub use service::{DispatchPorts, DispatchService, DispatchSettings, IncidentDetails};
pub use error::DispatchError;
