//! User-facing notifications
//!
//! The roster and the service announce things a dispatcher should see
//! ("New adjuster response received"). Where those announcements go is up
//! to the injected `Notifier`.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use core_kernel::IncidentId;

pub const RESPONSE_RECEIVED: &str = "New adjuster response received";
pub const ASSIGNMENT_CONFIRMED: &str = "Adjuster assigned successfully!";
pub const ASSIGNMENT_FAILED: &str = "Failed to assign adjuster. Please try again.";
pub const INCIDENT_REPORTED: &str = "Incident reported successfully!";
pub const INTAKE_INCOMPLETE: &str = "Please fill in all required fields";
pub const INTAKE_FAILED: &str = "Failed to submit incident. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub incident_id: Option<IncidentId>,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self::with_level(NotificationLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::with_level(NotificationLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_level(NotificationLevel::Error, message)
    }

    pub fn for_incident(mut self, incident_id: IncidentId) -> Self {
        self.incident_id = Some(incident_id);
        self
    }

    fn with_level(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            incident_id: None,
        }
    }
}

/// Capability to surface a notification to whoever is watching
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let incident = notification
            .incident_id
            .map(|id| id.to_string())
            .unwrap_or_default();
        match notification.level {
            NotificationLevel::Error => {
                tracing::warn!(incident_id = %incident, "{}", notification.message)
            }
            _ => tracing::info!(
                incident_id = %incident,
                level = ?notification.level,
                "{}",
                notification.message
            ),
        }
    }
}

/// Keeps every notification in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far, oldest first
    pub fn received(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of notifications carrying exactly `message`
    pub fn count(&self, message: &str) -> usize {
        self.received
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|n| n.message == message)
            .count()
    }

    /// Most recent notifications, newest first
    pub fn recent(&self, limit: usize) -> Vec<Notification> {
        let received = self.received.lock().unwrap_or_else(|e| e.into_inner());
        received.iter().rev().take(limit).cloned().collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.received
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification);
    }
}
