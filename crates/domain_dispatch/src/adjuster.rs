//! Adjusters and their response state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{AdjusterId, Distance, RelativeTime};

/// How an adjuster answered a dispatch notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOutcome {
    Available,
    Unavailable,
}

impl fmt::Display for ResponseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResponseOutcome::Available => "available",
            ResponseOutcome::Unavailable => "unavailable",
        })
    }
}

/// Response state of one adjuster
///
/// An ETA exists only for `Available`, and a response timestamp exists for
/// both resolved states, so neither can be present while `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "response", rename_all = "snake_case")]
pub enum ResponseState {
    /// Notified, no answer yet
    Pending,
    Available {
        eta_minutes: u32,
        responded_at: DateTime<Utc>,
    },
    Unavailable {
        responded_at: DateTime<Utc>,
    },
}

impl ResponseState {
    pub fn is_pending(&self) -> bool {
        matches!(self, ResponseState::Pending)
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ResponseState::Available { .. })
    }

    pub fn eta_minutes(&self) -> Option<u32> {
        match self {
            ResponseState::Available { eta_minutes, .. } => Some(*eta_minutes),
            _ => None,
        }
    }

    pub fn responded_at(&self) -> Option<DateTime<Utc>> {
        match self {
            ResponseState::Pending => None,
            ResponseState::Available { responded_at, .. }
            | ResponseState::Unavailable { responded_at } => Some(*responded_at),
        }
    }

    /// The outcome, once resolved
    pub fn outcome(&self) -> Option<ResponseOutcome> {
        match self {
            ResponseState::Pending => None,
            ResponseState::Available { .. } => Some(ResponseOutcome::Available),
            ResponseState::Unavailable { .. } => Some(ResponseOutcome::Unavailable),
        }
    }
}

impl fmt::Display for ResponseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome() {
            None => f.write_str("pending"),
            Some(outcome) => outcome.fmt(f),
        }
    }
}

/// A candidate responder for an incident
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjuster {
    pub id: AdjusterId,
    pub name: String,
    pub phone: String,
    /// Distance from the loss location
    pub distance: Distance,
    pub(crate) state: ResponseState,
}

impl Adjuster {
    /// Creates a roster entry awaiting a response
    pub fn new(
        id: impl Into<AdjusterId>,
        name: impl Into<String>,
        phone: impl Into<String>,
        distance: Distance,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phone: phone.into(),
            distance,
            state: ResponseState::Pending,
        }
    }

    pub fn state(&self) -> ResponseState {
        self.state
    }

    pub fn eta_minutes(&self) -> Option<u32> {
        self.state.eta_minutes()
    }

    pub fn responded_at(&self) -> Option<DateTime<Utc>> {
        self.state.responded_at()
    }

    /// Label such as "just now" or "5 minutes ago"; `None` while pending
    pub fn response_time(&self, now: DateTime<Utc>) -> Option<String> {
        self.responded_at()
            .map(|at| RelativeTime::between(at, now).to_string())
    }

    /// Resolves a pending adjuster; resolved adjusters are left untouched
    pub(crate) fn resolve(&mut self, outcome: ResponseOutcome, at: DateTime<Utc>) -> bool {
        if !self.state.is_pending() {
            return false;
        }
        self.state = match outcome {
            ResponseOutcome::Available => ResponseState::Available {
                eta_minutes: self.distance.eta_minutes(),
                responded_at: at,
            },
            ResponseOutcome::Unavailable => ResponseState::Unavailable { responded_at: at },
        };
        true
    }
}
