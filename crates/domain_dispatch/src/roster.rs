//! The adjuster roster for one incident
//!
//! Every adjuster starts `Pending` and resolves exactly once. Assignment is
//! two-phase: `begin_assignment` marks the chosen adjuster tentatively so a
//! second request cannot slip in while the assignment desk is being
//! contacted, then `confirm_assignment` or `rollback_assignment` settles it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use core_kernel::{AdjusterId, Clock, IncidentId};

use crate::adjuster::{Adjuster, ResponseOutcome, ResponseState};
use crate::assignment::{Assignment, AssignmentSlot};
use crate::error::DispatchError;
use crate::events::RosterEvent;
use crate::notifier::{self, Notification, Notifier};

/// Result of reporting an adjuster response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportOutcome {
    /// The adjuster was pending and is now resolved
    Applied,
    /// The adjuster had already answered; nothing changed
    AlreadyResolved,
    /// No adjuster with that id is on the roster; nothing changed
    UnknownAdjuster,
}

/// What `begin_assignment` decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentStart {
    /// The adjuster is now marked tentatively; confirm or roll back next
    Tentative,
    /// The same adjuster was already confirmed; nothing to do
    AlreadyConfirmed(Assignment),
}

/// Roster partitioned by response state, each bucket in roster order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterView {
    pub available: Vec<Adjuster>,
    pub pending: Vec<Adjuster>,
    pub unavailable: Vec<Adjuster>,
    pub assigned: Option<AdjusterId>,
    pub tentative: Option<AdjusterId>,
}

impl RosterView {
    pub fn len(&self) -> usize {
        self.available.len() + self.pending.len() + self.unavailable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adjusters that have answered either way
    pub fn responded(&self) -> usize {
        self.available.len() + self.unavailable.len()
    }

    pub fn find(&self, id: &AdjusterId) -> Option<&Adjuster> {
        self.available
            .iter()
            .chain(&self.pending)
            .chain(&self.unavailable)
            .find(|a| &a.id == id)
    }

    /// The confirmed adjuster, if any
    pub fn assigned_adjuster(&self) -> Option<&Adjuster> {
        self.assigned.as_ref().and_then(|id| self.find(id))
    }
}

/// Adjuster roster aggregate
pub struct Roster {
    incident_id: IncidentId,
    adjusters: Vec<Adjuster>,
    slot: AssignmentSlot,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    events: Vec<RosterEvent>,
}

impl fmt::Debug for Roster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Roster")
            .field("incident_id", &self.incident_id)
            .field("adjusters", &self.adjusters)
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}

impl Roster {
    /// Builds a roster with every adjuster pending
    ///
    /// Duplicate ids keep their first occurrence.
    pub fn new(
        incident_id: IncidentId,
        candidates: Vec<Adjuster>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut seen = HashSet::new();
        let mut adjusters = Vec::with_capacity(candidates.len());
        for mut adjuster in candidates {
            if !seen.insert(adjuster.id.clone()) {
                tracing::warn!(
                    incident_id = %incident_id,
                    adjuster_id = %adjuster.id,
                    "Duplicate adjuster dropped from roster"
                );
                continue;
            }
            adjuster.state = ResponseState::Pending;
            adjusters.push(adjuster);
        }

        Self {
            incident_id,
            adjusters,
            slot: AssignmentSlot::Open,
            notifier,
            clock,
            events: Vec::new(),
        }
    }

    pub fn incident_id(&self) -> IncidentId {
        self.incident_id
    }

    /// All adjusters in roster order
    pub fn adjusters(&self) -> &[Adjuster] {
        &self.adjusters
    }

    pub fn get(&self, id: &AdjusterId) -> Option<&Adjuster> {
        self.adjusters.iter().find(|a| &a.id == id)
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        match &self.slot {
            AssignmentSlot::Confirmed(assignment) => Some(assignment),
            _ => None,
        }
    }

    pub fn tentative(&self) -> Option<&AdjusterId> {
        match &self.slot {
            AssignmentSlot::Tentative(id) => Some(id),
            _ => None,
        }
    }

    /// True once nobody is pending
    pub fn is_settled(&self) -> bool {
        self.adjusters.iter().all(|a| !a.state.is_pending())
    }

    /// Records an adjuster's answer
    ///
    /// Only a pending adjuster changes; late or repeated answers and unknown
    /// ids leave the roster as it was.
    pub fn report_response(&mut self, id: &AdjusterId, outcome: ResponseOutcome) -> ReportOutcome {
        let now = self.clock.now();
        let Some(adjuster) = self.adjusters.iter_mut().find(|a| &a.id == id) else {
            tracing::warn!(incident_id = %self.incident_id, adjuster_id = %id, "Response from adjuster not on roster");
            return ReportOutcome::UnknownAdjuster;
        };

        if !adjuster.resolve(outcome, now) {
            tracing::debug!(
                incident_id = %self.incident_id,
                adjuster_id = %id,
                state = %adjuster.state,
                "Ignoring repeated response"
            );
            return ReportOutcome::AlreadyResolved;
        }

        let eta_minutes = adjuster.eta_minutes();
        self.events.push(RosterEvent::ResponseRecorded {
            incident_id: self.incident_id,
            adjuster_id: id.clone(),
            outcome,
            eta_minutes,
            timestamp: now,
        });
        self.notifier.notify(
            Notification::info(notifier::RESPONSE_RECEIVED).for_incident(self.incident_id),
        );
        ReportOutcome::Applied
    }

    /// Assigns an available adjuster in one step
    pub fn assign(&mut self, id: &AdjusterId) -> Result<Assignment, DispatchError> {
        match self.begin_assignment(id)? {
            AssignmentStart::AlreadyConfirmed(assignment) => Ok(assignment),
            AssignmentStart::Tentative => self.confirm_assignment(id),
        }
    }

    /// Marks `id` as the tentative assignee
    pub fn begin_assignment(&mut self, id: &AdjusterId) -> Result<AssignmentStart, DispatchError> {
        match &self.slot {
            AssignmentSlot::Confirmed(existing) if &existing.adjuster_id == id => {
                return Ok(AssignmentStart::AlreadyConfirmed(existing.clone()));
            }
            AssignmentSlot::Confirmed(existing) => {
                return Err(DispatchError::AlreadyAssigned {
                    existing: existing.adjuster_id.clone(),
                });
            }
            AssignmentSlot::Tentative(_) => return Err(DispatchError::AssignmentInFlight),
            AssignmentSlot::Open => {}
        }

        let adjuster = self
            .get(id)
            .ok_or_else(|| DispatchError::UnknownAdjuster(id.clone()))?;
        if !adjuster.state.is_available() {
            return Err(DispatchError::InvalidState {
                adjuster_id: id.clone(),
                state: adjuster.state.to_string(),
            });
        }

        self.slot = AssignmentSlot::Tentative(id.clone());
        self.events.push(RosterEvent::AssignmentRequested {
            incident_id: self.incident_id,
            adjuster_id: id.clone(),
            timestamp: self.clock.now(),
        });
        Ok(AssignmentStart::Tentative)
    }

    /// Turns the tentative mark for `id` into a confirmed assignment
    pub fn confirm_assignment(&mut self, id: &AdjusterId) -> Result<Assignment, DispatchError> {
        match &self.slot {
            AssignmentSlot::Tentative(tentative) if tentative == id => {}
            _ => return Err(DispatchError::NoTentativeAssignment(id.clone())),
        }

        let assignment = Assignment::new(self.incident_id, id.clone(), self.clock.now());
        self.slot = AssignmentSlot::Confirmed(assignment.clone());
        self.events.push(RosterEvent::AssignmentConfirmed {
            incident_id: self.incident_id,
            adjuster_id: id.clone(),
            assignment_id: assignment.id,
            timestamp: assignment.assigned_at,
        });
        self.notifier.notify(
            Notification::success(notifier::ASSIGNMENT_CONFIRMED).for_incident(self.incident_id),
        );
        Ok(assignment)
    }

    /// Drops the tentative mark for `id`, reopening assignment
    ///
    /// Returns false when `id` was not the tentative assignee.
    pub fn rollback_assignment(&mut self, id: &AdjusterId) -> bool {
        match &self.slot {
            AssignmentSlot::Tentative(tentative) if tentative == id => {}
            _ => return false,
        }

        self.slot = AssignmentSlot::Open;
        self.events.push(RosterEvent::AssignmentRolledBack {
            incident_id: self.incident_id,
            adjuster_id: id.clone(),
            timestamp: self.clock.now(),
        });
        self.notifier.notify(
            Notification::error(notifier::ASSIGNMENT_FAILED).for_incident(self.incident_id),
        );
        true
    }

    /// Partitions the roster into available, pending and unavailable
    pub fn categorize(&self) -> RosterView {
        let mut view = RosterView {
            assigned: self.assignment().map(|a| a.adjuster_id.clone()),
            tentative: self.tentative().cloned(),
            ..RosterView::default()
        };
        for adjuster in &self.adjusters {
            match adjuster.state {
                ResponseState::Available { .. } => view.available.push(adjuster.clone()),
                ResponseState::Pending => view.pending.push(adjuster.clone()),
                ResponseState::Unavailable { .. } => view.unavailable.push(adjuster.clone()),
            }
        }
        view
    }

    pub fn take_events(&mut self) -> Vec<RosterEvent> {
        std::mem::take(&mut self.events)
    }
}
