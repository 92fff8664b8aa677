//! Live dispatch session for one incident
//!
//! A session owns the roster and communication log, serializes every
//! mutation behind one lock, and publishes a fresh `RosterView` to
//! subscribers after each change. Delayed responses are scheduled as tokio
//! tasks; tearing the session down aborts all of them so nothing mutates a
//! closed session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use core_kernel::{AdjusterId, IncidentId};

use crate::adjuster::{Adjuster, ResponseOutcome};
use crate::assignment::Assignment;
use crate::communication::{CommunicationLog, Message};
use crate::error::DispatchError;
use crate::roster::{AssignmentStart, ReportOutcome, Roster, RosterView};

/// Point-in-time copy of a session's state
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub view: RosterView,
    pub log: CommunicationLog,
    pub assignment: Option<Assignment>,
}

impl SessionSnapshot {
    pub fn assigned_adjuster(&self) -> Option<&Adjuster> {
        self.view.assigned_adjuster()
    }
}

struct SessionState {
    roster: Roster,
    log: CommunicationLog,
}

impl SessionState {
    fn publish(&self, updates: &watch::Sender<RosterView>) {
        updates.send_replace(self.roster.categorize());
    }

    fn drain_events(&mut self) {
        for event in self.roster.take_events() {
            tracing::debug!(
                incident_id = %self.roster.incident_id(),
                adjuster_id = %event.adjuster_id(),
                event_type = event.event_type(),
                "Roster event"
            );
        }
    }
}

struct SessionInner {
    incident_id: IncidentId,
    state: Mutex<SessionState>,
    closed: AtomicBool,
    updates: watch::Sender<RosterView>,
}

impl SessionInner {
    fn ensure_open(&self) -> Result<(), DispatchError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(DispatchError::SessionClosed);
        }
        Ok(())
    }

    async fn report_response(
        &self,
        adjuster_id: &AdjusterId,
        outcome: ResponseOutcome,
    ) -> Result<ReportOutcome, DispatchError> {
        let mut state = self.state.lock().await;
        // Checked under the lock so a teardown racing this call wins.
        self.ensure_open()?;

        let result = state.roster.report_response(adjuster_id, outcome);
        if result == ReportOutcome::Applied {
            state.log.mark_delivered(adjuster_id);
            let reply = state.roster.get(adjuster_id).and_then(Message::reply);
            if let Some(reply) = reply {
                state.log.record(reply);
            }
            state.drain_events();
            state.publish(&self.updates);
        }
        Ok(result)
    }
}

pub struct DispatchSession {
    inner: Arc<SessionInner>,
    timers: std::sync::Mutex<Vec<JoinHandle<()>>>,
}

impl std::fmt::Debug for DispatchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchSession")
            .field("incident_id", &self.inner.incident_id)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl DispatchSession {
    pub fn new(roster: Roster, log: CommunicationLog) -> Self {
        let incident_id = roster.incident_id();
        let (updates, _) = watch::channel(roster.categorize());
        Self {
            inner: Arc::new(SessionInner {
                incident_id,
                state: Mutex::new(SessionState { roster, log }),
                closed: AtomicBool::new(false),
                updates,
            }),
            timers: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn incident_id(&self) -> IncidentId {
        self.inner.incident_id
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Receives a new `RosterView` after every change
    pub fn subscribe(&self) -> watch::Receiver<RosterView> {
        self.inner.updates.subscribe()
    }

    pub async fn report_response(
        &self,
        adjuster_id: &AdjusterId,
        outcome: ResponseOutcome,
    ) -> Result<ReportOutcome, DispatchError> {
        self.inner.report_response(adjuster_id, outcome).await
    }

    /// Delivers a response after `delay`
    ///
    /// The timer is cancelled if the session is torn down first.
    pub fn schedule_response(
        &self,
        adjuster_id: AdjusterId,
        outcome: ResponseOutcome,
        delay: Duration,
    ) -> Result<(), DispatchError> {
        let mut timers = self.timers.lock().unwrap_or_else(|e| e.into_inner());
        self.inner.ensure_open()?;
        timers.retain(|handle| !handle.is_finished());

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match inner.report_response(&adjuster_id, outcome).await {
                Ok(result) => tracing::debug!(
                    incident_id = %inner.incident_id,
                    adjuster_id = %adjuster_id,
                    ?result,
                    "Scheduled response delivered"
                ),
                Err(e) => tracing::debug!(
                    incident_id = %inner.incident_id,
                    adjuster_id = %adjuster_id,
                    error = %e,
                    "Scheduled response dropped"
                ),
            }
        });
        timers.push(handle);
        Ok(())
    }

    /// Timers that have not fired yet
    pub fn pending_timers(&self) -> usize {
        self.timers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    pub async fn record_message(&self, message: Message) -> Result<(), DispatchError> {
        let mut state = self.inner.state.lock().await;
        self.inner.ensure_open()?;
        state.log.record(message);
        Ok(())
    }

    pub async fn begin_assignment(
        &self,
        adjuster_id: &AdjusterId,
    ) -> Result<AssignmentStart, DispatchError> {
        let mut state = self.inner.state.lock().await;
        self.inner.ensure_open()?;
        let start = state.roster.begin_assignment(adjuster_id)?;
        state.drain_events();
        state.publish(&self.inner.updates);
        Ok(start)
    }

    pub async fn confirm_assignment(
        &self,
        adjuster_id: &AdjusterId,
    ) -> Result<Assignment, DispatchError> {
        let mut state = self.inner.state.lock().await;
        self.inner.ensure_open()?;
        let assignment = state.roster.confirm_assignment(adjuster_id)?;
        state.drain_events();
        state.publish(&self.inner.updates);
        Ok(assignment)
    }

    /// Reopens assignment after a failed confirmation
    pub async fn rollback_assignment(&self, adjuster_id: &AdjusterId) -> bool {
        let mut state = self.inner.state.lock().await;
        let rolled_back = state.roster.rollback_assignment(adjuster_id);
        if rolled_back {
            state.drain_events();
            state.publish(&self.inner.updates);
        }
        rolled_back
    }

    pub async fn view(&self) -> RosterView {
        self.inner.state.lock().await.roster.categorize()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.state.lock().await;
        SessionSnapshot {
            view: state.roster.categorize(),
            log: state.log.clone(),
            assignment: state.roster.assignment().cloned(),
        }
    }

    /// Stops the session: pending timers are aborted and later mutations fail
    ///
    /// Calling it again is harmless.
    pub fn teardown(&self) {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let aborted = self.abort_timers();
        tracing::info!(
            incident_id = %self.inner.incident_id,
            aborted_timers = aborted,
            "Dispatch session closed"
        );
    }

    fn abort_timers(&self) -> usize {
        let mut timers = self.timers.lock().unwrap_or_else(|e| e.into_inner());
        let mut aborted = 0;
        for handle in timers.drain(..) {
            if !handle.is_finished() {
                aborted += 1;
            }
            handle.abort();
        }
        aborted
    }
}

impl Drop for DispatchSession {
    fn drop(&mut self) {
        self.inner.closed.store(true, Ordering::Release);
        self.abort_timers();
    }
}
