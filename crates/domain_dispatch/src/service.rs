//! Dispatch orchestration
//!
//! `DispatchService` ties intake, outreach, responses and assignment
//! together over the injected ports. It keeps one `DispatchSession` per
//! incident for as long as the process runs.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use core_kernel::{
    AdjusterId, Clock, Distance, IncidentId, InFlightGuard, OperationMetadata, Timezone,
};
use domain_incident::{
    history, HistoryEntry, HistoryQuery, Incident, IncidentReport, IncidentStatus, IncidentStore,
};

use crate::adjuster::{Adjuster, ResponseOutcome};
use crate::assignment::Assignment;
use crate::communication::{
    alert_text, Channel, CommunicationLog, CommunicationSummary, Message, MessageStatus,
};
use crate::dashboard::DashboardStats;
use crate::error::DispatchError;
use crate::notifier::{self, Notification, Notifier};
use crate::ports::{AdjusterDirectory, AssignmentDesk, OutboundChannel, ResponseSimulator};
use crate::roster::{AssignmentStart, ReportOutcome, Roster, RosterView};
use crate::session::{DispatchSession, SessionSnapshot};

/// Tunables for the dispatch flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSettings {
    /// How far from the loss location adjusters are considered
    pub search_radius: Distance,
    /// Whether each roster adjuster is also called after the SMS
    pub call_adjusters: bool,
    /// Zone used for "today" and history dates
    pub timezone: Timezone,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            search_radius: Distance::whole_miles(100),
            call_adjusters: true,
            timezone: Timezone::default(),
        }
    }
}

/// Required collaborators
#[derive(Clone)]
pub struct DispatchPorts {
    pub store: Arc<dyn IncidentStore>,
    pub directory: Arc<dyn AdjusterDirectory>,
    pub outbound: Arc<dyn OutboundChannel>,
    pub desk: Arc<dyn AssignmentDesk>,
}

/// Everything the incident detail view shows
#[derive(Debug, Clone, Serialize)]
pub struct IncidentDetails {
    pub incident: Incident,
    pub roster: RosterView,
    pub assignment: Option<Assignment>,
    pub assigned_adjuster: Option<Adjuster>,
    /// Newest first
    pub messages: Vec<Message>,
    pub summary: CommunicationSummary,
}

pub struct DispatchService {
    ports: DispatchPorts,
    simulator: Option<Arc<dyn ResponseSimulator>>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    settings: DispatchSettings,
    sessions: RwLock<HashMap<IncidentId, Arc<DispatchSession>>>,
    /// Held across read, modify and save of a stored incident
    record_locks: std::sync::Mutex<HashMap<IncidentId, Arc<Mutex<()>>>>,
    intake_guard: InFlightGuard<String>,
    assignment_guard: InFlightGuard<IncidentId>,
}

impl DispatchService {
    pub fn new(
        ports: DispatchPorts,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            ports,
            simulator: None,
            notifier,
            clock,
            settings,
            sessions: RwLock::new(HashMap::new()),
            record_locks: std::sync::Mutex::new(HashMap::new()),
            intake_guard: InFlightGuard::new(),
            assignment_guard: InFlightGuard::new(),
        }
    }

    /// Attaches scripted responses to every new session
    pub fn with_simulator(mut self, simulator: Arc<dyn ResponseSimulator>) -> Self {
        self.simulator = Some(simulator);
        self
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Validates and records a new incident, then starts outreach
    ///
    /// A second submission of the same report while the first is still in
    /// flight is refused with `SubmissionInFlight`.
    #[tracing::instrument(skip_all, fields(loss_location = %report.loss_location))]
    pub async fn submit_incident(&self, report: IncidentReport) -> Result<Incident, DispatchError> {
        let _permit = self
            .intake_guard
            .try_acquire(report.fingerprint())
            .map_err(|_| DispatchError::SubmissionInFlight)?;

        for warning in report.warnings() {
            tracing::warn!(%warning, "Intake warning");
        }
        let mut incident = match report.into_incident(self.clock.now()) {
            Ok(incident) => incident,
            Err(e) => {
                self.notifier.notify(Notification::error(notifier::INTAKE_INCOMPLETE));
                return Err(e.into());
            }
        };

        let candidates = match self
            .ports
            .directory
            .candidates_near(&incident.loss_location, self.settings.search_radius)
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => return Err(self.intake_failed(e.into())),
        };

        if let Err(e) = self.ports.store.save(&incident).await {
            return Err(self.intake_failed(e.into()));
        }
        for event in incident.take_events() {
            tracing::info!(
                incident_id = %event.incident_id(),
                event_type = event.event_type(),
                "Incident event"
            );
        }
        self.notifier
            .notify(Notification::success(notifier::INCIDENT_REPORTED).for_incident(incident.id));

        let roster = Roster::new(
            incident.id,
            candidates,
            Arc::clone(&self.notifier),
            Arc::clone(&self.clock),
        );
        let log = self.reach_out(&incident, roster.adjusters()).await;
        let session = Arc::new(DispatchSession::new(roster, log));

        if let Some(simulator) = &self.simulator {
            match simulator.attach(&session) {
                Ok(scheduled) => tracing::debug!(incident_id = %incident.id, scheduled, "Simulated responses scheduled"),
                Err(e) => tracing::warn!(incident_id = %incident.id, error = %e, "Response simulator failed to attach"),
            }
        }

        self.sessions.write().await.insert(incident.id, session);
        tracing::info!(
            incident_id = %incident.id,
            incident_number = %incident.incident_number,
            "Incident submitted"
        );
        Ok(incident)
    }

    fn intake_failed(&self, error: DispatchError) -> DispatchError {
        tracing::error!(error = %error, "Incident submission failed");
        self.notifier.notify(Notification::error(notifier::INTAKE_FAILED));
        error
    }

    /// Sends the alert SMS, and optionally a call, to every roster adjuster
    ///
    /// A failed send is logged as a failed message rather than aborting.
    async fn reach_out(&self, incident: &Incident, adjusters: &[Adjuster]) -> CommunicationLog {
        let mut log = CommunicationLog::new();
        let content = alert_text(incident);

        for adjuster in adjusters {
            let sms = match self.ports.outbound.send_sms(adjuster, &content).await {
                Ok(message) => message,
                Err(e) => {
                    tracing::warn!(adjuster_id = %adjuster.id, error = %e, "SMS failed");
                    Message::sms(adjuster, content.clone(), self.clock.now())
                        .with_status(MessageStatus::Failed)
                }
            };
            log.record(sms);

            if self.settings.call_adjusters {
                let call = match self.ports.outbound.place_call(adjuster).await {
                    Ok(message) => message,
                    Err(e) => {
                        tracing::warn!(adjuster_id = %adjuster.id, error = %e, "Call failed");
                        Message::call(adjuster, None, self.clock.now())
                            .with_status(MessageStatus::Failed)
                    }
                };
                log.record(call);
            }
        }

        tracing::info!(
            incident_id = %incident.id,
            sms = log.count(Channel::Sms),
            calls = log.count(Channel::Call),
            "Outreach complete"
        );
        log
    }

    async fn session(&self, incident_id: IncidentId) -> Result<Arc<DispatchSession>, DispatchError> {
        self.sessions
            .read()
            .await
            .get(&incident_id)
            .cloned()
            .ok_or(DispatchError::IncidentNotFound(incident_id))
    }

    /// Records an adjuster's answer for an incident
    pub async fn report_response(
        &self,
        incident_id: IncidentId,
        adjuster_id: &AdjusterId,
        outcome: ResponseOutcome,
    ) -> Result<ReportOutcome, DispatchError> {
        self.session(incident_id)
            .await?
            .report_response(adjuster_id, outcome)
            .await
    }

    /// Assigns an available adjuster to an incident
    ///
    /// The adjuster is marked tentatively, the assignment desk is asked to
    /// confirm, and the incident record is updated. Any failure after the
    /// tentative mark rolls it back.
    #[tracing::instrument(skip_all, fields(incident_id = %incident_id, adjuster_id = %adjuster_id))]
    pub async fn assign(
        &self,
        incident_id: IncidentId,
        adjuster_id: &AdjusterId,
    ) -> Result<Assignment, DispatchError> {
        let session = self.session(incident_id).await?;
        let _permit = self
            .assignment_guard
            .try_acquire(incident_id)
            .map_err(|_| DispatchError::AssignmentInFlight)?;

        match session.begin_assignment(adjuster_id).await? {
            AssignmentStart::AlreadyConfirmed(existing) => return Ok(existing),
            AssignmentStart::Tentative => {}
        }

        match self.complete_assignment(&session, incident_id, adjuster_id).await {
            Ok(assignment) => {
                tracing::info!(assignment_id = %assignment.id, "Adjuster assigned");
                Ok(assignment)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Assignment failed, rolling back");
                session.rollback_assignment(adjuster_id).await;
                Err(e)
            }
        }
    }

    /// Confirms with the desk, then records the adjuster on the incident and
    /// the session while holding the incident's record lock
    ///
    /// A status change cannot interleave, so a close either lands before the
    /// assignment (which then fails) or after it.
    async fn complete_assignment(
        &self,
        session: &DispatchSession,
        incident_id: IncidentId,
        adjuster_id: &AdjusterId,
    ) -> Result<Assignment, DispatchError> {
        let metadata = OperationMetadata::with_correlation_id(incident_id.to_string())
            .with_context("adjuster_id", adjuster_id.as_str());
        self.ports
            .desk
            .confirm(incident_id, adjuster_id, &metadata)
            .await?;

        let _record = self.lock_record(incident_id).await;
        let previous = self.ports.store.get(incident_id).await?;
        let mut incident = previous.clone();
        incident.record_assignment(adjuster_id.clone(), self.clock.now())?;
        self.ports.store.save(&incident).await?;

        let assignment = match session.confirm_assignment(adjuster_id).await {
            Ok(assignment) => assignment,
            Err(e) => {
                if let Err(restore) = self.ports.store.save(&previous).await {
                    tracing::error!(error = %restore, "Could not restore incident after failed confirmation");
                }
                return Err(e);
            }
        };
        for event in incident.take_events() {
            tracing::info!(event_type = event.event_type(), "Incident event");
        }
        Ok(assignment)
    }

    async fn lock_record(&self, incident_id: IncidentId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.record_locks.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(locks.entry(incident_id).or_default())
        };
        lock.lock_owned().await
    }

    pub async fn roster(&self, incident_id: IncidentId) -> Result<RosterView, DispatchError> {
        Ok(self.session(incident_id).await?.view().await)
    }

    /// Live roster updates for an incident
    pub async fn subscribe(
        &self,
        incident_id: IncidentId,
    ) -> Result<tokio::sync::watch::Receiver<RosterView>, DispatchError> {
        Ok(self.session(incident_id).await?.subscribe())
    }

    pub async fn get_incident(&self, incident_id: IncidentId) -> Result<Incident, DispatchError> {
        Ok(self.ports.store.get(incident_id).await?)
    }

    pub async fn list_incidents(
        &self,
        status: Option<IncidentStatus>,
    ) -> Result<Vec<Incident>, DispatchError> {
        Ok(self.ports.store.list(status).await?)
    }

    pub async fn details(&self, incident_id: IncidentId) -> Result<IncidentDetails, DispatchError> {
        let incident = self.ports.store.get(incident_id).await?;
        let session = self.sessions.read().await.get(&incident_id).cloned();
        let snapshot = match session {
            Some(session) => session.snapshot().await,
            None => SessionSnapshot {
                view: RosterView::default(),
                log: CommunicationLog::new(),
                assignment: None,
            },
        };

        Ok(IncidentDetails {
            assigned_adjuster: snapshot.assigned_adjuster().cloned(),
            summary: snapshot.log.summary(&snapshot.view),
            messages: snapshot.log.newest_first(),
            roster: snapshot.view,
            assignment: snapshot.assignment,
            incident,
        })
    }

    /// Moves an incident to `status`; closing it stops its session
    pub async fn update_status(
        &self,
        incident_id: IncidentId,
        status: IncidentStatus,
    ) -> Result<Incident, DispatchError> {
        let _record = self.lock_record(incident_id).await;
        let mut incident = self.ports.store.get(incident_id).await?;
        incident.update_status(status, self.clock.now())?;
        self.ports.store.save(&incident).await?;
        for event in incident.take_events() {
            tracing::info!(
                incident_id = %incident_id,
                event_type = event.event_type(),
                "Incident event"
            );
        }

        if incident.is_closed() {
            if let Some(session) = self.sessions.read().await.get(&incident_id) {
                session.teardown();
            }
        }
        Ok(incident)
    }

    pub async fn close_incident(&self, incident_id: IncidentId) -> Result<Incident, DispatchError> {
        self.update_status(incident_id, IncidentStatus::Closed).await
    }

    async fn snapshots(
        &self,
        incidents: Vec<Incident>,
    ) -> Vec<(Incident, Option<SessionSnapshot>)> {
        let sessions: Vec<Option<Arc<DispatchSession>>> = {
            let map = self.sessions.read().await;
            incidents.iter().map(|i| map.get(&i.id).cloned()).collect()
        };

        let mut paired = Vec::with_capacity(incidents.len());
        for (incident, session) in incidents.into_iter().zip(sessions) {
            let snapshot = match session {
                Some(session) => Some(session.snapshot().await),
                None => None,
            };
            paired.push((incident, snapshot));
        }
        paired
    }

    pub async fn dashboard(&self) -> Result<DashboardStats, DispatchError> {
        let incidents = self.ports.store.list(None).await?;
        let paired = self.snapshots(incidents).await;
        let today = self.settings.timezone.local_date(self.clock.now());
        Ok(DashboardStats::compile(&paired, today, &self.settings.timezone))
    }

    /// Searches live and archived incidents, newest first
    pub async fn history(&self, query: &HistoryQuery) -> Result<Vec<HistoryEntry>, DispatchError> {
        let incidents = self.ports.store.list(None).await?;
        let mut entries: Vec<HistoryEntry> = self
            .snapshots(incidents)
            .await
            .into_iter()
            .map(|(incident, snapshot)| self.history_entry(incident, snapshot))
            .collect();
        entries.extend(self.ports.store.archived().await?);
        Ok(history::search(&entries, query))
    }

    fn history_entry(&self, incident: Incident, snapshot: Option<SessionSnapshot>) -> HistoryEntry {
        let (texts_sent, calls_made, responses) = snapshot.as_ref().map_or((0, 0, 0), |s| {
            (
                s.log.count(Channel::Sms),
                s.log.count(Channel::Call),
                s.view.responded(),
            )
        });
        let adjuster_name = match (&incident.assigned_adjuster, &snapshot) {
            (Some(id), Some(s)) => s.view.find(id).map(|a| a.name.clone()),
            _ => None,
        };

        HistoryEntry {
            incident_id: incident.id,
            date: self.settings.timezone.local_date(incident.created_at),
            customer_name: incident.customer_name,
            location: incident.loss_location,
            description: incident.description,
            adjuster_id: incident.assigned_adjuster,
            adjuster_name,
            texts_sent: texts_sent as u32,
            calls_made: calls_made as u32,
            responses: responses as u32,
            status: incident.status,
        }
    }

    /// Tears down every session; pending timers are aborted
    pub async fn shutdown(&self) {
        let sessions = self.sessions.read().await;
        for session in sessions.values() {
            session.teardown();
        }
        tracing::info!(sessions = sessions.len(), "Dispatch service shut down");
    }
}
