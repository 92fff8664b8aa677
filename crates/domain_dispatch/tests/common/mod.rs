//! In-memory ports shared by the dispatch tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use core_kernel::{
    AdjusterId, Distance, DomainPort, IncidentId, ManualClock, OperationMetadata, PortError,
};
use domain_dispatch::{
    Adjuster, AssignmentDesk, AdjusterDirectory, DispatchPorts, DispatchService, DispatchSettings,
    Message, OutboundChannel, RecordingNotifier,
};
use domain_incident::{HistoryEntry, Incident, IncidentReport, IncidentStatus, IncidentStore};

pub fn demo_roster() -> Vec<Adjuster> {
    vec![
        Adjuster::new("1", "John Smith", "(555) 123-4567", Distance::whole_miles(15)),
        Adjuster::new("2", "Sarah Johnson", "(555) 234-5678", Distance::whole_miles(8)),
        Adjuster::new("3", "Michael Davis", "(555) 345-6789", Distance::whole_miles(22)),
        Adjuster::new("4", "Jessica Williams", "(555) 456-7890", Distance::whole_miles(35)),
        Adjuster::new("5", "Robert Brown", "(555) 567-8901", Distance::whole_miles(12)),
    ]
}

pub fn report() -> IncidentReport {
    IncidentReport {
        customer_name: "Acme Corp".into(),
        caller_name: "Jane Doe".into(),
        caller_number: "(555) 987-6543".into(),
        driver_name: String::new(),
        driver_number: String::new(),
        loss_location: "Los Angeles, CA".into(),
        accident_description: "Vehicle collision on highway".into(),
    }
}

pub fn start_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 12, 17, 0, 0).unwrap()
}

#[derive(Default)]
pub struct FakeStore {
    incidents: Mutex<HashMap<IncidentId, Incident>>,
    pub latency: Option<Duration>,
    pub fail_saves: AtomicBool,
}

impl FakeStore {
    pub fn count(&self) -> usize {
        self.incidents.lock().unwrap().len()
    }
}

impl DomainPort for FakeStore {}

#[async_trait]
impl IncidentStore for FakeStore {
    async fn save(&self, incident: &Incident) -> Result<(), PortError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PortError::connection("store offline"));
        }
        self.incidents
            .lock()
            .unwrap()
            .insert(incident.id, incident.clone());
        Ok(())
    }

    async fn get(&self, id: IncidentId) -> Result<Incident, PortError> {
        self.incidents
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Incident", id))
    }

    async fn list(&self, status: Option<IncidentStatus>) -> Result<Vec<Incident>, PortError> {
        let mut incidents: Vec<Incident> = self
            .incidents
            .lock()
            .unwrap()
            .values()
            .filter(|i| status.map_or(true, |s| i.status == s))
            .cloned()
            .collect();
        incidents.sort_by_key(|i| i.created_at);
        Ok(incidents)
    }

    async fn archived(&self) -> Result<Vec<HistoryEntry>, PortError> {
        Ok(vec![HistoryEntry {
            incident_id: IncidentId::new(),
            date: chrono::NaiveDate::from_ymd_opt(2023, 10, 12).unwrap(),
            customer_name: "TechStart Inc".into(),
            location: "San Francisco, CA".into(),
            description: "Water damage in office".into(),
            adjuster_id: Some(AdjusterId::from("ADJ-985")),
            adjuster_name: Some("Sarah Johnson".into()),
            texts_sent: 5,
            calls_made: 4,
            responses: 2,
            status: IncidentStatus::Closed,
        }])
    }
}

pub struct FakeDirectory {
    pub roster: Vec<Adjuster>,
    pub fail: bool,
}

impl DomainPort for FakeDirectory {}

#[async_trait]
impl AdjusterDirectory for FakeDirectory {
    async fn candidates_near(
        &self,
        _location: &str,
        radius: Distance,
    ) -> Result<Vec<Adjuster>, PortError> {
        if self.fail {
            return Err(PortError::connection("directory offline"));
        }
        Ok(self
            .roster
            .iter()
            .filter(|a| a.distance.within(radius))
            .cloned()
            .collect())
    }
}

pub struct FakeOutbound {
    pub clock: Arc<ManualClock>,
    pub failing_sms_for: Option<AdjusterId>,
}

impl DomainPort for FakeOutbound {}

#[async_trait]
impl OutboundChannel for FakeOutbound {
    async fn send_sms(&self, adjuster: &Adjuster, content: &str) -> Result<Message, PortError> {
        if self.failing_sms_for.as_ref() == Some(&adjuster.id) {
            return Err(PortError::connection("carrier rejected"));
        }
        Ok(Message::sms(adjuster, content, core_kernel::Clock::now(&*self.clock)))
    }

    async fn place_call(&self, adjuster: &Adjuster) -> Result<Message, PortError> {
        Ok(Message::call(adjuster, Some(45), core_kernel::Clock::now(&*self.clock)))
    }
}

#[derive(Default)]
pub struct FakeDesk {
    pub latency: Option<Duration>,
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
}

impl DomainPort for FakeDesk {}

#[async_trait]
impl AssignmentDesk for FakeDesk {
    async fn confirm(
        &self,
        _incident_id: IncidentId,
        _adjuster_id: &AdjusterId,
        _metadata: &OperationMetadata,
    ) -> Result<(), PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(PortError::ServiceUnavailable { service: "assignment desk".into() });
        }
        Ok(())
    }
}

pub struct Harness {
    pub service: DispatchService,
    pub store: Arc<FakeStore>,
    pub desk: Arc<FakeDesk>,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: Arc<ManualClock>,
}

pub struct HarnessBuilder {
    store: FakeStore,
    desk: FakeDesk,
    directory_fails: bool,
    failing_sms_for: Option<AdjusterId>,
    settings: DispatchSettings,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self {
            store: FakeStore::default(),
            desk: FakeDesk::default(),
            directory_fails: false,
            failing_sms_for: None,
            settings: DispatchSettings::default(),
        }
    }

    pub fn store_latency(mut self, latency: Duration) -> Self {
        self.store.latency = Some(latency);
        self
    }

    pub fn desk_latency(mut self, latency: Duration) -> Self {
        self.desk.latency = Some(latency);
        self
    }

    pub fn directory_fails(mut self) -> Self {
        self.directory_fails = true;
        self
    }

    pub fn sms_fails_for(mut self, id: &str) -> Self {
        self.failing_sms_for = Some(AdjusterId::from(id));
        self
    }

    pub fn settings(mut self, settings: DispatchSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Harness {
        let clock = Arc::new(ManualClock::new(start_time()));
        let store = Arc::new(self.store);
        let desk = Arc::new(self.desk);
        let notifier = Arc::new(RecordingNotifier::new());
        let ports = DispatchPorts {
            store: store.clone(),
            directory: Arc::new(FakeDirectory {
                roster: demo_roster(),
                fail: self.directory_fails,
            }),
            outbound: Arc::new(FakeOutbound {
                clock: clock.clone(),
                failing_sms_for: self.failing_sms_for,
            }),
            desk: desk.clone(),
        };
        let service = DispatchService::new(ports, notifier.clone(), clock.clone(), self.settings);
        Harness {
            service,
            store,
            desk,
            notifier,
            clock,
        }
    }
}
