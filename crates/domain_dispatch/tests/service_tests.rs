//! End-to-end dispatch flow over in-memory ports

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use core_kernel::{AdjusterId, Distance, IncidentId};
use domain_dispatch::notifier::{
    ASSIGNMENT_CONFIRMED, ASSIGNMENT_FAILED, INCIDENT_REPORTED, INTAKE_FAILED, INTAKE_INCOMPLETE,
};
use domain_dispatch::{
    Channel, DashboardBadge, DispatchError, DispatchSettings, MessageStatus, ReportOutcome,
    ResponseOutcome,
};
use domain_incident::{HistoryQuery, IncidentError, IncidentStatus};

use common::{report, HarnessBuilder};

fn id(value: &str) -> AdjusterId {
    AdjusterId::from(value)
}

mod intake {
    use super::*;

    #[tokio::test]
    async fn test_submit_opens_session_with_pending_roster() {
        let h = HarnessBuilder::new().build();

        let incident = h.service.submit_incident(report()).await.unwrap();

        assert_eq!(incident.status, IncidentStatus::Active);
        assert_eq!(h.store.count(), 1);
        let roster = h.service.roster(incident.id).await.unwrap();
        assert_eq!(roster.pending.len(), 5);
        assert_eq!(h.notifier.count(INCIDENT_REPORTED), 1);
    }

    #[tokio::test]
    async fn test_outreach_logs_sms_and_calls() {
        let h = HarnessBuilder::new().build();
        let incident = h.service.submit_incident(report()).await.unwrap();

        let details = h.service.details(incident.id).await.unwrap();

        assert_eq!(details.summary.sms_sent, 5);
        assert_eq!(details.summary.calls_made, 5);
        assert_eq!(details.summary.total_messages, 10);
        assert_eq!(details.summary.pending, 5);
        let sms = details
            .messages
            .iter()
            .find(|m| m.channel == Channel::Sms)
            .unwrap();
        assert_eq!(
            sms.content.as_deref(),
            Some("Incident alert: Vehicle collision on highway at Los Angeles, CA. Are you available to respond?")
        );
    }

    #[tokio::test]
    async fn test_failed_sms_is_logged_not_fatal() {
        let h = HarnessBuilder::new().sms_fails_for("3").build();
        let incident = h.service.submit_incident(report()).await.unwrap();

        let details = h.service.details(incident.id).await.unwrap();
        let failed: Vec<_> = details
            .messages
            .iter()
            .filter(|m| m.status == MessageStatus::Failed)
            .collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].adjuster_id, id("3"));
    }

    #[tokio::test]
    async fn test_calls_can_be_disabled() {
        let h = HarnessBuilder::new()
            .settings(DispatchSettings {
                call_adjusters: false,
                ..DispatchSettings::default()
            })
            .build();
        let incident = h.service.submit_incident(report()).await.unwrap();

        let details = h.service.details(incident.id).await.unwrap();
        assert_eq!(details.summary.calls_made, 0);
        assert_eq!(details.summary.sms_sent, 5);
    }

    #[tokio::test]
    async fn test_search_radius_limits_roster() {
        let h = HarnessBuilder::new()
            .settings(DispatchSettings {
                search_radius: Distance::whole_miles(15),
                ..DispatchSettings::default()
            })
            .build();
        let incident = h.service.submit_incident(report()).await.unwrap();

        let roster = h.service.roster(incident.id).await.unwrap();
        let ids: Vec<&str> = roster.pending.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "5"]);
    }

    #[tokio::test]
    async fn test_missing_fields_rejected_without_side_effects() {
        let h = HarnessBuilder::new().build();
        let mut incomplete = report();
        incomplete.loss_location = "   ".into();

        let result = h.service.submit_incident(incomplete).await;

        match result {
            Err(DispatchError::Incident(IncidentError::Validation { missing })) => {
                assert_eq!(missing, vec!["loss_location"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(h.store.count(), 0);
        assert_eq!(h.notifier.count(INTAKE_INCOMPLETE), 1);
    }

    #[tokio::test]
    async fn test_directory_failure_saves_nothing() {
        let h = HarnessBuilder::new().directory_fails().build();

        let result = h.service.submit_incident(report()).await;

        assert!(matches!(result, Err(DispatchError::Port(_))));
        assert_eq!(h.store.count(), 0);
        assert_eq!(h.notifier.count(INTAKE_FAILED), 1);
    }

    #[tokio::test]
    async fn test_store_failure_reported() {
        let h = HarnessBuilder::new().build();
        h.store.fail_saves.store(true, Ordering::SeqCst);

        let result = h.service.submit_incident(report()).await;

        assert!(matches!(result, Err(DispatchError::Port(e)) if e.is_transient()));
        assert_eq!(h.notifier.count(INTAKE_FAILED), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_submission_while_in_flight_refused() {
        let h = Arc::new(
            HarnessBuilder::new()
                .store_latency(Duration::from_millis(1000))
                .build(),
        );

        let first = {
            let h = h.clone();
            tokio::spawn(async move { h.service.submit_incident(report()).await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = h.service.submit_incident(report()).await;

        assert!(matches!(second, Err(DispatchError::SubmissionInFlight)));
        assert!(first.await.unwrap().is_ok());
        assert_eq!(h.store.count(), 1);

        // Released once the first submission finished.
        assert!(h.service.submit_incident(report()).await.is_ok());
    }
}

mod responses {
    use super::*;

    #[tokio::test]
    async fn test_report_response_updates_roster() {
        let h = HarnessBuilder::new().build();
        let incident = h.service.submit_incident(report()).await.unwrap();

        let outcome = h
            .service
            .report_response(incident.id, &id("2"), ResponseOutcome::Available)
            .await
            .unwrap();

        assert_eq!(outcome, ReportOutcome::Applied);
        let roster = h.service.roster(incident.id).await.unwrap();
        assert_eq!(roster.available[0].eta_minutes(), Some(24));
    }

    #[tokio::test]
    async fn test_unknown_adjuster_reported_as_outcome() {
        let h = HarnessBuilder::new().build();
        let incident = h.service.submit_incident(report()).await.unwrap();

        let outcome = h
            .service
            .report_response(incident.id, &id("77"), ResponseOutcome::Available)
            .await
            .unwrap();
        assert_eq!(outcome, ReportOutcome::UnknownAdjuster);
    }

    #[tokio::test]
    async fn test_unknown_incident() {
        let h = HarnessBuilder::new().build();
        let result = h
            .service
            .report_response(IncidentId::new(), &id("1"), ResponseOutcome::Available)
            .await;
        assert!(matches!(result, Err(DispatchError::IncidentNotFound(_))));
    }
}

mod assignment {
    use super::*;

    #[tokio::test]
    async fn test_assign_records_on_incident() {
        let h = HarnessBuilder::new().build();
        let incident = h.service.submit_incident(report()).await.unwrap();
        h.service
            .report_response(incident.id, &id("2"), ResponseOutcome::Available)
            .await
            .unwrap();

        let assignment = h.service.assign(incident.id, &id("2")).await.unwrap();

        assert_eq!(assignment.adjuster_id, id("2"));
        let stored = h.service.get_incident(incident.id).await.unwrap();
        assert_eq!(stored.assigned_adjuster, Some(id("2")));
        let details = h.service.details(incident.id).await.unwrap();
        assert_eq!(
            details.assigned_adjuster.map(|a| a.name),
            Some("Sarah Johnson".to_string())
        );
        assert_eq!(h.notifier.count(ASSIGNMENT_CONFIRMED), 1);
    }

    #[tokio::test]
    async fn test_repeat_assign_skips_desk() {
        let h = HarnessBuilder::new().build();
        let incident = h.service.submit_incident(report()).await.unwrap();
        h.service
            .report_response(incident.id, &id("2"), ResponseOutcome::Available)
            .await
            .unwrap();

        let first = h.service.assign(incident.id, &id("2")).await.unwrap();
        let second = h.service.assign(incident.id, &id("2")).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(h.desk.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.notifier.count(ASSIGNMENT_CONFIRMED), 1);
    }

    #[tokio::test]
    async fn test_pending_adjuster_cannot_be_assigned() {
        let h = HarnessBuilder::new().build();
        let incident = h.service.submit_incident(report()).await.unwrap();

        let result = h.service.assign(incident.id, &id("1")).await;

        assert!(matches!(result, Err(DispatchError::InvalidState { .. })));
        assert_eq!(h.desk.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_desk_failure_rolls_back() {
        let h = HarnessBuilder::new().build();
        let incident = h.service.submit_incident(report()).await.unwrap();
        h.service
            .report_response(incident.id, &id("2"), ResponseOutcome::Available)
            .await
            .unwrap();
        h.desk.fail.store(true, Ordering::SeqCst);

        let result = h.service.assign(incident.id, &id("2")).await;

        assert!(matches!(result, Err(DispatchError::Port(_))));
        let roster = h.service.roster(incident.id).await.unwrap();
        assert_eq!(roster.assigned, None);
        assert_eq!(roster.tentative, None);
        assert_eq!(h.notifier.count(ASSIGNMENT_FAILED), 1);
        let stored = h.service.get_incident(incident.id).await.unwrap();
        assert_eq!(stored.assigned_adjuster, None);

        h.desk.fail.store(false, Ordering::SeqCst);
        assert!(h.service.assign(incident.id, &id("2")).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_assignment_refused() {
        let h = Arc::new(
            HarnessBuilder::new()
                .desk_latency(Duration::from_millis(1500))
                .build(),
        );
        let incident = h.service.submit_incident(report()).await.unwrap();
        for adjuster in ["1", "2"] {
            h.service
                .report_response(incident.id, &id(adjuster), ResponseOutcome::Available)
                .await
                .unwrap();
        }

        let first = {
            let h = h.clone();
            tokio::spawn(async move { h.service.assign(incident.id, &AdjusterId::from("2")).await })
        };
        tokio::time::sleep(Duration::from_millis(200)).await;
        let second = h.service.assign(incident.id, &id("1")).await;

        assert!(matches!(second, Err(DispatchError::AssignmentInFlight)));
        let assignment = first.await.unwrap().unwrap();
        assert_eq!(assignment.adjuster_id, id("2"));

        let third = h.service.assign(incident.id, &id("1")).await;
        assert!(matches!(third, Err(DispatchError::AlreadyAssigned { .. })));
        assert_eq!(h.desk.calls.load(Ordering::SeqCst), 1);
    }
}

mod lifecycle {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_close_landing_first_fails_the_assignment() {
        let h = HarnessBuilder::new()
            .store_latency(Duration::from_secs(1))
            .build();
        let incident = h.service.submit_incident(report()).await.unwrap();
        h.service
            .report_response(incident.id, &id("2"), ResponseOutcome::Available)
            .await
            .unwrap();

        let adjuster = id("2");
        let (closed, assigned) = tokio::join!(
            h.service.close_incident(incident.id),
            h.service.assign(incident.id, &adjuster),
        );

        assert_eq!(closed.unwrap().status, IncidentStatus::Closed);
        assert!(matches!(
            assigned,
            Err(DispatchError::Incident(IncidentError::Closed))
        ));
        let stored = h.service.get_incident(incident.id).await.unwrap();
        assert_eq!(stored.status, IncidentStatus::Closed);
        assert_eq!(stored.assigned_adjuster, None);
        let roster = h.service.roster(incident.id).await.unwrap();
        assert_eq!(roster.assigned, None);
        assert_eq!(roster.tentative, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_assignment_landing_first_survives_close() {
        let h = HarnessBuilder::new()
            .store_latency(Duration::from_secs(1))
            .build();
        let incident = h.service.submit_incident(report()).await.unwrap();
        h.service
            .report_response(incident.id, &id("2"), ResponseOutcome::Available)
            .await
            .unwrap();

        let adjuster = id("2");
        let (assigned, closed) = tokio::join!(
            h.service.assign(incident.id, &adjuster),
            h.service.close_incident(incident.id),
        );

        assert_eq!(assigned.unwrap().adjuster_id, id("2"));
        let closed = closed.unwrap();
        assert_eq!(closed.assigned_adjuster, Some(id("2")));
        let stored = h.service.get_incident(incident.id).await.unwrap();
        assert_eq!(stored.status, IncidentStatus::Closed);
        assert_eq!(stored.assigned_adjuster, Some(id("2")));
        let roster = h.service.roster(incident.id).await.unwrap();
        assert_eq!(roster.assigned, Some(id("2")));
    }

    #[tokio::test]
    async fn test_close_incident_stops_session() {
        let h = HarnessBuilder::new().build();
        let incident = h.service.submit_incident(report()).await.unwrap();

        let closed = h.service.close_incident(incident.id).await.unwrap();

        assert_eq!(closed.status, IncidentStatus::Closed);
        let result = h
            .service
            .report_response(incident.id, &id("1"), ResponseOutcome::Available)
            .await;
        assert!(matches!(result, Err(DispatchError::SessionClosed)));

        // Details remain readable after close.
        let details = h.service.details(incident.id).await.unwrap();
        assert_eq!(details.roster.pending.len(), 5);
    }

    #[tokio::test]
    async fn test_closed_incident_cannot_reopen() {
        let h = HarnessBuilder::new().build();
        let incident = h.service.submit_incident(report()).await.unwrap();
        h.service.close_incident(incident.id).await.unwrap();

        let result = h.service.update_status(incident.id, IncidentStatus::Active).await;
        assert!(matches!(
            result,
            Err(DispatchError::Incident(IncidentError::InvalidStatusTransition { .. }))
        ));
    }

    #[tokio::test]
    async fn test_pending_status_keeps_session_open() {
        let h = HarnessBuilder::new().build();
        let incident = h.service.submit_incident(report()).await.unwrap();

        h.service
            .update_status(incident.id, IncidentStatus::Pending)
            .await
            .unwrap();

        assert!(h
            .service
            .report_response(incident.id, &id("1"), ResponseOutcome::Available)
            .await
            .is_ok());
    }
}

mod projections {
    use super::*;

    #[tokio::test]
    async fn test_dashboard_counts_today() {
        let h = HarnessBuilder::new().build();
        let first = h.service.submit_incident(report()).await.unwrap();
        let mut other = report();
        other.customer_name = "City Hospital".into();
        h.service.submit_incident(other).await.unwrap();
        h.service.close_incident(first.id).await.unwrap();

        let stats = h.service.dashboard().await.unwrap();

        assert_eq!(stats.active_incidents, 1);
        assert_eq!(stats.sms_today, 10);
        assert_eq!(stats.calls_today, 10);
        assert_eq!(stats.recent.len(), 2);
    }

    #[tokio::test]
    async fn test_dashboard_sub_metrics_and_badges() {
        let h = HarnessBuilder::new().build();
        let quiet = h.service.submit_incident(report()).await.unwrap();

        let mut second = report();
        second.customer_name = "City Hospital".into();
        let answered = h.service.submit_incident(second).await.unwrap();
        h.service
            .report_response(answered.id, &id("4"), ResponseOutcome::Unavailable)
            .await
            .unwrap();

        let mut third = report();
        third.customer_name = "Metro Transit".into();
        let staffed = h.service.submit_incident(third).await.unwrap();
        h.service
            .report_response(staffed.id, &id("2"), ResponseOutcome::Available)
            .await
            .unwrap();
        h.service.assign(staffed.id, &id("2")).await.unwrap();

        let stats = h.service.dashboard().await.unwrap();

        assert_eq!(stats.active_incidents, 3);
        assert_eq!(stats.awaiting_adjuster, 2);
        assert_eq!(stats.sms_today, 15);
        assert_eq!(stats.sms_delivered_today, 2);
        assert_eq!(stats.calls_today, 15);
        assert_eq!(stats.calls_connected_today, 15);

        let badge = |incident_id: IncidentId| {
            stats
                .recent
                .iter()
                .find(|row| row.incident_id == incident_id)
                .map(|row| (row.badge, row.badge_label.clone()))
                .unwrap()
        };
        assert_eq!(
            badge(quiet.id),
            (DashboardBadge::UrgentNoResponses, "Urgent - No responses".to_string())
        );
        assert_eq!(badge(answered.id).0, DashboardBadge::WaitingForResponses);
        assert_eq!(
            badge(staffed.id),
            (DashboardBadge::AdjusterAssigned, "Adjuster Assigned".to_string())
        );
    }

    #[tokio::test]
    async fn test_dashboard_excludes_yesterday() {
        let h = HarnessBuilder::new().build();
        h.service.submit_incident(report()).await.unwrap();
        h.clock.advance(chrono::Duration::days(1));

        let stats = h.service.dashboard().await.unwrap();
        assert_eq!(stats.sms_today, 0);
        assert_eq!(stats.active_incidents, 1);
    }

    #[tokio::test]
    async fn test_history_merges_live_and_archived() {
        let h = HarnessBuilder::new().build();
        let incident = h.service.submit_incident(report()).await.unwrap();
        h.service
            .report_response(incident.id, &id("2"), ResponseOutcome::Available)
            .await
            .unwrap();
        h.service.assign(incident.id, &id("2")).await.unwrap();

        let all = h.service.history(&HistoryQuery::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].incident_id, incident.id);
        assert_eq!(all[0].texts_sent, 5);
        assert_eq!(all[0].responses, 1);
        assert_eq!(all[0].adjuster_name.as_deref(), Some("Sarah Johnson"));

        let hits = h.service.history(&HistoryQuery::term("water")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].customer_name, "TechStart Inc");
    }

    #[tokio::test]
    async fn test_shutdown_closes_every_session() {
        let h = HarnessBuilder::new().build();
        let incident = h.service.submit_incident(report()).await.unwrap();

        h.service.shutdown().await;

        let result = h
            .service
            .report_response(incident.id, &id("1"), ResponseOutcome::Available)
            .await;
        assert!(matches!(result, Err(DispatchError::SessionClosed)));
    }
}
