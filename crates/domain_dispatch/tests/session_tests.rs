//! Dispatch session tests: scheduled responses, subscriptions and teardown

mod common;

use std::sync::Arc;
use std::time::Duration;

use core_kernel::{AdjusterId, IncidentId, ManualClock};
use domain_dispatch::notifier::RESPONSE_RECEIVED;
use domain_dispatch::{
    AssignmentStart, Channel, CommunicationLog, DispatchError, DispatchSession, Direction, Message,
    MessageStatus, RecordingNotifier, ReportOutcome, ResponseOutcome, Roster,
};

use common::{demo_roster, start_time};

fn session(notifier: Arc<RecordingNotifier>) -> DispatchSession {
    let clock = Arc::new(ManualClock::new(start_time()));
    let roster = Roster::new(IncidentId::new(), demo_roster(), notifier, clock);
    let mut log = CommunicationLog::new();
    for adjuster in roster.adjusters() {
        log.record(Message::sms(adjuster, "Incident alert", start_time()));
    }
    DispatchSession::new(roster, log)
}

fn id(value: &str) -> AdjusterId {
    AdjusterId::from(value)
}

#[tokio::test(start_paused = true)]
async fn test_scheduled_responses_apply_in_time_order() {
    let session = session(Arc::new(RecordingNotifier::new()));
    session
        .schedule_response(id("2"), ResponseOutcome::Available, Duration::from_millis(1000))
        .unwrap();
    session
        .schedule_response(id("4"), ResponseOutcome::Unavailable, Duration::from_millis(2500))
        .unwrap();
    session
        .schedule_response(id("5"), ResponseOutcome::Available, Duration::from_millis(5000))
        .unwrap();

    tokio::time::sleep(Duration::from_millis(1500)).await;
    let view = session.view().await;
    assert_eq!(view.available.len(), 1);
    assert_eq!(view.pending.len(), 4);

    tokio::time::sleep(Duration::from_millis(4000)).await;
    let view = session.view().await;
    assert_eq!(view.available.len(), 2);
    assert_eq!(view.unavailable.len(), 1);
    assert_eq!(session.pending_timers(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_subscribers_see_each_change() {
    let session = session(Arc::new(RecordingNotifier::new()));
    let mut updates = session.subscribe();
    assert_eq!(updates.borrow().pending.len(), 5);

    session
        .report_response(&id("1"), ResponseOutcome::Available)
        .await
        .unwrap();

    updates.changed().await.unwrap();
    let view = updates.borrow_and_update().clone();
    assert_eq!(view.available[0].id, id("1"));
}

#[tokio::test(start_paused = true)]
async fn test_repeated_response_does_not_publish() {
    let session = session(Arc::new(RecordingNotifier::new()));
    session
        .report_response(&id("1"), ResponseOutcome::Available)
        .await
        .unwrap();
    let mut updates = session.subscribe();

    let outcome = session
        .report_response(&id("1"), ResponseOutcome::Unavailable)
        .await
        .unwrap();

    assert_eq!(outcome, ReportOutcome::AlreadyResolved);
    assert!(!updates.has_changed().unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_response_marks_sms_delivered() {
    let session = session(Arc::new(RecordingNotifier::new()));
    session
        .report_response(&id("3"), ResponseOutcome::Unavailable)
        .await
        .unwrap();

    let snapshot = session.snapshot().await;
    for message in snapshot.log.messages() {
        let expected = if message.adjuster_id == id("3") {
            MessageStatus::Delivered
        } else {
            MessageStatus::Sent
        };
        assert_eq!(message.status, expected);
    }
}

#[tokio::test(start_paused = true)]
async fn test_applied_response_logs_inbound_reply() {
    let session = session(Arc::new(RecordingNotifier::new()));
    session
        .report_response(&id("2"), ResponseOutcome::Available)
        .await
        .unwrap();
    session
        .report_response(&id("4"), ResponseOutcome::Unavailable)
        .await
        .unwrap();
    session
        .report_response(&id("2"), ResponseOutcome::Unavailable)
        .await
        .unwrap();

    let snapshot = session.snapshot().await;
    let replies: Vec<&Message> = snapshot
        .log
        .messages()
        .iter()
        .filter(|m| m.direction == Direction::Inbound)
        .collect();
    assert_eq!(replies.len(), 2);
    assert!(replies.iter().all(|m| m.channel == Channel::Sms));
    assert!(replies.iter().all(|m| m.status == MessageStatus::Delivered));
    assert_eq!(replies[0].adjuster_id, id("2"));
    assert_eq!(
        replies[0].content.as_deref(),
        Some("I am available and can be on site in approximately 24 minutes.")
    );
    assert_eq!(
        replies[1].content.as_deref(),
        Some("I am currently unavailable to respond to this incident.")
    );

    // Replies are not counted as outreach.
    assert_eq!(snapshot.log.count(Channel::Sms), 5);
    assert_eq!(snapshot.log.replies(), 2);
    assert_eq!(snapshot.log.summary(&snapshot.view).replies, 2);
}

#[tokio::test(start_paused = true)]
async fn test_teardown_cancels_pending_timers() {
    let notifier = Arc::new(RecordingNotifier::new());
    let session = session(notifier.clone());
    session
        .schedule_response(id("2"), ResponseOutcome::Available, Duration::from_secs(1))
        .unwrap();
    session
        .schedule_response(id("5"), ResponseOutcome::Available, Duration::from_secs(5))
        .unwrap();

    tokio::time::sleep(Duration::from_secs(2)).await;
    session.teardown();
    tokio::time::sleep(Duration::from_secs(10)).await;

    let view = session.view().await;
    assert_eq!(view.available.len(), 1);
    assert_eq!(view.pending.len(), 4);
    assert_eq!(notifier.count(RESPONSE_RECEIVED), 1);
    assert_eq!(session.pending_timers(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_closed_session_rejects_mutations() {
    let session = session(Arc::new(RecordingNotifier::new()));
    session
        .report_response(&id("2"), ResponseOutcome::Available)
        .await
        .unwrap();
    session.teardown();
    session.teardown();

    assert!(session.is_closed());
    assert!(matches!(
        session.schedule_response(id("1"), ResponseOutcome::Available, Duration::from_secs(1)),
        Err(DispatchError::SessionClosed)
    ));
    assert!(matches!(
        session.report_response(&id("1"), ResponseOutcome::Available).await,
        Err(DispatchError::SessionClosed)
    ));
    assert!(matches!(
        session.begin_assignment(&id("2")).await,
        Err(DispatchError::SessionClosed)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_tentative_assignment_cannot_confirm_after_teardown() {
    let session = session(Arc::new(RecordingNotifier::new()));
    session
        .report_response(&id("2"), ResponseOutcome::Available)
        .await
        .unwrap();
    session.begin_assignment(&id("2")).await.unwrap();

    session.teardown();

    assert!(matches!(
        session.confirm_assignment(&id("2")).await,
        Err(DispatchError::SessionClosed)
    ));
    assert!(session.rollback_assignment(&id("2")).await);
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.assignment, None);
    assert_eq!(snapshot.view.tentative, None);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_session_cancels_timers() {
    let notifier = Arc::new(RecordingNotifier::new());
    let session = session(notifier.clone());
    session
        .schedule_response(id("1"), ResponseOutcome::Available, Duration::from_secs(3))
        .unwrap();

    drop(session);
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(notifier.count(RESPONSE_RECEIVED), 0);
}

#[tokio::test(start_paused = true)]
async fn test_two_phase_assignment_through_session() {
    let session = session(Arc::new(RecordingNotifier::new()));
    session
        .report_response(&id("2"), ResponseOutcome::Available)
        .await
        .unwrap();

    let start = session.begin_assignment(&id("2")).await.unwrap();
    assert_eq!(start, AssignmentStart::Tentative);
    assert_eq!(session.view().await.tentative, Some(id("2")));

    let assignment = session.confirm_assignment(&id("2")).await.unwrap();
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.assignment, Some(assignment));
    assert_eq!(snapshot.assigned_adjuster().map(|a| a.name.as_str()), Some("Sarah Johnson"));

    let again = session.begin_assignment(&id("2")).await.unwrap();
    assert!(matches!(again, AssignmentStart::AlreadyConfirmed(_)));
}
