// ABOUTME: Integration tests for turning a confirmed draft into appointments
// ABOUTME: Covers staff assignment, slot races, timeouts, partial failures, and resubmission
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{
    existing_request, identity, june_first, salon, slot, FixedStaff, FlakyAppointments,
    ScriptedAvailability, BRANCH, CUSTOMER_ID, SOLO_BRANCH,
};
use salon_booking::availability::{AppointmentAvailabilityChecker, AvailabilityChecker};
use salon_booking::booking::{
    AppointmentSubmitter, BookingEvent, BookingState, BookingStateMachine, EntryContext,
    RandomStaffAssignment, WizardStep,
};
use salon_booking::database::{AppointmentRepository, CatalogRepository, InMemoryDatabase};
use salon_booking::errors::BookingError;

/// A signed-in state at Confirm with `services` booked at 10:00 AM on 2024-06-01
async fn confirm_state(
    machine: &BookingStateMachine,
    branch: &str,
    services: &[&str],
) -> BookingState {
    let catalog = salon();
    let mut state = machine.initial(EntryContext::BookNow, Some(&identity()));
    state = machine
        .transition(&state, BookingEvent::SelectBranch(branch.to_owned()))
        .unwrap();
    for id in services {
        let service = catalog.get_service(id).await.unwrap().unwrap();
        state = machine
            .transition(&state, BookingEvent::AddService(service))
            .unwrap();
    }
    state = machine
        .transition(&state, BookingEvent::SetDate(june_first()))
        .unwrap();
    state = machine
        .transition(&state, BookingEvent::SetTime(slot("10:00 AM")))
        .unwrap();
    machine
        .transition(&state, BookingEvent::GoTo(WizardStep::Confirm))
        .unwrap()
}

fn random_submitter(
    db: &InMemoryDatabase,
    appointments: Arc<dyn AppointmentRepository>,
) -> AppointmentSubmitter {
    let availability: Arc<dyn AvailabilityChecker> =
        Arc::new(AppointmentAvailabilityChecker::new(appointments.clone()));
    let assignment = Arc::new(RandomStaffAssignment::new(
        Arc::new(db.clone()),
        availability.clone(),
    ));
    AppointmentSubmitter::new(appointments, availability, assignment)
}

#[tokio::test]
async fn test_each_service_becomes_one_appointment() {
    common::init_test_logging();
    let db = salon();
    let machine = BookingStateMachine::default();
    let state = confirm_state(&machine, BRANCH, &["cut", "color"]).await;
    let submitter = random_submitter(&db, Arc::new(db.clone()));

    let created = submitter.submit(CUSTOMER_ID, state.draft()).await.unwrap();

    assert_eq!(created.len(), 2);
    assert!(created[0].covers_service("cut"));
    assert!((created[0].total_price - 650.0).abs() < 1e-9);
    assert!(created[1].covers_service("color"));
    assert!((created[1].total_price - 1080.0).abs() < 1e-9);
    for appointment in &created {
        assert_eq!(appointment.customer_id, CUSTOMER_ID);
        assert_eq!(appointment.branch_id, BRANCH);
        assert_eq!(appointment.date, june_first());
        assert_eq!(appointment.time, slot("10:00 AM"));
        assert_eq!(appointment.customer.email, "asha@example.com");
    }
    // Two stylists in the branch, both taken at the same slot
    assert_ne!(created[0].staff_id, created[1].staff_id);
}

#[tokio::test]
async fn test_assignment_skips_busy_staff() {
    common::init_test_logging();
    let db = salon();
    db.create(&existing_request("stylist-1", "10:00 AM"))
        .await
        .unwrap();
    let machine = BookingStateMachine::default();
    let state = confirm_state(&machine, BRANCH, &["cut"]).await;
    let submitter = random_submitter(&db, Arc::new(db.clone()));

    let created = submitter.submit(CUSTOMER_ID, state.draft()).await.unwrap();

    assert_eq!(created.len(), 1);
    assert_eq!(created[0].staff_id, "stylist-2");
}

#[tokio::test]
async fn test_single_stylist_cannot_take_two_services_at_once() {
    common::init_test_logging();
    let db = salon();
    let machine = BookingStateMachine::default();
    let state = confirm_state(&machine, SOLO_BRANCH, &["cut", "spa"]).await;
    let submitter = random_submitter(&db, Arc::new(db.clone()));

    let error = submitter.submit(CUSTOMER_ID, state.draft()).await.unwrap_err();

    match error {
        BookingError::SlotUnavailable {
            service_id,
            date,
            time,
            booked,
            failed,
        } => {
            assert_eq!(service_id, "spa");
            assert!(failed.is_empty());
            assert_eq!(date, june_first());
            assert_eq!(time, slot("10:00 AM"));
            assert_eq!(booked.len(), 1);
            assert!(booked[0].covers_service("cut"));
            assert_eq!(booked[0].staff_id, "stylist-solo");
        }
        other => panic!("expected SlotUnavailable, got {other:?}"),
    }
    assert_eq!(db.all_appointments().await.len(), 1);
}

#[tokio::test]
async fn test_final_availability_check_stops_submission() {
    common::init_test_logging();
    let db = salon();
    let machine = BookingStateMachine::default();
    let state = confirm_state(&machine, BRANCH, &["cut", "spa"]).await;
    let submitter = AppointmentSubmitter::new(
        Arc::new(db.clone()),
        Arc::new(ScriptedAvailability::new(vec![false])),
        Arc::new(FixedStaff("stylist-1")),
    );

    let error = submitter.submit(CUSTOMER_ID, state.draft()).await.unwrap_err();

    assert!(matches!(
        error,
        BookingError::SlotUnavailable { ref service_id, ref booked, .. }
            if service_id == "cut" && booked.is_empty()
    ));
    assert!(db.all_appointments().await.is_empty());
}

#[tokio::test]
async fn test_slot_race_after_failed_create_reports_both() {
    common::init_test_logging();
    let db = salon();
    let flaky = Arc::new(FlakyAppointments::new(db.clone()).failing("cut"));
    let machine = BookingStateMachine::default();
    let state = confirm_state(&machine, BRANCH, &["cut", "spa"]).await;
    let submitter = AppointmentSubmitter::new(
        flaky.clone(),
        Arc::new(ScriptedAvailability::new(vec![true, false])),
        Arc::new(FixedStaff("stylist-1")),
    );

    let error = submitter.submit(CUSTOMER_ID, state.draft()).await.unwrap_err();

    let BookingError::SlotUnavailable {
        service_id,
        booked,
        failed,
        ..
    } = error
    else {
        panic!("expected SlotUnavailable, got {error:?}");
    };
    assert_eq!(service_id, "spa");
    assert!(booked.is_empty());
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].service_id, "cut");
    assert!(failed[0].reason.contains("network down"));
    assert_eq!(*flaky.attempts.lock().await, vec!["cut"]);
}

#[tokio::test]
async fn test_stalled_create_is_reported_as_timeout() {
    common::init_test_logging();
    let db = salon();
    let flaky = Arc::new(FlakyAppointments::new(db.clone()).stalling("spa"));
    let machine = BookingStateMachine::default();
    let state = confirm_state(&machine, BRANCH, &["cut", "spa"]).await;
    let submitter =
        random_submitter(&db, flaky.clone()).with_timeout(Duration::from_millis(50));

    let error = submitter.submit(CUSTOMER_ID, state.draft()).await.unwrap_err();

    let BookingError::PartialSubmission { booked, failed } = error else {
        panic!("expected PartialSubmission, got {error:?}");
    };
    assert_eq!(booked.len(), 1);
    assert!(booked[0].covers_service("cut"));
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].service_id, "spa");
    assert!(failed[0].timed_out);
}

#[tokio::test]
async fn test_every_create_failing_is_total_failure() {
    common::init_test_logging();
    let db = salon();
    let flaky = Arc::new(FlakyAppointments::new(db.clone()).failing("cut"));
    let machine = BookingStateMachine::default();
    let state = confirm_state(&machine, BRANCH, &["cut"]).await;
    let submitter = random_submitter(&db, flaky);

    let error = submitter.submit(CUSTOMER_ID, state.draft()).await.unwrap_err();

    let BookingError::SubmissionFailed { reason } = error else {
        panic!("expected SubmissionFailed, got {error:?}");
    };
    assert!(reason.contains("Service cut"), "{reason}");
    assert!(reason.contains("network down"), "{reason}");
    assert!(db.all_appointments().await.is_empty());
}

#[tokio::test]
async fn test_resubmission_books_only_remaining_services() {
    common::init_test_logging();
    let db = salon();
    let flaky = Arc::new(FlakyAppointments::new(db.clone()).failing("spa"));
    let machine = BookingStateMachine::default();
    let state = confirm_state(&machine, BRANCH, &["cut", "spa"]).await;
    let submitter = random_submitter(&db, flaky.clone());

    let error = submitter.submit(CUSTOMER_ID, state.draft()).await.unwrap_err();
    assert!(matches!(error, BookingError::PartialSubmission { .. }));
    let state = machine
        .transition(&state, BookingEvent::SubmissionFailed(error))
        .unwrap();
    assert_eq!(state.step(), WizardStep::Confirm);
    assert!(state.draft().is_booked("cut"));
    assert!(!state.draft().is_booked("spa"));

    flaky.heal().await;
    let created = submitter.submit(CUSTOMER_ID, state.draft()).await.unwrap();
    assert_eq!(created.len(), 1);
    assert!(created[0].covers_service("spa"));

    let state = machine
        .transition(&state, BookingEvent::SubmissionSucceeded(created))
        .unwrap();
    let receipt = state.receipt().unwrap();
    assert_eq!(receipt.appointments.len(), 2);
    assert!(receipt.appointments[0].covers_service("cut"));
    assert!(receipt.appointments[1].covers_service("spa"));
    assert_eq!(*flaky.attempts.lock().await, vec!["cut", "spa", "spa"]);
    assert_eq!(db.all_appointments().await.len(), 2);
}

#[tokio::test]
async fn test_incomplete_draft_is_rejected_before_any_call() {
    common::init_test_logging();
    let db = salon();
    let flaky = Arc::new(FlakyAppointments::new(db.clone()));
    let machine = BookingStateMachine::default();
    let mut state = machine.initial(EntryContext::BookNow, None);
    state = machine
        .transition(&state, BookingEvent::SelectBranch(BRANCH.to_owned()))
        .unwrap();
    let service = db.get_service("cut").await.unwrap().unwrap();
    state = machine
        .transition(&state, BookingEvent::AddService(service))
        .unwrap();
    let submitter = random_submitter(&db, flaky.clone());

    let error = submitter.submit(CUSTOMER_ID, state.draft()).await.unwrap_err();

    assert!(matches!(error, BookingError::Validation { field: "date", .. }));
    assert!(flaky.attempts.lock().await.is_empty());
}
