// ABOUTME: Integration tests for the pending-booking handoff on a file-backed store
// ABOUTME: Covers one-shot restore, expiry, schema mismatch, and restart survival
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{identity, june_first, offering, slot, Harness, BRANCH};
use salon_booking::booking::{
    BookingContext, BookingDraft, BookingEvent, BookingSession, BookingStateMachine,
    EntryContext, PendingBookingPersistence, WizardStep,
};
use salon_booking::models::CustomerContact;
use salon_booking::store::{FileKeyValueStore, KeyValueStore};
use tempfile::TempDir;

fn confirm_draft() -> BookingDraft {
    let machine = BookingStateMachine::default();
    let events = [
        BookingEvent::SelectBranch(BRANCH.to_owned()),
        BookingEvent::AddService(offering("cut", "Hair", 650.0, 0.0)),
        BookingEvent::AddService(offering("spa", "Spa", 500.0, 0.0)),
        BookingEvent::SetDate(june_first()),
        BookingEvent::SetTime(slot("02:00 PM")),
        BookingEvent::UpdateContact(CustomerContact {
            name: "Asha Rao".to_owned(),
            email: "asha@example.com".to_owned(),
            phone: "9876543210".to_owned(),
        }),
    ];
    let mut state = machine.initial(EntryContext::BookNow, None);
    for event in events {
        state = machine.transition(&state, event).unwrap();
    }
    state.draft().clone()
}

fn file_store(dir: &TempDir) -> Arc<dyn KeyValueStore> {
    Arc::new(FileKeyValueStore::new(dir.path().join("session.json")))
}

#[tokio::test]
async fn test_pending_booking_is_restored_exactly_once() {
    common::init_test_logging();
    let dir = TempDir::new().unwrap();
    let draft = confirm_draft();

    PendingBookingPersistence::new(file_store(&dir))
        .save(WizardStep::Confirm, &draft)
        .await
        .unwrap();

    // A new handle on the same file stands in for the page reload
    let persistence = PendingBookingPersistence::new(file_store(&dir));
    let restored = persistence.load_and_clear().await.unwrap().unwrap();

    assert_eq!(restored.step, WizardStep::Confirm);
    assert_eq!(restored.draft, draft);
    assert!(persistence.load_and_clear().await.unwrap().is_none());
}

#[tokio::test]
async fn test_save_overwrites_previous_snapshot() {
    common::init_test_logging();
    let dir = TempDir::new().unwrap();
    let persistence = PendingBookingPersistence::new(file_store(&dir));

    persistence
        .save(WizardStep::Services, &BookingDraft::new())
        .await
        .unwrap();
    persistence
        .save(WizardStep::Schedule, &confirm_draft())
        .await
        .unwrap();

    let restored = persistence.load_and_clear().await.unwrap().unwrap();
    assert_eq!(restored.step, WizardStep::Schedule);
    assert_eq!(restored.draft.service_ids(), vec!["cut", "spa"]);
}

#[tokio::test]
async fn test_expired_snapshot_is_discarded() {
    common::init_test_logging();
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);
    let persistence = PendingBookingPersistence::new(store.clone()).with_ttl(Duration::ZERO);

    persistence
        .save(WizardStep::Confirm, &confirm_draft())
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(persistence.load_and_clear().await.unwrap().is_none());
    assert!(store.get(persistence.slot()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_snapshot_from_other_schema_version_is_discarded() {
    common::init_test_logging();
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);
    let persistence = PendingBookingPersistence::new(store.clone());
    persistence
        .save(WizardStep::Confirm, &confirm_draft())
        .await
        .unwrap();

    let saved = store.get(persistence.slot()).await.unwrap().unwrap();
    let mut record: serde_json::Value = serde_json::from_str(&saved).unwrap();
    record["version"] = serde_json::json!(99);
    store
        .set(persistence.slot(), record.to_string())
        .await
        .unwrap();

    assert!(persistence.load_and_clear().await.unwrap().is_none());
    assert!(store.get(persistence.slot()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_missing_slot_is_absent() {
    common::init_test_logging();
    let dir = TempDir::new().unwrap();
    let persistence = PendingBookingPersistence::new(file_store(&dir));

    assert!(persistence.load_and_clear().await.unwrap().is_none());
}

#[tokio::test]
async fn test_garbled_store_file_reads_as_no_pending_booking() {
    common::init_test_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    tokio::fs::write(&path, r#"{"pendingBooking": truncated"#)
        .await
        .unwrap();
    let persistence = PendingBookingPersistence::new(file_store(&dir));

    assert!(persistence.load_and_clear().await.unwrap().is_none());
    assert!(persistence.load_and_clear().await.unwrap().is_none());

    persistence
        .save(WizardStep::Confirm, &confirm_draft())
        .await
        .unwrap();
    let restored = persistence.load_and_clear().await.unwrap().unwrap();
    assert_eq!(restored.step, WizardStep::Confirm);
}

#[tokio::test]
async fn test_sign_in_recovers_from_garbled_store_file() {
    let harness = Harness::new();
    let dir = TempDir::new().unwrap();
    tokio::fs::write(dir.path().join("session.json"), "{\"pendingBooking\": ")
        .await
        .unwrap();
    let mut parts = harness.collaborators(Arc::new(harness.db.clone()));
    parts.store = file_store(&dir);
    let context = Arc::new(BookingContext::new(&harness.config, parts));
    harness.auth.sign_in(identity()).await;

    let mut session = BookingSession::start(context.clone(), EntryContext::ReturningUser)
        .await
        .unwrap();
    session.on_signed_in().await.unwrap();
    assert_eq!(session.state().step(), WizardStep::Dashboard);

    // The reset file no longer gets in the way of later sign-ins
    let mut again = BookingSession::start(context, EntryContext::ReturningUser)
        .await
        .unwrap();
    again.on_signed_in().await.unwrap();
    assert_eq!(again.state().step(), WizardStep::Dashboard);
}
