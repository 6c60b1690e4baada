// ABOUTME: One-shot snapshot of step and draft across a sign-in interruption
// ABOUTME: Versioned, expiring records; unreadable payloads are treated as absent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;
use std::time::Duration;

use crate::config::PendingBookingConfig;
use crate::constants::persistence::{
    DEFAULT_PENDING_BOOKING_TTL_SECS, PENDING_BOOKING_SCHEMA_VERSION, PENDING_BOOKING_SLOT,
};
use crate::errors::{BookingError, BookingResult};
use crate::logging::BookingLogger;
use crate::store::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::draft::BookingDraft;
use super::state_machine::WizardStep;

/// A restored step and draft
#[derive(Debug, Clone, PartialEq)]
pub struct PendingBooking {
    /// Step the customer was on
    pub step: WizardStep,
    /// Draft at that moment
    pub draft: BookingDraft,
}

#[derive(Serialize, Deserialize)]
struct PendingBookingRecord {
    version: u32,
    saved_at: DateTime<Utc>,
    step: WizardStep,
    draft: BookingDraft,
}

/// Saves and consumes the single pending-booking slot
#[derive(Clone)]
pub struct PendingBookingPersistence {
    store: Arc<dyn KeyValueStore>,
    slot: String,
    ttl: Duration,
}

impl PendingBookingPersistence {
    /// Persistence on the default slot with the default TTL
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            slot: PENDING_BOOKING_SLOT.to_owned(),
            ttl: Duration::from_secs(DEFAULT_PENDING_BOOKING_TTL_SECS),
        }
    }

    /// Persistence configured from settings
    #[must_use]
    pub fn from_config(store: Arc<dyn KeyValueStore>, config: &PendingBookingConfig) -> Self {
        Self {
            store,
            slot: config.slot.clone(),
            ttl: config.ttl,
        }
    }

    /// Override the expiry
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Store key in use
    #[must_use]
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Overwrite the slot with `step` and `draft`
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write
    pub async fn save(&self, step: WizardStep, draft: &BookingDraft) -> BookingResult<()> {
        let record = PendingBookingRecord {
            version: PENDING_BOOKING_SCHEMA_VERSION,
            saved_at: Utc::now(),
            step,
            draft: draft.clone(),
        };
        let payload = serde_json::to_string(&record).map_err(|e| BookingError::Storage {
            reason: format!("pending booking could not be serialized: {e}"),
        })?;
        self.store.set(&self.slot, payload).await?;
        debug!(
            slot = %self.slot,
            %step,
            services = draft.services().len(),
            "Saved pending booking"
        );
        Ok(())
    }

    /// Take the saved booking, leaving the slot empty
    ///
    /// A second call returns `None`. Corrupt, outdated, or expired records
    /// are discarded and reported as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store itself fails
    pub async fn load_and_clear(&self) -> BookingResult<Option<PendingBooking>> {
        let Some(payload) = self.store.remove(&self.slot).await? else {
            return Ok(None);
        };

        let record: PendingBookingRecord = match serde_json::from_str(&payload) {
            Ok(record) => record,
            Err(e) => {
                BookingLogger::log_pending_discarded(&format!("unreadable payload: {e}"));
                return Ok(None);
            }
        };

        if record.version != PENDING_BOOKING_SCHEMA_VERSION {
            BookingLogger::log_pending_discarded(&format!(
                "schema version {} is not {PENDING_BOOKING_SCHEMA_VERSION}",
                record.version
            ));
            return Ok(None);
        }

        let age = Utc::now()
            .signed_duration_since(record.saved_at)
            .to_std()
            .unwrap_or_default();
        if age > self.ttl {
            BookingLogger::log_pending_discarded(&format!("expired after {}s", age.as_secs()));
            return Ok(None);
        }

        BookingLogger::log_pending_restored(record.step.index(), record.draft.services().len());
        Ok(Some(PendingBooking {
            step: record.step,
            draft: record.draft,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryKeyValueStore;
    use crate::test_utils::service;
    use serde_json::json;

    fn persistence() -> (PendingBookingPersistence, Arc<InMemoryKeyValueStore>) {
        let store = Arc::new(InMemoryKeyValueStore::new());
        (PendingBookingPersistence::new(store.clone()), store)
    }

    fn draft() -> BookingDraft {
        let mut draft = BookingDraft::new();
        draft.add_service(service("cut", 650.0, 0.0)).unwrap();
        draft
    }

    #[tokio::test]
    async fn test_load_is_one_shot() {
        let (pending, _) = persistence();
        pending.save(WizardStep::Confirm, &draft()).await.unwrap();

        let restored = pending.load_and_clear().await.unwrap().unwrap();
        assert_eq!(restored.step, WizardStep::Confirm);
        assert_eq!(restored.draft, draft());
        assert!(pending.load_and_clear().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_payload_is_none_and_cleared() {
        let (pending, store) = persistence();
        store
            .set(PENDING_BOOKING_SLOT, "{not json".to_owned())
            .await
            .unwrap();

        assert!(pending.load_and_clear().await.unwrap().is_none());
        assert!(store.get(PENDING_BOOKING_SLOT).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_other_schema_version_is_none() {
        let (pending, store) = persistence();
        let payload = json!({
            "version": PENDING_BOOKING_SCHEMA_VERSION + 1,
            "saved_at": Utc::now(),
            "step": 3,
            "draft": draft(),
        });
        store
            .set(PENDING_BOOKING_SLOT, payload.to_string())
            .await
            .unwrap();

        assert!(pending.load_and_clear().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_record_is_none() {
        let (pending, _) = persistence();
        let pending = pending.with_ttl(Duration::ZERO);
        pending.save(WizardStep::Schedule, &draft()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert!(pending.load_and_clear().await.unwrap().is_none());
    }
}
