// ABOUTME: Staff availability checks against existing appointments
// ABOUTME: A staff member is busy when a non-cancelled appointment on the same day overlaps the slot
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Availability
//!
//! Availability is always read from the appointment repository; nothing is
//! cached. The check is a best-effort pre-flight, not a reservation: two
//! sessions can both pass it for the same slot, and the repository's create
//! path remains the arbiter.

use std::sync::Arc;

use crate::constants::scheduling::DEFAULT_APPOINTMENT_DURATION_MINUTES;
use crate::database::AppointmentRepository;
use crate::errors::BookingResult;
use crate::models::TimeSlot;
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

/// Decides whether a staff member is free at a date and time
#[async_trait]
pub trait AvailabilityChecker: Send + Sync {
    /// Whether `staff_id` has no conflicting appointment at `date`/`time`
    ///
    /// # Errors
    ///
    /// Returns an error if existing appointments cannot be read
    async fn is_available(
        &self,
        staff_id: &str,
        date: NaiveDate,
        time: TimeSlot,
    ) -> BookingResult<bool>;

    /// The subset of `slots` at which `staff_id` is free
    ///
    /// # Errors
    ///
    /// Returns an error if any check fails
    async fn available_slots(
        &self,
        staff_id: &str,
        date: NaiveDate,
        slots: &[TimeSlot],
    ) -> BookingResult<Vec<TimeSlot>> {
        let mut free = Vec::with_capacity(slots.len());
        for slot in slots {
            if self.is_available(staff_id, date, *slot).await? {
                free.push(*slot);
            }
        }
        Ok(free)
    }
}

/// Availability backed by the appointment repository
#[derive(Clone)]
pub struct AppointmentAvailabilityChecker {
    appointments: Arc<dyn AppointmentRepository>,
    duration_minutes: u32,
}

impl AppointmentAvailabilityChecker {
    /// Create a checker assuming the default appointment duration
    #[must_use]
    pub fn new(appointments: Arc<dyn AppointmentRepository>) -> Self {
        Self::with_duration(appointments, DEFAULT_APPOINTMENT_DURATION_MINUTES)
    }

    /// Create a checker with an explicit appointment duration
    #[must_use]
    pub fn with_duration(
        appointments: Arc<dyn AppointmentRepository>,
        duration_minutes: u32,
    ) -> Self {
        Self {
            appointments,
            duration_minutes,
        }
    }
}

#[async_trait]
impl AvailabilityChecker for AppointmentAvailabilityChecker {
    async fn is_available(
        &self,
        staff_id: &str,
        date: NaiveDate,
        time: TimeSlot,
    ) -> BookingResult<bool> {
        let existing = self
            .appointments
            .list_for_staff_on_date(staff_id, date)
            .await?;

        let conflict = existing
            .iter()
            .find(|a| a.conflicts_with(staff_id, date, &time, self.duration_minutes));

        if let Some(blocking) = conflict {
            debug!(
                staff_id,
                %date,
                %time,
                blocking_appointment = %blocking.id,
                "Staff member unavailable"
            );
            return Ok(false);
        }
        Ok(true)
    }
}
