// ABOUTME: Turns a confirmed draft into one create-appointment call per selected service
// ABOUTME: Assigns staff, re-checks availability before each call, and reports partial failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Appointment Submission
//!
//! Calls are issued sequentially, so a failed batch is always "the first N
//! succeeded, the rest did not". Created appointments are never rolled back.

use std::sync::Arc;
use std::time::Duration;

use crate::availability::AvailabilityChecker;
use crate::constants::scheduling::DEFAULT_SUBMISSION_TIMEOUT_SECS;
use crate::database::{AppointmentRepository, StaffRepository};
use crate::errors::{BookingError, BookingResult, ServiceFailure};
use crate::logging::BookingLogger;
use crate::models::{
    Appointment, AppointmentLineItem, CreateAppointmentRequest, ServiceOffering, TimeSlot,
};
use crate::pricing::PricingEngine;
use async_trait::async_trait;
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use super::draft::BookingDraft;

/// Picks the staff member who performs a service
#[async_trait]
pub trait StaffAssignmentStrategy: Send + Sync {
    /// A staff ID free at `date`/`time`, or `None` if nobody qualifies
    ///
    /// # Errors
    ///
    /// Returns an error if staff or availability cannot be read
    async fn assign(
        &self,
        branch_id: &str,
        service_id: &str,
        date: NaiveDate,
        time: TimeSlot,
    ) -> BookingResult<Option<String>>;
}

/// Random choice among active branch staff who pass the availability check
pub struct RandomStaffAssignment {
    staff: Arc<dyn StaffRepository>,
    availability: Arc<dyn AvailabilityChecker>,
}

impl RandomStaffAssignment {
    /// Create the strategy
    #[must_use]
    pub fn new(
        staff: Arc<dyn StaffRepository>,
        availability: Arc<dyn AvailabilityChecker>,
    ) -> Self {
        Self {
            staff,
            availability,
        }
    }
}

#[async_trait]
impl StaffAssignmentStrategy for RandomStaffAssignment {
    async fn assign(
        &self,
        branch_id: &str,
        service_id: &str,
        date: NaiveDate,
        time: TimeSlot,
    ) -> BookingResult<Option<String>> {
        let mut candidates: Vec<String> = self
            .staff
            .list_staff(Some(branch_id))
            .await?
            .into_iter()
            .filter(|member| member.is_active)
            .map(|member| member.id)
            .collect();
        candidates.shuffle(&mut rand::thread_rng());

        for staff_id in candidates {
            if self.availability.is_available(&staff_id, date, time).await? {
                debug!(service_id, staff_id = %staff_id, "Assigned staff member");
                return Ok(Some(staff_id));
            }
        }
        debug!(service_id, branch_id, %date, %time, "No staff member is free");
        Ok(None)
    }
}

/// Submits drafts against the appointment repository
pub struct AppointmentSubmitter {
    appointments: Arc<dyn AppointmentRepository>,
    availability: Arc<dyn AvailabilityChecker>,
    assignment: Arc<dyn StaffAssignmentStrategy>,
    timeout: Duration,
}

impl AppointmentSubmitter {
    /// Create a submitter with the default create-call timeout
    #[must_use]
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        availability: Arc<dyn AvailabilityChecker>,
        assignment: Arc<dyn StaffAssignmentStrategy>,
    ) -> Self {
        Self {
            appointments,
            availability,
            assignment,
            timeout: Duration::from_secs(DEFAULT_SUBMISSION_TIMEOUT_SECS),
        }
    }

    /// Override the per-service create-call timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Book every selected service not already booked from this draft
    ///
    /// Returns the new appointments in draft order.
    ///
    /// # Errors
    ///
    /// - `Validation` if branch, services, schedule, or contact are incomplete
    /// - `SlotUnavailable` if no staff member is free for a service; nothing
    ///   further is attempted and earlier appointments and failures from this
    ///   batch are attached
    /// - `PartialSubmission` if some create calls failed after others succeeded
    /// - `SubmissionFailed` if every attempted create call failed
    pub async fn submit(
        &self,
        customer_id: &str,
        draft: &BookingDraft,
    ) -> BookingResult<Vec<Appointment>> {
        let branch_id = draft.require_branch()?;
        draft.require_services()?;
        let (date, time) = draft.require_schedule()?;
        draft.require_contact()?;

        let mut created: Vec<Appointment> = Vec::new();
        let mut failed: Vec<ServiceFailure> = Vec::new();

        for service in draft.pending_services() {
            let staff_id = match self.place(branch_id, service, date, time).await {
                Ok(Some(staff_id)) => staff_id,
                Ok(None) => {
                    warn!(service_id = %service.id, %date, %time, "Slot no longer available");
                    // The unplaced service counts as not booked
                    BookingLogger::log_submission_outcome(
                        customer_id,
                        created.len(),
                        failed.len() + 1,
                    );
                    return Err(BookingError::SlotUnavailable {
                        service_id: service.id.clone(),
                        date,
                        time,
                        booked: created,
                        failed,
                    });
                }
                Err(e) => {
                    failed.push(Self::failure(service, e.to_string(), false));
                    continue;
                }
            };

            let request =
                Self::request(customer_id, branch_id, &staff_id, service, draft, (date, time));
            match tokio::time::timeout(self.timeout, self.appointments.create(&request)).await {
                Ok(Ok(appointment)) => {
                    BookingLogger::log_appointment_created(&appointment);
                    created.push(appointment);
                }
                Ok(Err(e)) => failed.push(Self::failure(service, e.to_string(), false)),
                Err(_) => failed.push(Self::failure(
                    service,
                    format!("no response within {:?}", self.timeout),
                    true,
                )),
            }
        }

        BookingLogger::log_submission_outcome(customer_id, created.len(), failed.len());
        if failed.is_empty() {
            return Ok(created);
        }
        if created.is_empty() {
            let reason = failed
                .iter()
                .map(|f| format!("{}: {}", f.service_name, f.reason))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(BookingError::SubmissionFailed { reason });
        }
        Err(BookingError::PartialSubmission {
            booked: created,
            failed,
        })
    }

    /// Assign staff, then re-check that staff member's slot
    async fn place(
        &self,
        branch_id: &str,
        service: &ServiceOffering,
        date: NaiveDate,
        time: TimeSlot,
    ) -> BookingResult<Option<String>> {
        let Some(staff_id) = self
            .assignment
            .assign(branch_id, &service.id, date, time)
            .await?
        else {
            return Ok(None);
        };
        if self.availability.is_available(&staff_id, date, time).await? {
            Ok(Some(staff_id))
        } else {
            Ok(None)
        }
    }

    fn request(
        customer_id: &str,
        branch_id: &str,
        staff_id: &str,
        service: &ServiceOffering,
        draft: &BookingDraft,
        (date, time): (NaiveDate, TimeSlot),
    ) -> CreateAppointmentRequest {
        let price = PricingEngine::service_price(service);
        CreateAppointmentRequest {
            customer_id: customer_id.to_owned(),
            branch_id: branch_id.to_owned(),
            staff_id: staff_id.to_owned(),
            date,
            time,
            customer: draft.contact().clone(),
            services: vec![AppointmentLineItem {
                service_id: service.id.clone(),
                price,
            }],
            total_price: price,
            payment_method: draft.payment_method(),
            notes: draft.notes().to_owned(),
        }
    }

    fn failure(service: &ServiceOffering, reason: String, timed_out: bool) -> ServiceFailure {
        let failure = ServiceFailure {
            service_id: service.id.clone(),
            service_name: service.name.clone(),
            reason,
            timed_out,
        };
        BookingLogger::log_service_failure(&failure);
        failure
    }
}
