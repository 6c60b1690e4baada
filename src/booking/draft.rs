// ABOUTME: The in-progress booking aggregate mutated by the wizard
// ABOUTME: Holds branch, selected services, schedule, contact, coupon, and already-booked appointments
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{BookingError, BookingResult};
use crate::models::{
    Appointment, Coupon, CustomerContact, CustomerIdentity, PaymentMethod, ServiceOffering,
    TimeSlot,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A booking that has not been submitted yet
///
/// Selected services are kept as catalog snapshots so pricing never needs
/// to go back to the catalog. Selection has set semantics keyed by service
/// ID and keeps insertion order for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    branch_id: Option<String>,
    services: Vec<ServiceOffering>,
    date: Option<NaiveDate>,
    time: Option<TimeSlot>,
    contact: CustomerContact,
    payment_method: PaymentMethod,
    notes: String,
    coupon: Option<Coupon>,
    #[serde(default)]
    booked: Vec<Appointment>,
}

impl BookingDraft {
    /// Empty draft
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Target branch
    #[must_use]
    pub fn branch_id(&self) -> Option<&str> {
        self.branch_id.as_deref()
    }

    /// Selected services in selection order
    #[must_use]
    pub fn services(&self) -> &[ServiceOffering] {
        &self.services
    }

    /// IDs of the selected services
    #[must_use]
    pub fn service_ids(&self) -> Vec<&str> {
        self.services.iter().map(|s| s.id.as_str()).collect()
    }

    /// Whether `service_id` is selected
    #[must_use]
    pub fn has_service(&self, service_id: &str) -> bool {
        self.services.iter().any(|s| s.id == service_id)
    }

    /// Chosen day
    #[must_use]
    pub const fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Chosen slot
    #[must_use]
    pub const fn time(&self) -> Option<TimeSlot> {
        self.time
    }

    /// Contact details sent with every appointment
    #[must_use]
    pub const fn contact(&self) -> &CustomerContact {
        &self.contact
    }

    /// Payment method tag
    #[must_use]
    pub const fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Free-text notes
    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Applied coupon
    #[must_use]
    pub const fn coupon(&self) -> Option<&Coupon> {
        self.coupon.as_ref()
    }

    /// Appointments already created from this draft by an earlier, incomplete submission
    #[must_use]
    pub fn booked(&self) -> &[Appointment] {
        &self.booked
    }

    /// Whether a selected service already has an appointment from this draft
    #[must_use]
    pub fn is_booked(&self, service_id: &str) -> bool {
        self.booked.iter().any(|a| a.covers_service(service_id))
    }

    /// Selected services that still need an appointment
    pub fn pending_services(&self) -> impl Iterator<Item = &ServiceOffering> {
        self.services.iter().filter(|s| !self.is_booked(&s.id))
    }

    pub(crate) fn set_branch(&mut self, branch_id: String) {
        self.branch_id = Some(branch_id);
    }

    /// Add a service; returns `false` if it was already selected
    pub(crate) fn add_service(&mut self, service: ServiceOffering) -> BookingResult<bool> {
        if self.has_service(&service.id) {
            return Ok(false);
        }
        if service.is_sold_out() {
            return Err(BookingError::validation(
                "services",
                format!("'{}' is sold out", service.name),
            ));
        }
        self.services.push(service);
        Ok(true)
    }

    /// Remove a service; returns `false` if it was not selected
    pub(crate) fn remove_service(&mut self, service_id: &str) -> bool {
        let before = self.services.len();
        self.services.retain(|s| s.id != service_id);
        self.services.len() != before
    }

    /// Add the service if absent, remove it if present; returns whether it is now selected
    pub(crate) fn toggle_service(&mut self, service: ServiceOffering) -> BookingResult<bool> {
        if self.remove_service(&service.id) {
            return Ok(false);
        }
        self.add_service(service)
    }

    pub(crate) fn set_date(&mut self, date: NaiveDate) {
        self.date = Some(date);
    }

    pub(crate) fn set_time(&mut self, time: TimeSlot) {
        self.time = Some(time);
    }

    pub(crate) fn clear_time(&mut self) {
        self.time = None;
    }

    pub(crate) fn set_contact(&mut self, contact: CustomerContact) {
        self.contact = contact;
    }

    pub(crate) fn prefill_contact(&mut self, identity: &CustomerIdentity) {
        self.contact.prefill_from(identity);
    }

    pub(crate) fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    pub(crate) fn set_notes(&mut self, notes: String) {
        self.notes = notes;
    }

    pub(crate) fn set_coupon(&mut self, coupon: Coupon) {
        self.coupon = Some(coupon);
    }

    pub(crate) fn clear_coupon(&mut self) -> Option<Coupon> {
        self.coupon.take()
    }

    /// Record appointments created from this draft, ignoring ones already recorded
    pub(crate) fn record_booked(&mut self, appointments: &[Appointment]) {
        for appointment in appointments {
            if !self.booked.iter().any(|a| a.id == appointment.id) {
                self.booked.push(appointment.clone());
            }
        }
    }

    /// Guard for leaving the Services step
    ///
    /// # Errors
    ///
    /// Returns a validation error when no service is selected
    pub fn require_services(&self) -> BookingResult<()> {
        if self.services.is_empty() {
            return Err(BookingError::validation(
                "services",
                "select at least one service",
            ));
        }
        Ok(())
    }

    /// Guard for leaving the Schedule step
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the missing date or time
    pub fn require_schedule(&self) -> BookingResult<(NaiveDate, TimeSlot)> {
        let date = self
            .date
            .ok_or_else(|| BookingError::validation("date", "choose a date"))?;
        let time = self
            .time
            .ok_or_else(|| BookingError::validation("time", "choose a time slot"))?;
        Ok((date, time))
    }

    /// Contact must be complete and well-formed before submission
    ///
    /// # Errors
    ///
    /// Returns a validation error for the first missing or malformed field
    pub fn require_contact(&self) -> BookingResult<()> {
        if let Some(&field) = self.contact.missing_fields().first() {
            return Err(BookingError::validation(field, "this field is required"));
        }
        if let Some((field, message)) = self.contact.format_problem() {
            return Err(BookingError::validation(field, message));
        }
        Ok(())
    }

    /// Branch must be chosen before submission
    ///
    /// # Errors
    ///
    /// Returns a validation error when no branch is set
    pub fn require_branch(&self) -> BookingResult<&str> {
        self.branch_id()
            .ok_or_else(|| BookingError::validation("branch", "choose a branch"))
    }
}
