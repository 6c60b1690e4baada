// ABOUTME: Async orchestrator owning one wizard state and its external collaborators
// ABOUTME: Drives coupon lookup, the sign-in handoff, submission, and appointment history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use crate::auth::AuthProvider;
use crate::availability::{AppointmentAvailabilityChecker, AvailabilityChecker};
use crate::config::BookingConfig;
use crate::database::{
    AppointmentRepository, BranchRepository, CatalogRepository, StaffRepository,
};
use crate::errors::{BookingError, BookingResult, DatabaseError};
use crate::models::{
    Appointment, AppointmentStatus, Branch, Coupon, CustomerIdentity, ServiceOffering,
};
use crate::logging::BookingLogger;
use crate::pricing::CouponRegistry;
use crate::store::KeyValueStore;
use tracing::{info, warn};
use uuid::Uuid;

use super::pending::PendingBookingPersistence;
use super::state_machine::{
    BookingEvent, BookingState, BookingStateMachine, EntryContext, WizardStep,
};
use super::submitter::{AppointmentSubmitter, RandomStaffAssignment, StaffAssignmentStrategy};

/// External services a booking session talks to
pub struct Collaborators {
    /// Service catalog
    pub catalog: Arc<dyn CatalogRepository>,
    /// Branch listing
    pub branches: Arc<dyn BranchRepository>,
    /// Staff directory
    pub staff: Arc<dyn StaffRepository>,
    /// Appointment store
    pub appointments: Arc<dyn AppointmentRepository>,
    /// Coupon codes
    pub coupons: Arc<dyn CouponRegistry>,
    /// Signed-in customer
    pub auth: Arc<dyn AuthProvider>,
    /// Storage for the pending-booking handoff
    pub store: Arc<dyn KeyValueStore>,
}

/// Shared, session-independent wiring
pub struct BookingContext {
    catalog: Arc<dyn CatalogRepository>,
    branches: Arc<dyn BranchRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    coupons: Arc<dyn CouponRegistry>,
    auth: Arc<dyn AuthProvider>,
    pending: PendingBookingPersistence,
    submitter: AppointmentSubmitter,
    machine: BookingStateMachine,
}

impl BookingContext {
    /// Wire collaborators with random staff assignment
    #[must_use]
    pub fn new(config: &BookingConfig, parts: Collaborators) -> Self {
        let availability: Arc<dyn AvailabilityChecker> =
            Arc::new(AppointmentAvailabilityChecker::with_duration(
                parts.appointments.clone(),
                config.scheduling.appointment_duration_minutes,
            ));
        let assignment: Arc<dyn StaffAssignmentStrategy> = Arc::new(RandomStaffAssignment::new(
            parts.staff,
            availability.clone(),
        ));
        let submitter =
            AppointmentSubmitter::new(parts.appointments.clone(), availability, assignment)
                .with_timeout(config.submission.timeout);

        Self {
            catalog: parts.catalog,
            branches: parts.branches,
            appointments: parts.appointments,
            coupons: parts.coupons,
            auth: parts.auth,
            pending: PendingBookingPersistence::from_config(parts.store, &config.pending),
            submitter,
            machine: BookingStateMachine::from_config(config),
        }
    }

    /// Replace the submitter, for example to use another assignment strategy
    #[must_use]
    pub fn with_submitter(mut self, submitter: AppointmentSubmitter) -> Self {
        self.submitter = submitter;
        self
    }

    /// Transition rules in use
    #[must_use]
    pub const fn machine(&self) -> &BookingStateMachine {
        &self.machine
    }

    /// Pending-booking handoff in use
    #[must_use]
    pub const fn pending(&self) -> &PendingBookingPersistence {
        &self.pending
    }
}

/// Result of entering a coupon code
#[derive(Debug, Clone, PartialEq)]
pub enum CouponOutcome {
    /// The coupon now applies to the draft
    Applied(Coupon),
    /// The code is unknown; any previous coupon still applies
    Rejected {
        /// Normalized code
        code: String,
    },
}

/// One customer's pass through the wizard
pub struct BookingSession {
    context: Arc<BookingContext>,
    state: BookingState,
    history: Vec<Appointment>,
}

impl BookingSession {
    /// Start a session at the step the entry context and sign-in status allow
    ///
    /// # Errors
    ///
    /// Returns an error if appointment history cannot be loaded for a signed-in customer
    pub async fn start(context: Arc<BookingContext>, entry: EntryContext) -> BookingResult<Self> {
        let identity = context.auth.current_identity().await;
        let state = context.machine.initial(entry, identity.as_ref());
        let mut session = Self {
            context,
            state,
            history: Vec::new(),
        };
        if identity.is_some() {
            session.refresh_history().await?;
        }
        Ok(session)
    }

    /// Current wizard state
    #[must_use]
    pub const fn state(&self) -> &BookingState {
        &self.state
    }

    /// Appointment history as last loaded, newest first
    #[must_use]
    pub fn history(&self) -> &[Appointment] {
        &self.history
    }

    /// Apply an event; on error the state is left unchanged
    ///
    /// # Errors
    ///
    /// Returns the state machine's validation or transition error
    pub fn dispatch(&mut self, event: BookingEvent) -> BookingResult<&BookingState> {
        self.state = self.context.machine.transition(&self.state, event)?;
        Ok(&self.state)
    }

    /// Catalog listing, optionally for one category
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read
    pub async fn services(&self, category: Option<&str>) -> BookingResult<Vec<ServiceOffering>> {
        Ok(self.context.catalog.list_services(category).await?)
    }

    /// Branches a customer can book at
    ///
    /// # Errors
    ///
    /// Returns an error if branches cannot be read
    pub async fn branches(&self) -> BookingResult<Vec<Branch>> {
        Ok(self.context.branches.list_branches().await?)
    }

    /// Look up a catalog service and add it to the draft
    ///
    /// # Errors
    ///
    /// Returns a validation error for unknown or sold-out services
    pub async fn add_service_by_id(&mut self, service_id: &str) -> BookingResult<&BookingState> {
        let service = self
            .context
            .catalog
            .get_service(service_id)
            .await?
            .ok_or_else(|| {
                BookingError::validation("services", format!("unknown service '{service_id}'"))
            })?;
        self.dispatch(BookingEvent::AddService(service))
    }

    /// Look up `code` and apply it; unknown codes leave the draft's coupon alone
    ///
    /// # Errors
    ///
    /// Returns an error only if the registry fails or the booking is already complete
    pub async fn apply_coupon(&mut self, code: &str) -> BookingResult<CouponOutcome> {
        let code = Coupon::normalize_code(code);
        let found = if code.is_empty() {
            None
        } else {
            self.context.coupons.lookup(&code).await?
        };

        if let Some(coupon) = found {
            info!(coupon = %coupon.code, "Coupon applied");
            self.dispatch(BookingEvent::ApplyCoupon(coupon.clone()))?;
            Ok(CouponOutcome::Applied(coupon))
        } else {
            info!(coupon = %code, "Coupon rejected");
            self.dispatch(BookingEvent::RejectCoupon { code: code.clone() })?;
            Ok(CouponOutcome::Rejected { code })
        }
    }

    /// Save the booking and hand over to the sign-in flow
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be stored or sign-in cannot start
    pub async fn request_sign_in(&self) -> BookingResult<()> {
        self.context
            .pending
            .save(self.state.step(), self.state.draft())
            .await?;
        self.context.auth.begin_sign_in().await
    }

    /// Resume after a successful sign-in
    ///
    /// A pending booking is restored if one was saved; otherwise a draft in
    /// progress is kept with the customer now signed in, and an empty one
    /// falls back to the default signed-in entry. An unreadable store counts
    /// as no pending booking.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` if nobody is signed in, or a repository error
    pub async fn on_signed_in(&mut self) -> BookingResult<&BookingState> {
        let identity = self
            .context
            .auth
            .current_identity()
            .await
            .ok_or(BookingError::AuthRequired)?;

        let pending = match self.context.pending.load_and_clear().await {
            Ok(pending) => pending,
            Err(e) => {
                BookingLogger::log_pending_discarded(&format!("store unreadable: {e}"));
                None
            }
        };

        match pending {
            Some(pending) => {
                self.dispatch(BookingEvent::Restore {
                    step: pending.step,
                    draft: pending.draft,
                })?;
                self.dispatch(BookingEvent::AuthChanged(Some(identity)))?;
            }
            None if self.state.is_auth_gated() || !self.state.draft().services().is_empty() => {
                self.dispatch(BookingEvent::AuthChanged(Some(identity)))?;
            }
            None => {
                self.state = self
                    .context
                    .machine
                    .initial(EntryContext::ReturningUser, Some(&identity));
            }
        }

        self.refresh_history().await?;
        Ok(&self.state)
    }

    /// Submit the draft from the Confirm step
    ///
    /// On success the session moves to Success and the receipt is returned.
    /// On failure the error is recorded in the state as well as returned.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when nobody is signed in, or the submitter's error
    pub async fn submit(&mut self) -> BookingResult<Vec<Appointment>> {
        if self.state.step() != WizardStep::Confirm {
            return Err(BookingError::invalid_transition(format!(
                "cannot submit from {}",
                self.state.step()
            )));
        }
        let Some(identity) = self.context.auth.current_identity().await else {
            self.dispatch(BookingEvent::AuthChanged(None))?;
            return Err(BookingError::AuthRequired);
        };
        if self.state.is_auth_gated() {
            return Err(BookingError::AuthRequired);
        }

        match self
            .context
            .submitter
            .submit(&identity.user_id, self.state.draft())
            .await
        {
            Ok(created) => {
                self.dispatch(BookingEvent::SubmissionSucceeded(created))?;
                Ok(self
                    .state
                    .receipt()
                    .map(|receipt| receipt.appointments)
                    .unwrap_or_default())
            }
            Err(error) => {
                warn!(error = %error, "Booking submission failed");
                self.dispatch(BookingEvent::SubmissionFailed(error.clone()))?;
                Err(error)
            }
        }
    }

    /// Leave Success for a fresh draft and reload history
    ///
    /// # Errors
    ///
    /// Returns an error if the booking is not complete or history cannot be loaded
    pub async fn finish(&mut self) -> BookingResult<&BookingState> {
        self.dispatch(BookingEvent::Finish)?;
        self.refresh_history().await?;
        Ok(&self.state)
    }

    /// Reload the signed-in customer's appointments, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be read
    pub async fn refresh_history(&mut self) -> BookingResult<&[Appointment]> {
        let identity = self.context.auth.current_identity().await;
        self.history = match identity {
            Some(identity) => {
                let mut appointments = self
                    .context
                    .appointments
                    .list_mine(&identity.user_id)
                    .await?;
                appointments.sort_by(|a, b| {
                    (b.date, b.time, b.created_at).cmp(&(a.date, a.time, a.created_at))
                });
                appointments
            }
            None => Vec::new(),
        };
        self.dispatch(BookingEvent::HistoryRefreshed)?;
        Ok(&self.history)
    }

    /// Cancel one of the signed-in customer's appointments
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when nobody is signed in and `NotFound` when the
    /// appointment does not belong to the customer
    pub async fn cancel_appointment(&mut self, id: Uuid) -> BookingResult<Appointment> {
        let identity: CustomerIdentity = self
            .context
            .auth
            .current_identity()
            .await
            .ok_or(BookingError::AuthRequired)?;

        let owned = self
            .context
            .appointments
            .list_mine(&identity.user_id)
            .await?
            .iter()
            .any(|a| a.id == id);
        if !owned {
            return Err(DatabaseError::NotFound {
                entity: "appointment",
                id: id.to_string(),
            }
            .into());
        }

        let cancelled = self
            .context
            .appointments
            .update_status(id, AppointmentStatus::Cancelled)
            .await?;
        info!(appointment_id = %id, "Appointment cancelled");
        self.refresh_history().await?;
        Ok(cancelled)
    }
}
