// ABOUTME: Five-step booking wizard as a pure (state, event) -> state transition function
// ABOUTME: Enforces step guards, the Confirm auth gate, and recomputes pricing on every transition
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Booking Wizard
//!
//! ```text
//! Dashboard(0) -> Services(1) -> Schedule(2) -> Confirm(3) -> Success(4)
//!                     ^              |              |             |
//!                     +-- add more --+--------------+             |
//! Dashboard <--------------------------- finish ------------------+
//! ```
//!
//! [`BookingStateMachine::transition`] never mutates its input. It clones the
//! state, applies the event, recomputes pricing, and returns the new state,
//! so the draft and the step always change together. A rejected event
//! returns an error and the caller keeps the old state.

use std::fmt;

use crate::config::BookingConfig;
use crate::errors::{BookingError, BookingResult};
use crate::models::{
    Appointment, Coupon, CustomerContact, CustomerIdentity, PaymentMethod, ServiceOffering,
    TimeSlot,
};
use crate::pricing::{PriceBreakdown, PricingEngine};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::draft::BookingDraft;

/// Wizard position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum WizardStep {
    /// Personal landing page with appointment history
    Dashboard = 0,
    /// Service selection
    Services = 1,
    /// Date and time selection
    Schedule = 2,
    /// Review, contact details, and submission
    Confirm = 3,
    /// Receipt
    Success = 4,
}

impl WizardStep {
    /// Numeric step index
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> Self {
        step.index()
    }
}

impl TryFrom<u8> for WizardStep {
    type Error = BookingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Dashboard),
            1 => Ok(Self::Services),
            2 => Ok(Self::Schedule),
            3 => Ok(Self::Confirm),
            4 => Ok(Self::Success),
            other => Err(BookingError::invalid_transition(format!(
                "unknown wizard step {other}"
            ))),
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Dashboard => "Dashboard",
            Self::Services => "Services",
            Self::Schedule => "Schedule",
            Self::Confirm => "Confirm",
            Self::Success => "Success",
        };
        f.write_str(name)
    }
}

/// How the customer arrived at the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryContext {
    /// Direct "book now" link
    BookNow,
    /// Returning customer landing on their history
    ReturningUser,
}

/// Inputs to the wizard
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum BookingEvent {
    /// Choose the target branch
    SelectBranch(String),
    /// Add a catalog service to the selection
    AddService(ServiceOffering),
    /// Remove a service by ID
    RemoveService(String),
    /// Add the service if absent, remove it if present
    ToggleService(ServiceOffering),
    /// Choose the day
    SetDate(NaiveDate),
    /// Choose a slot from the configured enumeration
    SetTime(TimeSlot),
    /// Replace the contact fields
    UpdateContact(CustomerContact),
    /// Choose how the customer pays
    SetPaymentMethod(PaymentMethod),
    /// Replace the free-text notes
    SetNotes(String),
    /// A coupon lookup succeeded
    ApplyCoupon(Coupon),
    /// A coupon lookup found nothing
    RejectCoupon {
        /// The code as entered
        code: String,
    },
    /// Drop the applied coupon
    RemoveCoupon,
    /// Jump to a step, subject to its entry guards
    GoTo(WizardStep),
    /// Advance one step
    Continue,
    /// Go back one step
    Back,
    /// Return to Services to extend the selection
    AddMoreServices,
    /// The signed-in identity changed
    AuthChanged(Option<CustomerIdentity>),
    /// Replace step and draft with a pending booking
    Restore {
        /// Step saved with the draft
        step: WizardStep,
        /// Saved draft
        draft: BookingDraft,
    },
    /// Every remaining service was booked
    SubmissionSucceeded(Vec<Appointment>),
    /// Submission stopped short
    SubmissionFailed(BookingError),
    /// Leave Success for a fresh draft
    Finish,
    /// Appointment history has been reloaded
    HistoryRefreshed,
    /// Clear the surfaced error
    DismissError,
}

impl BookingEvent {
    const fn name(&self) -> &'static str {
        match self {
            Self::SelectBranch(_) => "select_branch",
            Self::AddService(_) => "add_service",
            Self::RemoveService(_) => "remove_service",
            Self::ToggleService(_) => "toggle_service",
            Self::SetDate(_) => "set_date",
            Self::SetTime(_) => "set_time",
            Self::UpdateContact(_) => "update_contact",
            Self::SetPaymentMethod(_) => "set_payment_method",
            Self::SetNotes(_) => "set_notes",
            Self::ApplyCoupon(_) => "apply_coupon",
            Self::RejectCoupon { .. } => "reject_coupon",
            Self::RemoveCoupon => "remove_coupon",
            Self::GoTo(_) => "go_to",
            Self::Continue => "continue",
            Self::Back => "back",
            Self::AddMoreServices => "add_more_services",
            Self::AuthChanged(_) => "auth_changed",
            Self::Restore { .. } => "restore",
            Self::SubmissionSucceeded(_) => "submission_succeeded",
            Self::SubmissionFailed(_) => "submission_failed",
            Self::Finish => "finish",
            Self::HistoryRefreshed => "history_refreshed",
            Self::DismissError => "dismiss_error",
        }
    }

    /// Events that edit the draft; refused once the booking is complete
    const fn mutates_draft(&self) -> bool {
        matches!(
            self,
            Self::SelectBranch(_)
                | Self::AddService(_)
                | Self::RemoveService(_)
                | Self::ToggleService(_)
                | Self::SetDate(_)
                | Self::SetTime(_)
                | Self::UpdateContact(_)
                | Self::SetPaymentMethod(_)
                | Self::SetNotes(_)
                | Self::ApplyCoupon(_)
                | Self::RejectCoupon { .. }
                | Self::RemoveCoupon
                | Self::AddMoreServices
                | Self::Restore { .. }
        )
    }
}

/// Created appointments with the quoted totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    /// Appointments in draft service order
    pub appointments: Vec<Appointment>,
    /// Totals quoted for the draft
    pub pricing: PriceBreakdown,
}

/// Everything the renderer needs for one wizard session
#[derive(Debug, Clone)]
pub struct BookingState {
    step: WizardStep,
    draft: BookingDraft,
    authenticated: bool,
    auth_gate: bool,
    return_to: Option<WizardStep>,
    pricing: PriceBreakdown,
    error: Option<BookingError>,
    receipt: Vec<Appointment>,
    history_stale: bool,
}

impl BookingState {
    /// Current step
    #[must_use]
    pub const fn step(&self) -> WizardStep {
        self.step
    }

    /// Live draft
    #[must_use]
    pub const fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    /// Whether a customer is signed in
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Confirm is showing the sign-in requirement instead of the submit form
    #[must_use]
    pub const fn is_auth_gated(&self) -> bool {
        self.auth_gate
    }

    /// Where Back goes from Services after "add more services"
    #[must_use]
    pub const fn return_to(&self) -> Option<WizardStep> {
        self.return_to
    }

    /// Totals for the live draft
    #[must_use]
    pub const fn pricing(&self) -> &PriceBreakdown {
        &self.pricing
    }

    /// Error to show inline, if any
    #[must_use]
    pub const fn error(&self) -> Option<&BookingError> {
        self.error.as_ref()
    }

    /// Whether appointment history needs reloading
    #[must_use]
    pub const fn history_stale(&self) -> bool {
        self.history_stale
    }

    /// The Success step's receipt
    #[must_use]
    pub fn receipt(&self) -> Option<Receipt> {
        (self.step == WizardStep::Success).then(|| Receipt {
            appointments: self.receipt.clone(),
            pricing: self.pricing,
        })
    }
}

/// Transition rules for the booking wizard
#[derive(Debug, Clone)]
pub struct BookingStateMachine {
    pricing: PricingEngine,
    time_slots: Vec<TimeSlot>,
}

impl Default for BookingStateMachine {
    fn default() -> Self {
        Self::from_config(&BookingConfig::default())
    }
}

impl BookingStateMachine {
    /// Create a machine; an empty slot list accepts any time
    #[must_use]
    pub const fn new(pricing: PricingEngine, time_slots: Vec<TimeSlot>) -> Self {
        Self {
            pricing,
            time_slots,
        }
    }

    /// Create a machine from configuration
    #[must_use]
    pub fn from_config(config: &BookingConfig) -> Self {
        Self::new(
            config.pricing_engine(),
            config.scheduling.time_slots.clone(),
        )
    }

    /// Selectable slots
    #[must_use]
    pub fn time_slots(&self) -> &[TimeSlot] {
        &self.time_slots
    }

    /// Pricing engine used for every recomputation
    #[must_use]
    pub const fn pricing(&self) -> &PricingEngine {
        &self.pricing
    }

    /// Initial state for an entry context
    ///
    /// Dashboard is personal, so an anonymous customer starts at Services.
    #[must_use]
    pub fn initial(
        &self,
        entry: EntryContext,
        identity: Option<&CustomerIdentity>,
    ) -> BookingState {
        let mut draft = BookingDraft::new();
        if let Some(identity) = identity {
            draft.prefill_contact(identity);
        }
        let authenticated = identity.is_some();
        let requested = match entry {
            EntryContext::BookNow => WizardStep::Services,
            EntryContext::ReturningUser => WizardStep::Dashboard,
        };

        let mut state = BookingState {
            step: requested,
            draft,
            authenticated,
            auth_gate: false,
            return_to: None,
            pricing: PriceBreakdown::default(),
            error: None,
            receipt: Vec::new(),
            history_stale: authenticated,
        };
        state.step = Self::redirect_dashboard(&state, requested);
        self.reprice(&mut state);
        state
    }

    /// Apply `event` to `state`
    ///
    /// # Errors
    ///
    /// Returns a validation error when a step guard or draft rule rejects the
    /// event, or an invalid-transition error when the event does not apply to
    /// the current step. The input state is never modified.
    pub fn transition(
        &self,
        state: &BookingState,
        event: BookingEvent,
    ) -> BookingResult<BookingState> {
        let from = state.step;
        let name = event.name();

        if state.step == WizardStep::Success && event.mutates_draft() {
            return Err(BookingError::invalid_transition(format!(
                "{name} is not allowed after the booking is complete"
            )));
        }

        let mut next = state.clone();
        let keep_error = self.apply(&mut next, event)?;
        if !keep_error {
            next.error = None;
        }
        self.reprice(&mut next);

        debug!(
            event = name,
            from = %from,
            to = %next.step,
            auth_gate = next.auth_gate,
            services = next.draft.services().len(),
            total = next.pricing.total,
            "Booking transition"
        );
        Ok(next)
    }

    /// Apply one event in place; returns whether the event set the error itself
    fn apply(&self, state: &mut BookingState, event: BookingEvent) -> BookingResult<bool> {
        match event {
            BookingEvent::SelectBranch(branch_id) => state.draft.set_branch(branch_id),
            BookingEvent::AddService(service) => {
                state.draft.add_service(service)?;
            }
            BookingEvent::RemoveService(service_id) => {
                state.draft.remove_service(&service_id);
                Self::require_selection(state);
            }
            BookingEvent::ToggleService(service) => {
                state.draft.toggle_service(service)?;
                Self::require_selection(state);
            }
            BookingEvent::SetDate(date) => state.draft.set_date(date),
            BookingEvent::SetTime(time) => {
                self.require_known_slot(time)?;
                state.draft.set_time(time);
            }
            BookingEvent::UpdateContact(contact) => state.draft.set_contact(contact),
            BookingEvent::SetPaymentMethod(method) => state.draft.set_payment_method(method),
            BookingEvent::SetNotes(notes) => state.draft.set_notes(notes),
            BookingEvent::ApplyCoupon(coupon) => state.draft.set_coupon(coupon),
            BookingEvent::RejectCoupon { code } => {
                state.error = Some(BookingError::CouponInvalid { code });
                return Ok(true);
            }
            BookingEvent::RemoveCoupon => {
                state.draft.clear_coupon();
            }
            BookingEvent::GoTo(target) => Self::go_to(state, target)?,
            BookingEvent::Continue => Self::advance(state)?,
            BookingEvent::Back => Self::retreat(state)?,
            BookingEvent::AddMoreServices => {
                if matches!(state.step, WizardStep::Schedule | WizardStep::Confirm) {
                    state.return_to = Some(WizardStep::Schedule);
                }
                Self::enter(state, WizardStep::Services);
            }
            BookingEvent::AuthChanged(identity) => Self::auth_changed(state, identity),
            BookingEvent::Restore { step, draft } => Self::restore(state, step, draft),
            BookingEvent::SubmissionSucceeded(created) => Self::succeed(state, &created)?,
            BookingEvent::SubmissionFailed(error) => {
                Self::fail(state, error)?;
                return Ok(true);
            }
            BookingEvent::Finish => Self::finish(state)?,
            BookingEvent::HistoryRefreshed => {
                state.history_stale = false;
                return Ok(state.error.is_some());
            }
            BookingEvent::DismissError => {}
        }
        Ok(false)
    }

    fn reprice(&self, state: &mut BookingState) {
        state.pricing = self
            .pricing
            .quote(state.draft.services(), state.draft.coupon());
    }

    fn require_known_slot(&self, time: TimeSlot) -> BookingResult<()> {
        if self.time_slots.is_empty() || self.time_slots.contains(&time) {
            return Ok(());
        }
        Err(BookingError::validation(
            "time",
            format!("{time} is not an available slot"),
        ))
    }

    /// Dashboard is only for signed-in customers
    fn redirect_dashboard(state: &BookingState, target: WizardStep) -> WizardStep {
        if target == WizardStep::Dashboard && !state.authenticated {
            WizardStep::Services
        } else {
            target
        }
    }

    /// Set the step and the submodes that depend on it
    fn enter(state: &mut BookingState, target: WizardStep) {
        let target = Self::redirect_dashboard(state, target);
        if target != WizardStep::Services {
            state.return_to = None;
        }
        state.auth_gate = target == WizardStep::Confirm && !state.authenticated;
        state.step = target;
    }

    /// An empty selection cannot stay past Services
    fn require_selection(state: &mut BookingState) {
        if state.draft.services().is_empty()
            && matches!(state.step, WizardStep::Schedule | WizardStep::Confirm)
        {
            state.return_to = None;
            Self::enter(state, WizardStep::Services);
        }
    }

    /// Entry guards shared by Continue and `GoTo`
    fn check_entry(state: &BookingState, target: WizardStep) -> BookingResult<()> {
        match target {
            WizardStep::Dashboard | WizardStep::Services => Ok(()),
            WizardStep::Schedule => state.draft.require_services(),
            WizardStep::Confirm => {
                state.draft.require_services()?;
                state.draft.require_schedule().map(|_| ())
            }
            WizardStep::Success => Err(BookingError::invalid_transition(
                "Success is reached only by a completed submission",
            )),
        }
    }

    fn go_to(state: &mut BookingState, target: WizardStep) -> BookingResult<()> {
        if state.step == WizardStep::Success {
            if target == WizardStep::Dashboard {
                return Self::finish(state);
            }
            return Err(BookingError::invalid_transition(
                "Success can only be left for the Dashboard",
            ));
        }
        Self::check_entry(state, target)?;
        Self::enter(state, target);
        Ok(())
    }

    fn advance(state: &mut BookingState) -> BookingResult<()> {
        let target = match state.step {
            WizardStep::Dashboard => WizardStep::Services,
            WizardStep::Services => WizardStep::Schedule,
            WizardStep::Schedule => WizardStep::Confirm,
            WizardStep::Confirm => {
                return Err(BookingError::invalid_transition(
                    "Confirm advances only by submitting the booking",
                ))
            }
            WizardStep::Success => {
                return Err(BookingError::invalid_transition(
                    "use Finish to leave Success",
                ))
            }
        };
        Self::check_entry(state, target)?;
        Self::enter(state, target);
        Ok(())
    }

    fn retreat(state: &mut BookingState) -> BookingResult<()> {
        let target = match state.step {
            WizardStep::Dashboard => WizardStep::Dashboard,
            WizardStep::Services => state.return_to.take().unwrap_or(WizardStep::Dashboard),
            WizardStep::Schedule => WizardStep::Services,
            WizardStep::Confirm => WizardStep::Schedule,
            WizardStep::Success => {
                return Err(BookingError::invalid_transition(
                    "use Finish to leave Success",
                ))
            }
        };
        Self::check_entry(state, target)?;
        Self::enter(state, target);
        Ok(())
    }

    fn auth_changed(state: &mut BookingState, identity: Option<CustomerIdentity>) {
        match identity {
            Some(identity) => {
                state.draft.prefill_contact(&identity);
                state.authenticated = true;
                state.auth_gate = false;
                state.history_stale = true;
            }
            None => {
                state.authenticated = false;
                let step = state.step;
                if step != WizardStep::Success {
                    Self::enter(state, step);
                }
            }
        }
    }

    /// Install a saved draft at the furthest step its contents allow
    fn restore(state: &mut BookingState, step: WizardStep, draft: BookingDraft) {
        state.draft = draft;
        state.return_to = None;

        let mut target = step.min(WizardStep::Confirm);
        while target > WizardStep::Services && Self::check_entry(state, target).is_err() {
            target = match target {
                WizardStep::Confirm => WizardStep::Schedule,
                _ => WizardStep::Services,
            };
        }
        Self::enter(state, target);
    }

    fn succeed(state: &mut BookingState, created: &[Appointment]) -> BookingResult<()> {
        if state.step != WizardStep::Confirm || state.auth_gate {
            return Err(BookingError::invalid_transition(
                "a submission can only complete from an authorized Confirm step",
            ));
        }
        state.draft.record_booked(created);

        let order = state.draft.service_ids();
        let position = |appointment: &Appointment| {
            order
                .iter()
                .position(|id| appointment.covers_service(id))
                .unwrap_or(usize::MAX)
        };
        let mut receipt = state.draft.booked().to_vec();
        receipt.sort_by_key(position);

        state.receipt = receipt;
        state.step = WizardStep::Success;
        Ok(())
    }

    fn fail(state: &mut BookingState, error: BookingError) -> BookingResult<()> {
        if state.step != WizardStep::Confirm {
            return Err(BookingError::invalid_transition(
                "a submission can only fail from the Confirm step",
            ));
        }
        state.draft.record_booked(error.booked());
        if matches!(error, BookingError::SlotUnavailable { .. }) {
            state.draft.clear_time();
            Self::enter(state, WizardStep::Schedule);
        }
        state.error = Some(error);
        Ok(())
    }

    fn finish(state: &mut BookingState) -> BookingResult<()> {
        if state.step != WizardStep::Success {
            return Err(BookingError::invalid_transition(
                "only a completed booking can be finished",
            ));
        }
        state.draft = BookingDraft::new();
        state.receipt.clear();
        state.history_stale = true;
        Self::enter(state, WizardStep::Dashboard);
        Ok(())
    }
}
