// ABOUTME: Booking workflow: draft, wizard state machine, submission, and sign-in handoff
// ABOUTME: The session module wires these pieces to repositories, auth, and storage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// In-progress booking aggregate
pub mod draft;
/// Pending booking snapshot across sign-in
pub mod pending;
/// Session orchestrator
pub mod session;
/// Wizard steps, events, and transitions
pub mod state_machine;
/// Appointment submission and staff assignment
pub mod submitter;

pub use draft::BookingDraft;
pub use pending::{PendingBooking, PendingBookingPersistence};
pub use session::{BookingContext, BookingSession, Collaborators, CouponOutcome};
pub use state_machine::{
    BookingEvent, BookingState, BookingStateMachine, EntryContext, Receipt, WizardStep,
};
pub use submitter::{AppointmentSubmitter, RandomStaffAssignment, StaffAssignmentStrategy};
