// ABOUTME: Booking workflow error taxonomy covering validation, coupons, slots, and submission
// ABOUTME: Structured errors that integrate with the main AppError system
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Booking Error Types
//!
//! Every failure the booking wizard can surface maps onto one variant here:
//! - `Validation` - missing services, date/time, or contact fields (inline, recoverable)
//! - `CouponInvalid` - unknown coupon code (dismissible, pricing unaffected)
//! - `SlotUnavailable` - final availability check failed (route back to Schedule)
//! - `PartialSubmission` - some create calls failed after others succeeded
//! - `SubmissionFailed` - nothing was booked (generic retry)
//!
//! A corrupt pending-booking payload never becomes an error; it is treated as absent.

use super::{AppError, DatabaseError, ErrorCode};
use crate::models::{Appointment, TimeSlot};
use chrono::NaiveDate;
use serde_json::json;

/// A service whose create-appointment call failed
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ServiceFailure {
    /// Catalog service identifier
    pub service_id: String,
    /// Display name of the service
    pub service_name: String,
    /// Why the booking failed
    pub reason: String,
    /// Whether the call exceeded the submission timeout
    pub timed_out: bool,
}

/// Errors produced by the booking workflow
#[derive(Debug, Clone, thiserror::Error)]
pub enum BookingError {
    /// A step precondition or input check failed
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Offending draft field (services, date, time, email, ...)
        field: &'static str,
        /// What needs fixing
        message: String,
    },
    /// The coupon code is not in the registry
    #[error("Coupon code '{code}' is not valid")]
    CouponInvalid {
        /// The code as entered
        code: String,
    },
    /// The final availability check rejected the slot
    #[error("The {time} slot on {date} is no longer available for '{service_id}'")]
    SlotUnavailable {
        /// Service that could not be placed
        service_id: String,
        /// Requested day
        date: NaiveDate,
        /// Requested slot
        time: TimeSlot,
        /// Appointments created earlier in the same batch
        booked: Vec<Appointment>,
        /// Earlier services in the batch whose create call failed
        failed: Vec<ServiceFailure>,
    },
    /// Some services were booked, others failed
    #[error("{} of {} services were booked", .booked.len(), .booked.len() + .failed.len())]
    PartialSubmission {
        /// Appointments that were created and stand
        booked: Vec<Appointment>,
        /// Services that were not booked
        failed: Vec<ServiceFailure>,
    },
    /// No appointment could be created
    #[error("Booking could not be completed: {reason}")]
    SubmissionFailed {
        /// Summary of the failure
        reason: String,
    },
    /// The action requires a signed-in customer
    #[error("Sign-in is required to confirm the booking")]
    AuthRequired,
    /// The requested wizard transition is not allowed from the current step
    #[error("Invalid transition: {message}")]
    InvalidTransition {
        /// Description of the rejected transition
        message: String,
    },
    /// A repository call failed
    #[error(transparent)]
    Repository(#[from] DatabaseError),
    /// The key/value store failed
    #[error("Storage error: {reason}")]
    Storage {
        /// Underlying failure
        reason: String,
    },
}

impl BookingError {
    /// Create a validation error
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Create an invalid transition error
    #[must_use]
    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::InvalidTransition {
            message: message.into(),
        }
    }

    /// Appointments that were created before this error occurred
    #[must_use]
    pub fn booked(&self) -> &[Appointment] {
        match self {
            Self::SlotUnavailable { booked, .. } | Self::PartialSubmission { booked, .. } => {
                booked
            }
            _ => &[],
        }
    }

    /// Error code used when rendering this error
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::MissingRequiredField,
            Self::CouponInvalid { .. } | Self::InvalidTransition { .. } => ErrorCode::InvalidInput,
            Self::SlotUnavailable { .. } => ErrorCode::ResourceUnavailable,
            Self::PartialSubmission { .. } | Self::SubmissionFailed { .. } => {
                ErrorCode::ExternalServiceError
            }
            Self::AuthRequired => ErrorCode::AuthRequired,
            Self::Repository(_) => ErrorCode::DatabaseError,
            Self::Storage { .. } => ErrorCode::StorageError,
        }
    }
}

impl From<BookingError> for AppError {
    fn from(error: BookingError) -> Self {
        let details = match &error {
            BookingError::Validation { field, .. } => json!({ "field": field }),
            BookingError::CouponInvalid { code } => json!({ "coupon": code }),
            BookingError::SlotUnavailable {
                service_id,
                date,
                time,
                booked,
                failed,
            } => json!({
                "service_id": service_id,
                "date": date.to_string(),
                "time": time.label(),
                "booked_service_ids": booked_service_ids(booked),
                "failed_service_ids": failed_service_ids(failed),
            }),
            BookingError::PartialSubmission { booked, failed } => json!({
                "booked_service_ids": booked_service_ids(booked),
                "failed_service_ids": failed_service_ids(failed),
            }),
            _ => serde_json::Value::Null,
        };
        Self::new(error.code(), error.to_string()).with_details(details)
    }
}

fn booked_service_ids(booked: &[Appointment]) -> Vec<&str> {
    booked
        .iter()
        .flat_map(|appointment| appointment.services.iter())
        .map(|item| item.service_id.as_str())
        .collect()
}

fn failed_service_ids(failed: &[ServiceFailure]) -> Vec<&str> {
    failed.iter().map(|f| f.service_id.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_submission_message_counts_services() {
        let error = BookingError::PartialSubmission {
            booked: Vec::new(),
            failed: vec![ServiceFailure {
                service_id: "s2".to_owned(),
                service_name: "Facial".to_owned(),
                reason: "timeout".to_owned(),
                timed_out: true,
            }],
        };
        assert_eq!(error.to_string(), "0 of 1 services were booked");
    }

    #[test]
    fn test_slot_unavailable_maps_to_resource_unavailable() {
        let error = BookingError::SlotUnavailable {
            service_id: "s2".to_owned(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            time: TimeSlot::parse("10:00").unwrap(),
            booked: Vec::new(),
            failed: vec![ServiceFailure {
                service_id: "s1".to_owned(),
                service_name: "Haircut".to_owned(),
                reason: "network down".to_owned(),
                timed_out: false,
            }],
        };
        let app_error = AppError::from(error);

        assert_eq!(app_error.code, ErrorCode::ResourceUnavailable);
        assert_eq!(app_error.details["service_id"], "s2");
        assert_eq!(app_error.details["time"], "10:00 AM");
        assert_eq!(app_error.details["failed_service_ids"][0], "s1");
    }
}
