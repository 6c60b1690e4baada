// ABOUTME: Appointment entity, lifecycle status, and create-appointment payload
// ABOUTME: Appointments are owned by the repository and read by the core for availability
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use super::{CustomerContact, TimeSlot};
use crate::errors::AppError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Appointment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Booked and upcoming
    #[default]
    Scheduled,
    /// Customer is being served
    InProgress,
    /// Service delivered
    Completed,
    /// Cancelled by the customer or the salon
    Cancelled,
}

impl AppointmentStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether an appointment in this status occupies its staff member's time
    #[must_use]
    pub const fn blocks_availability(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl Display for AppointmentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Scheduled => "Scheduled",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

impl FromStr for AppointmentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(' ', "_").as_str() {
            "scheduled" => Ok(Self::Scheduled),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(AppError::invalid_input(format!(
                "Invalid appointment status: {s}"
            ))),
        }
    }
}

/// Payment method tag carried on the appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Pay at the salon after the service
    #[default]
    PayAtSalon,
    /// Card payment through the gateway
    Card,
    /// UPI payment through the gateway
    Upi,
}

impl PaymentMethod {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PayAtSalon => "pay_at_salon",
            Self::Card => "card",
            Self::Upi => "upi",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "card" => Self::Card,
            "upi" => Self::Upi,
            // Unknown tags fall back to paying in person
            _ => Self::PayAtSalon,
        }
    }
}

/// A service line on an appointment with its locked-in price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentLineItem {
    /// Catalog service identifier
    pub service_id: String,
    /// Price locked in at booking time
    pub price: f64,
}

/// Payload for the repository's create operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    /// Identity of the customer who owns the appointment
    pub customer_id: String,
    /// Branch where the service is delivered
    pub branch_id: String,
    /// Assigned staff member
    pub staff_id: String,
    /// Calendar day
    pub date: NaiveDate,
    /// Start slot
    pub time: TimeSlot,
    /// Customer contact fields
    pub customer: CustomerContact,
    /// Service line items
    pub services: Vec<AppointmentLineItem>,
    /// Aggregate price of all line items
    pub total_price: f64,
    /// Payment method tag
    pub payment_method: PaymentMethod,
    /// Free-text notes
    pub notes: String,
}

/// A persisted appointment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    /// Unique identifier
    pub id: Uuid,
    /// Identity of the customer who owns the appointment
    pub customer_id: String,
    /// Branch where the service is delivered
    pub branch_id: String,
    /// Assigned staff member
    pub staff_id: String,
    /// Calendar day
    pub date: NaiveDate,
    /// Start slot
    pub time: TimeSlot,
    /// Customer contact fields
    pub customer: CustomerContact,
    /// Service line items
    pub services: Vec<AppointmentLineItem>,
    /// Aggregate price of all line items
    pub total_price: f64,
    /// Lifecycle status
    pub status: AppointmentStatus,
    /// Payment method tag
    pub payment_method: PaymentMethod,
    /// Free-text notes
    pub notes: String,
    /// When the appointment was created
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Build a freshly scheduled appointment from a create request
    #[must_use]
    pub fn from_request(request: CreateAppointmentRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id: request.customer_id,
            branch_id: request.branch_id,
            staff_id: request.staff_id,
            date: request.date,
            time: request.time,
            customer: request.customer,
            services: request.services,
            total_price: request.total_price,
            status: AppointmentStatus::Scheduled,
            payment_method: request.payment_method,
            notes: request.notes,
            created_at: Utc::now(),
        }
    }

    /// Whether this appointment includes the given service
    #[must_use]
    pub fn covers_service(&self, service_id: &str) -> bool {
        self.services.iter().any(|item| item.service_id == service_id)
    }

    /// Whether this appointment keeps `staff_id` busy at `date`/`time`
    #[must_use]
    pub fn conflicts_with(
        &self,
        staff_id: &str,
        date: NaiveDate,
        time: &TimeSlot,
        duration_minutes: u32,
    ) -> bool {
        self.staff_id == staff_id
            && self.date == date
            && self.status.blocks_availability()
            && self.time.overlaps(time, duration_minutes)
    }
}
