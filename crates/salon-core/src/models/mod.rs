// ABOUTME: Core data models for the salon booking engine
// ABOUTME: Catalog, staff, appointment, coupon, customer, and time slot types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Appointment entity and create payload
pub mod appointment;
/// Catalog, branch, and staff records
pub mod catalog;
/// Coupon types
pub mod coupon;
/// Customer contact and identity
pub mod customer;
/// Bookable time slots
pub mod time_slot;

pub use appointment::{
    Appointment, AppointmentLineItem, AppointmentStatus, CreateAppointmentRequest, PaymentMethod,
};
pub use catalog::{Branch, ServiceOffering, StaffMember};
pub use coupon::{Coupon, DiscountKind};
pub use customer::{CustomerContact, CustomerIdentity};
pub use time_slot::TimeSlot;
