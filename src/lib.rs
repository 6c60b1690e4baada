// ABOUTME: Main library entry point for the salon appointment booking engine
// ABOUTME: Provides the booking wizard, pricing, availability checks, and appointment submission
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Salon Booking
//!
//! The booking engine behind a salon storefront. It turns a cart of selected
//! services into one or more confirmed appointments, subject to staff
//! availability, pricing and coupon rules, and interruption by sign-in.
//!
//! ## Architecture
//!
//! - **Pricing**: pure computation of subtotal, discount, tax, and total
//! - **Availability**: decides whether a staff member is free at a date/time
//! - **Booking**: the five-step wizard state machine, pending-booking persistence
//!   across sign-in, and the appointment submitter
//! - **Database**: repository traits for catalog, staff, and appointments with
//!   in-memory and `SQLite` implementations
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use salon_booking::config::environment::BookingConfig;
//! use salon_booking::pricing::PricingEngine;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = BookingConfig::from_env()?;
//!     let pricing = PricingEngine::new(config.pricing.tax_rate);
//!     println!("Tax rate: {}", pricing.tax_rate());
//!     Ok(())
//! }
//! ```

/// Authentication provider abstraction
pub mod auth;

/// Staff availability checks against existing appointments
pub mod availability;

/// Booking wizard, draft, submitter, and pending-booking persistence
pub mod booking;

/// Configuration management from environment variables
pub mod config;

/// Repository traits and implementations for catalog, staff, and appointments
pub mod database;

/// Unified error handling re-exported from `salon-core`
pub mod errors;

/// Production logging and structured output
pub mod logging;

/// Core data models re-exported from `salon-core`
pub mod models {
    pub use salon_core::models::*;
}

/// Application constants re-exported from `salon-core`
pub mod constants {
    pub use salon_core::constants::*;
}

/// Price computation and coupon registry
pub mod pricing;

/// Key/value storage for the pending-booking handoff
pub mod store;

/// Test utilities for creating consistent booking fixtures
#[cfg(any(test, feature = "testing"))]
pub mod test_utils;
