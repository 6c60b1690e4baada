// ABOUTME: Configuration management module for booking engine settings
// ABOUTME: Re-exports the environment-driven configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//! Configuration module for the salon booking engine
//!
//! - **Environment**: pricing, scheduling, submission, and pending-booking
//!   settings loaded from environment variables (and `.env`)

/// Environment-driven configuration
pub mod environment;

pub use environment::{
    BookingConfig, DatabaseConfig, Environment, PendingBookingConfig, PricingConfig,
    SchedulingConfig, SubmissionConfig,
};
