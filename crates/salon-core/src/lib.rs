// ABOUTME: Core types and constants for the salon appointment booking engine
// ABOUTME: Foundation crate with error handling, domain models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Salon Core
//!
//! Foundation crate providing shared types and constants for the salon booking
//! engine. This crate is designed to change infrequently, enabling incremental
//! compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and the booking error taxonomy
//! - **constants**: Pricing, scheduling, and persistence defaults
//! - **models**: Catalog, staff, appointment, coupon, and customer types

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (`ServiceOffering`, `Appointment`, `Coupon`, `TimeSlot`, etc.)
pub mod models;
