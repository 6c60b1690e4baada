// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Re-exports command modules for salon-booking-cli
// ABOUTME: Provides the quote, availability, and pending commands

pub mod availability;
pub mod pending;
pub mod quote;
