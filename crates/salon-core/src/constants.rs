// ABOUTME: Application constants for pricing, scheduling, coupons, and persistence
// ABOUTME: Default values used when no environment override is configured
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Pricing defaults
pub mod pricing {
    /// Fixed tax rate applied to the discounted subtotal (18% GST)
    pub const DEFAULT_TAX_RATE: f64 = 0.18;
    /// Currency symbol used when formatting amounts for display
    pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";
    /// Upper bound for a per-service discount percentage
    pub const MAX_DISCOUNT_PERCENT: f64 = 100.0;
}

/// Scheduling defaults
pub mod scheduling {
    /// Duration assumed for every appointment when checking conflicts
    pub const DEFAULT_APPOINTMENT_DURATION_MINUTES: u32 = 60;
    /// Selectable time slot labels
    pub const DEFAULT_TIME_SLOTS: &[&str] = &[
        "10:00 AM", "11:00 AM", "12:00 PM", "01:00 PM", "02:00 PM", "03:00 PM", "04:00 PM",
        "05:00 PM", "06:00 PM", "07:00 PM",
    ];
    /// Timeout for a single create-appointment call
    pub const DEFAULT_SUBMISSION_TIMEOUT_SECS: u64 = 15;
}

/// Coupon registry defaults
pub mod coupons {
    use crate::models::DiscountKind;

    /// Built-in coupon table: (code, kind, value)
    pub const DEFAULT_COUPONS: &[(&str, DiscountKind, f64)] = &[
        ("WELCOME10", DiscountKind::Percentage, 10.0),
        ("SAVE20", DiscountKind::Percentage, 20.0),
        ("FLAT100", DiscountKind::Fixed, 100.0),
    ];
}

/// Pending booking persistence
pub mod persistence {
    /// Name of the single key/value slot holding the pending booking
    pub const PENDING_BOOKING_SLOT: &str = "pendingBooking";
    /// Pending bookings older than this are discarded on restore
    pub const DEFAULT_PENDING_BOOKING_TTL_SECS: u64 = 1800;
    /// Schema version written with every pending booking snapshot
    pub const PENDING_BOOKING_SCHEMA_VERSION: u32 = 1;
}

/// Contact validation limits
pub mod contact {
    /// Minimum number of digits in a phone number
    pub const MIN_PHONE_DIGITS: usize = 10;
    /// Maximum number of digits in a phone number
    pub const MAX_PHONE_DIGITS: usize = 15;
}

/// Service identity used in structured logs
pub mod service_names {
    /// Name of the booking engine service
    pub const SALON_BOOKING: &str = "salon-booking";
}
