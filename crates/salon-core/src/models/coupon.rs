// ABOUTME: Coupon types redeemable for a percentage or fixed-amount discount
// ABOUTME: Codes are case-insensitive keys normalized to uppercase
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// How a coupon reduces the subtotal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    /// `value` percent of the subtotal
    Percentage,
    /// Flat `value` off the subtotal
    Fixed,
}

/// A redeemable coupon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    /// Uppercase coupon code
    pub code: String,
    /// Discount kind
    pub kind: DiscountKind,
    /// Percentage (0-100) or fixed amount, depending on `kind`
    pub value: f64,
}

impl Coupon {
    /// Create a coupon, normalizing the code
    #[must_use]
    pub fn new(code: &str, kind: DiscountKind, value: f64) -> Self {
        Self {
            code: Self::normalize_code(code),
            kind,
            value,
        }
    }

    /// Canonical lookup key for a user-entered code
    #[must_use]
    pub fn normalize_code(code: &str) -> String {
        code.trim().to_uppercase()
    }
}
