// ABOUTME: Pricing engine computing line prices, coupon discount, tax, and grand total
// ABOUTME: Pure and synchronous; amounts stay unrounded until presented for display
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Pricing Engine
//!
//! For a set of selected services and an optional coupon:
//!
//! ```text
//! line price = base price x (1 - service discount % / 100)
//! subtotal   = sum of line prices
//! discount   = subtotal x coupon % / 100        (percentage coupon)
//!            = min(coupon value, subtotal)      (fixed coupon)
//! tax        = (subtotal - discount) x tax rate
//! total      = subtotal - discount + tax
//! ```

/// Coupon registry abstraction and the built-in coupon table
pub mod coupons;

pub use coupons::{CouponRegistry, StaticCouponRegistry};

use crate::constants::pricing::{DEFAULT_TAX_RATE, MAX_DISCOUNT_PERCENT};
use crate::models::{Coupon, DiscountKind, ServiceOffering};
use serde::{Deserialize, Serialize};

/// Price totals for a draft
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Sum of per-service payable prices
    pub subtotal: f64,
    /// Coupon discount, never above `subtotal`
    pub discount_amount: f64,
    /// Tax on the discounted subtotal
    pub tax_amount: f64,
    /// Amount payable
    pub total: f64,
}

impl PriceBreakdown {
    /// Copy of this breakdown rounded to two decimals for presentation
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: round_for_display(self.subtotal),
            discount_amount: round_for_display(self.discount_amount),
            tax_amount: round_for_display(self.tax_amount),
            total: round_for_display(self.total),
        }
    }

    /// Multi-line summary such as `"Subtotal: ₹1150.00"`
    #[must_use]
    pub fn format_lines(&self, currency: &str) -> Vec<String> {
        let shown = self.rounded();
        vec![
            format!("Subtotal: {currency}{:.2}", shown.subtotal),
            format!("Discount: -{currency}{:.2}", shown.discount_amount),
            format!("Tax: {currency}{:.2}", shown.tax_amount),
            format!("Total: {currency}{:.2}", shown.total),
        ]
    }
}

/// Round an amount to two decimals; only used at presentation time
#[must_use]
pub fn round_for_display(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Stateless price calculator configured with a fixed tax rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingEngine {
    tax_rate: f64,
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(DEFAULT_TAX_RATE)
    }
}

impl PricingEngine {
    /// Create an engine applying `tax_rate` (0.18 = 18%)
    #[must_use]
    pub const fn new(tax_rate: f64) -> Self {
        Self { tax_rate }
    }

    /// Configured tax rate
    #[must_use]
    pub const fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    /// Payable price of one service after its own discount
    #[must_use]
    pub fn service_price(service: &ServiceOffering) -> f64 {
        let percent = service.discount_percent.clamp(0.0, MAX_DISCOUNT_PERCENT);
        service.price * (1.0 - percent / 100.0)
    }

    /// Coupon discount for a subtotal, clamped to `[0, subtotal]`
    #[must_use]
    pub fn coupon_discount(subtotal: f64, coupon: Option<&Coupon>) -> f64 {
        let Some(coupon) = coupon else {
            return 0.0;
        };
        let raw = match coupon.kind {
            DiscountKind::Percentage => subtotal * coupon.value / 100.0,
            DiscountKind::Fixed => coupon.value,
        };
        raw.clamp(0.0, subtotal.max(0.0))
    }

    /// Price a set of services with an optional coupon
    #[must_use]
    pub fn quote<'a, I>(&self, services: I, coupon: Option<&Coupon>) -> PriceBreakdown
    where
        I: IntoIterator<Item = &'a ServiceOffering>,
    {
        let subtotal: f64 = services.into_iter().map(Self::service_price).sum();
        let discount_amount = Self::coupon_discount(subtotal, coupon);
        let tax_amount = (subtotal - discount_amount) * self.tax_rate;
        PriceBreakdown {
            subtotal,
            discount_amount,
            tax_amount,
            total: subtotal - discount_amount + tax_amount,
        }
    }
}
