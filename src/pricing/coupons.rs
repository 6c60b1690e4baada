// ABOUTME: Coupon registry abstraction with a built-in static coupon table
// ABOUTME: Async lookup so a remote registry can replace the static one without changing pricing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;

use crate::constants::coupons::DEFAULT_COUPONS;
use crate::errors::BookingResult;
use crate::models::Coupon;
use async_trait::async_trait;

/// Lookup of coupon codes
#[async_trait]
pub trait CouponRegistry: Send + Sync {
    /// Find a coupon by code (case-insensitive); `Ok(None)` for unknown codes
    ///
    /// # Errors
    ///
    /// Returns an error if the backing registry cannot be reached
    async fn lookup(&self, code: &str) -> BookingResult<Option<Coupon>>;
}

/// Fixed mapping from uppercase code to coupon
#[derive(Debug, Clone, Default)]
pub struct StaticCouponRegistry {
    coupons: HashMap<String, Coupon>,
}

impl StaticCouponRegistry {
    /// Create a registry from a list of coupons
    #[must_use]
    pub fn new(coupons: impl IntoIterator<Item = Coupon>) -> Self {
        Self {
            coupons: coupons
                .into_iter()
                .map(|coupon| (Coupon::normalize_code(&coupon.code), coupon))
                .collect(),
        }
    }

    /// Registry preloaded with the built-in coupon table
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(
            DEFAULT_COUPONS
                .iter()
                .map(|(code, kind, value)| Coupon::new(code, *kind, *value)),
        )
    }

    /// Number of registered coupons
    #[must_use]
    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    /// Whether no coupons are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }
}

#[async_trait]
impl CouponRegistry for StaticCouponRegistry {
    async fn lookup(&self, code: &str) -> BookingResult<Option<Coupon>> {
        Ok(self.coupons.get(&Coupon::normalize_code(code)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DiscountKind;

    #[tokio::test]
    async fn test_lookup_is_case_insensitive() {
        let registry = StaticCouponRegistry::with_defaults();

        let coupon = registry.lookup("  welcome10 ").await.unwrap().unwrap();
        assert_eq!(coupon.code, "WELCOME10");
        assert_eq!(coupon.kind, DiscountKind::Percentage);
        assert!((coupon.value - 10.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_unknown_code_is_none() {
        let registry = StaticCouponRegistry::with_defaults();
        assert!(registry.lookup("NOPE").await.unwrap().is_none());
        assert!(registry.lookup("").await.unwrap().is_none());
    }
}
