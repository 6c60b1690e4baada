// ABOUTME: Catalog, branch, and staff records consumed read-only by the booking engine
// ABOUTME: ServiceOffering carries price, duration, discount, and remaining bookable slots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// A bookable salon service from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOffering {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Catalog category (hair, skin, nails, ...)
    pub category: String,
    /// Base price before the per-service discount
    pub price: f64,
    /// Duration in minutes
    pub duration_minutes: u32,
    /// Per-service discount percent (0-100)
    #[serde(default)]
    pub discount_percent: f64,
    /// Remaining bookable slots; `None` means unlimited, `Some(0)` means sold out
    #[serde(default)]
    pub remaining_slots: Option<u32>,
}

impl ServiceOffering {
    /// Whether the catalog reports no remaining slots
    #[must_use]
    pub const fn is_sold_out(&self) -> bool {
        matches!(self.remaining_slots, Some(0))
    }

    /// Whether this service belongs to `category` (case-insensitive)
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        self.category.eq_ignore_ascii_case(category)
    }
}

/// A salon branch, used for display and to scope staff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Street address
    pub address: String,
    /// Contact phone
    #[serde(default)]
    pub phone: Option<String>,
}

/// A stylist or therapist who can be assigned to appointments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Branch the staff member works at
    pub branch_id: String,
    /// Whether the staff member currently accepts bookings
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_slots_semantics() {
        let json = r#"{"id":"s1","name":"Haircut","category":"Hair","price":650.0,"duration_minutes":45}"#;
        let mut service: ServiceOffering = serde_json::from_str(json).unwrap();

        assert_eq!(service.remaining_slots, None);
        assert!(!service.is_sold_out());

        service.remaining_slots = Some(0);
        assert!(service.is_sold_out());

        service.remaining_slots = Some(3);
        assert!(!service.is_sold_out());
        assert!(service.in_category("hair"));
    }
}
