// ABOUTME: Test fixtures for catalog, staff, contacts, and appointment requests
// ABOUTME: Centralizes test data creation so unit and integration tests share one salon
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use crate::database::InMemoryDatabase;
use crate::models::{
    AppointmentLineItem, Branch, CreateAppointmentRequest, CustomerContact, CustomerIdentity,
    PaymentMethod, ServiceOffering, StaffMember, TimeSlot,
};
use chrono::NaiveDate;

/// Customer ID used by every fixture
pub const TEST_CUSTOMER_ID: &str = "customer-1";

/// Branch with two active stylists
pub const TEST_BRANCH_ID: &str = "branch-1";

/// Branch with a single stylist
pub const SOLO_BRANCH_ID: &str = "branch-2";

/// A `Hair` service with unlimited slots
#[must_use]
pub fn service(id: &str, price: f64, discount_percent: f64) -> ServiceOffering {
    ServiceOffering {
        id: id.to_owned(),
        name: format!("Service {id}"),
        category: "Hair".to_owned(),
        price,
        duration_minutes: 60,
        discount_percent,
        remaining_slots: None,
    }
}

/// Parse a slot label
#[must_use]
pub fn slot(label: &str) -> TimeSlot {
    TimeSlot::parse(label).unwrap()
}

/// 2024-06-01, the day every fixture books on
#[must_use]
pub fn booking_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

/// A complete, valid contact
#[must_use]
pub fn contact() -> CustomerContact {
    CustomerContact {
        name: "Asha Rao".to_owned(),
        email: "asha@example.com".to_owned(),
        phone: "9876543210".to_owned(),
    }
}

/// The signed-in identity behind [`TEST_CUSTOMER_ID`]
#[must_use]
pub fn identity() -> CustomerIdentity {
    CustomerIdentity {
        user_id: TEST_CUSTOMER_ID.to_owned(),
        display_name: Some("Asha Rao".to_owned()),
        email: Some("asha@example.com".to_owned()),
        phone: Some("9876543210".to_owned()),
    }
}

/// Catalog used by [`sample_database`]
///
/// `cut` 650 and `spa` 500 carry no discount; `color` is 10% off;
/// `bridal` is sold out.
#[must_use]
pub fn sample_services() -> Vec<ServiceOffering> {
    vec![
        ServiceOffering {
            category: "Hair".to_owned(),
            ..service("cut", 650.0, 0.0)
        },
        ServiceOffering {
            category: "Spa".to_owned(),
            ..service("spa", 500.0, 0.0)
        },
        ServiceOffering {
            category: "Hair".to_owned(),
            ..service("color", 1200.0, 10.0)
        },
        ServiceOffering {
            category: "Makeup".to_owned(),
            remaining_slots: Some(0),
            ..service("bridal", 5000.0, 0.0)
        },
    ]
}

/// Staff used by [`sample_database`]
#[must_use]
pub fn sample_staff() -> Vec<StaffMember> {
    let member = |id: &str, branch: &str, is_active: bool| StaffMember {
        id: id.to_owned(),
        name: format!("Stylist {id}"),
        branch_id: branch.to_owned(),
        is_active,
    };
    vec![
        member("stylist-1", TEST_BRANCH_ID, true),
        member("stylist-2", TEST_BRANCH_ID, true),
        member("stylist-retired", TEST_BRANCH_ID, false),
        member("stylist-solo", SOLO_BRANCH_ID, true),
    ]
}

/// In-memory salon with two branches, four services, and four staff members
#[must_use]
pub fn sample_database() -> InMemoryDatabase {
    let branch = |id: &str, name: &str| Branch {
        id: id.to_owned(),
        name: name.to_owned(),
        address: format!("{name} Road"),
        phone: None,
    };
    InMemoryDatabase::with_records(
        sample_services(),
        vec![
            branch(TEST_BRANCH_ID, "Indiranagar"),
            branch(SOLO_BRANCH_ID, "Koramangala"),
        ],
        sample_staff(),
    )
}

/// Create request for one 650 `cut` at `time_label` on [`booking_date`]
#[must_use]
pub fn create_request(staff_id: &str, time_label: &str) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        customer_id: TEST_CUSTOMER_ID.to_owned(),
        branch_id: TEST_BRANCH_ID.to_owned(),
        staff_id: staff_id.to_owned(),
        date: booking_date(),
        time: slot(time_label),
        customer: contact(),
        services: vec![AppointmentLineItem {
            service_id: "cut".to_owned(),
            price: 650.0,
        }],
        total_price: 650.0,
        payment_method: PaymentMethod::PayAtSalon,
        notes: String::new(),
    }
}
