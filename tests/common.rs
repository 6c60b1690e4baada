// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides the sample salon, session wiring, and collaborator test doubles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `salon_booking`

use std::collections::HashSet;
use std::sync::{Arc, Once};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use salon_booking::auth::InMemoryAuthProvider;
use salon_booking::availability::AvailabilityChecker;
use salon_booking::booking::{
    BookingContext, BookingSession, Collaborators, EntryContext, StaffAssignmentStrategy,
};
use salon_booking::config::BookingConfig;
use salon_booking::database::{AppointmentRepository, InMemoryDatabase};
use salon_booking::errors::{BookingResult, DatabaseError};
use salon_booking::models::{
    Appointment, AppointmentStatus, Branch, CreateAppointmentRequest, CustomerIdentity,
    ServiceOffering, StaffMember, TimeSlot,
};
use salon_booking::pricing::StaticCouponRegistry;
use salon_booking::store::{InMemoryKeyValueStore, KeyValueStore};
use tokio::sync::Mutex;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

pub const CUSTOMER_ID: &str = "customer-1";
pub const BRANCH: &str = "branch-1";
pub const SOLO_BRANCH: &str = "branch-2";

pub fn june_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

pub fn slot(label: &str) -> TimeSlot {
    TimeSlot::parse(label).unwrap()
}

pub fn offering(id: &str, category: &str, price: f64, discount_percent: f64) -> ServiceOffering {
    ServiceOffering {
        id: id.to_owned(),
        name: format!("Service {id}"),
        category: category.to_owned(),
        price,
        duration_minutes: 60,
        discount_percent,
        remaining_slots: None,
    }
}

pub fn identity() -> CustomerIdentity {
    CustomerIdentity {
        user_id: CUSTOMER_ID.to_owned(),
        display_name: Some("Asha Rao".to_owned()),
        email: Some("asha@example.com".to_owned()),
        phone: Some("9876543210".to_owned()),
    }
}

/// `cut` 650 and `spa` 500 (no discount), `color` 1200 at 10% off, `bridal` sold out
pub fn salon() -> InMemoryDatabase {
    let staff = |id: &str, branch: &str| StaffMember {
        id: id.to_owned(),
        name: id.to_owned(),
        branch_id: branch.to_owned(),
        is_active: true,
    };
    let branch = |id: &str| Branch {
        id: id.to_owned(),
        name: id.to_owned(),
        address: "MG Road".to_owned(),
        phone: None,
    };
    InMemoryDatabase::with_records(
        vec![
            offering("cut", "Hair", 650.0, 0.0),
            offering("spa", "Spa", 500.0, 0.0),
            offering("color", "Hair", 1200.0, 10.0),
            ServiceOffering {
                remaining_slots: Some(0),
                ..offering("bridal", "Makeup", 5000.0, 0.0)
            },
        ],
        vec![branch(BRANCH), branch(SOLO_BRANCH)],
        vec![
            staff("stylist-1", BRANCH),
            staff("stylist-2", BRANCH),
            staff("stylist-solo", SOLO_BRANCH),
        ],
    )
}

/// An existing appointment request for `staff_id` at `time` on 2024-06-01
pub fn existing_request(staff_id: &str, time: &str) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        customer_id: "someone-else".to_owned(),
        branch_id: BRANCH.to_owned(),
        staff_id: staff_id.to_owned(),
        date: june_first(),
        time: slot(time),
        customer: salon_booking::models::CustomerContact::default(),
        services: Vec::new(),
        total_price: 0.0,
        payment_method: salon_booking::models::PaymentMethod::PayAtSalon,
        notes: String::new(),
    }
}

/// Collaborators around one in-memory salon
pub struct Harness {
    pub db: InMemoryDatabase,
    pub auth: InMemoryAuthProvider,
    pub store: Arc<InMemoryKeyValueStore>,
    pub config: BookingConfig,
}

impl Harness {
    pub fn new() -> Self {
        init_test_logging();
        Self {
            db: salon(),
            auth: InMemoryAuthProvider::new(),
            store: Arc::new(InMemoryKeyValueStore::new()),
            config: BookingConfig::default(),
        }
    }

    pub fn collaborators(&self, appointments: Arc<dyn AppointmentRepository>) -> Collaborators {
        let store: Arc<dyn KeyValueStore> = self.store.clone();
        Collaborators {
            catalog: Arc::new(self.db.clone()),
            branches: Arc::new(self.db.clone()),
            staff: Arc::new(self.db.clone()),
            appointments,
            coupons: Arc::new(StaticCouponRegistry::with_defaults()),
            auth: Arc::new(self.auth.clone()),
            store,
        }
    }

    pub fn context(&self) -> Arc<BookingContext> {
        Arc::new(BookingContext::new(
            &self.config,
            self.collaborators(Arc::new(self.db.clone())),
        ))
    }

    pub async fn session(&self, entry: EntryContext) -> BookingSession {
        BookingSession::start(self.context(), entry).await.unwrap()
    }
}

/// Appointment repository that fails or stalls creates for chosen services
pub struct FlakyAppointments {
    inner: InMemoryDatabase,
    failing: Mutex<HashSet<String>>,
    stalling: Mutex<HashSet<String>>,
    pub attempts: Mutex<Vec<String>>,
}

impl FlakyAppointments {
    pub fn new(inner: InMemoryDatabase) -> Self {
        Self {
            inner,
            failing: Mutex::new(HashSet::new()),
            stalling: Mutex::new(HashSet::new()),
            attempts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(mut self, service_id: &str) -> Self {
        self.failing.get_mut().insert(service_id.to_owned());
        self
    }

    pub fn stalling(mut self, service_id: &str) -> Self {
        self.stalling.get_mut().insert(service_id.to_owned());
        self
    }

    /// Let every later create go through
    pub async fn heal(&self) {
        self.failing.lock().await.clear();
        self.stalling.lock().await.clear();
    }
}

#[async_trait]
impl AppointmentRepository for FlakyAppointments {
    async fn create(
        &self,
        request: &CreateAppointmentRequest,
    ) -> Result<Appointment, DatabaseError> {
        let service_id = request
            .services
            .first()
            .map(|item| item.service_id.clone())
            .unwrap_or_default();
        self.attempts.lock().await.push(service_id.clone());

        let stall = self.stalling.lock().await.contains(&service_id);
        if stall {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        if self.failing.lock().await.contains(&service_id) {
            return Err(DatabaseError::ConnectionError("network down".to_owned()));
        }
        self.inner.create(request).await
    }

    async fn list_mine(&self, customer_id: &str) -> Result<Vec<Appointment>, DatabaseError> {
        self.inner.list_mine(customer_id).await
    }

    async fn list_for_staff_on_date(
        &self,
        staff_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, DatabaseError> {
        self.inner.list_for_staff_on_date(staff_id, date).await
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, DatabaseError> {
        self.inner.update_status(id, status).await
    }
}

/// Availability that answers from a script, one answer per call
pub struct ScriptedAvailability {
    answers: Mutex<Vec<bool>>,
}

impl ScriptedAvailability {
    pub fn new(answers: Vec<bool>) -> Self {
        Self {
            answers: Mutex::new(answers),
        }
    }
}

#[async_trait]
impl AvailabilityChecker for ScriptedAvailability {
    async fn is_available(
        &self,
        _staff_id: &str,
        _date: NaiveDate,
        _time: TimeSlot,
    ) -> BookingResult<bool> {
        let mut answers = self.answers.lock().await;
        Ok(if answers.is_empty() {
            true
        } else {
            answers.remove(0)
        })
    }
}

/// Always assigns the same staff member
pub struct FixedStaff(pub &'static str);

#[async_trait]
impl StaffAssignmentStrategy for FixedStaff {
    async fn assign(
        &self,
        _branch_id: &str,
        _service_id: &str,
        _date: NaiveDate,
        _time: TimeSlot,
    ) -> BookingResult<Option<String>> {
        Ok(Some(self.0.to_owned()))
    }
}
