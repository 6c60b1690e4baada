// ABOUTME: Repository traits for catalog, branches, staff, and appointments
// ABOUTME: Pluggable backends (in-memory, SQLite) consumed by the booking core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Access Layer
//!
//! The booking core reads catalog, branch, and staff records and creates,
//! lists, and updates appointments. Each concern is a separate trait so a
//! deployment can back them with different stores.

/// In-memory repositories for tests and demos
pub mod memory;
/// `SQLite` appointment repository
pub mod sqlite;

pub use memory::InMemoryDatabase;
pub use sqlite::SqliteAppointmentRepository;

use crate::errors::DatabaseError;
use crate::models::{
    Appointment, AppointmentStatus, Branch, CreateAppointmentRequest, ServiceOffering, StaffMember,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

/// Read access to the service catalog
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// List services, optionally restricted to one category
    async fn list_services(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<ServiceOffering>, DatabaseError>;

    /// Get a single service by ID
    async fn get_service(&self, id: &str) -> Result<Option<ServiceOffering>, DatabaseError>;
}

/// Read access to branches (display only)
#[async_trait]
pub trait BranchRepository: Send + Sync {
    /// List all branches
    async fn list_branches(&self) -> Result<Vec<Branch>, DatabaseError>;
}

/// Read access to staff
#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// List staff, optionally restricted to one branch
    async fn list_staff(&self, branch_id: Option<&str>) -> Result<Vec<StaffMember>, DatabaseError>;
}

/// Appointment storage
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Create an appointment from a payload
    async fn create(&self, request: &CreateAppointmentRequest)
        -> Result<Appointment, DatabaseError>;

    /// List appointments owned by a customer
    async fn list_mine(&self, customer_id: &str) -> Result<Vec<Appointment>, DatabaseError>;

    /// List a staff member's appointments on one day, in any status
    async fn list_for_staff_on_date(
        &self,
        staff_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, DatabaseError>;

    /// Change an appointment's lifecycle status
    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, DatabaseError>;
}
