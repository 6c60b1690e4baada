// ABOUTME: In-memory implementation of every booking repository trait
// ABOUTME: Backs tests and the CLI demo; appointments are kept in insertion order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use super::{AppointmentRepository, BranchRepository, CatalogRepository, StaffRepository};
use crate::errors::DatabaseError;
use crate::models::{
    Appointment, AppointmentStatus, Branch, CreateAppointmentRequest, ServiceOffering, StaffMember,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Shared in-memory store
///
/// Cloning shares the same underlying data.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    services: Arc<RwLock<Vec<ServiceOffering>>>,
    branches: Arc<RwLock<Vec<Branch>>>,
    staff: Arc<RwLock<Vec<StaffMember>>>,
    appointments: Arc<RwLock<Vec<Appointment>>>,
}

impl InMemoryDatabase {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store preloaded with catalog, branch, and staff records
    #[must_use]
    pub fn with_records(
        services: Vec<ServiceOffering>,
        branches: Vec<Branch>,
        staff: Vec<StaffMember>,
    ) -> Self {
        Self {
            services: Arc::new(RwLock::new(services)),
            branches: Arc::new(RwLock::new(branches)),
            staff: Arc::new(RwLock::new(staff)),
            appointments: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Insert an appointment as-is (used to seed existing bookings)
    pub async fn insert_appointment(&self, appointment: Appointment) {
        self.appointments.write().await.push(appointment);
    }

    /// Snapshot of every stored appointment
    pub async fn all_appointments(&self) -> Vec<Appointment> {
        self.appointments.read().await.clone()
    }
}

#[async_trait]
impl CatalogRepository for InMemoryDatabase {
    async fn list_services(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<ServiceOffering>, DatabaseError> {
        let services = self.services.read().await;
        Ok(services
            .iter()
            .filter(|service| category.map_or(true, |c| service.in_category(c)))
            .cloned()
            .collect())
    }

    async fn get_service(&self, id: &str) -> Result<Option<ServiceOffering>, DatabaseError> {
        Ok(self
            .services
            .read()
            .await
            .iter()
            .find(|service| service.id == id)
            .cloned())
    }
}

#[async_trait]
impl BranchRepository for InMemoryDatabase {
    async fn list_branches(&self) -> Result<Vec<Branch>, DatabaseError> {
        Ok(self.branches.read().await.clone())
    }
}

#[async_trait]
impl StaffRepository for InMemoryDatabase {
    async fn list_staff(&self, branch_id: Option<&str>) -> Result<Vec<StaffMember>, DatabaseError> {
        let staff = self.staff.read().await;
        Ok(staff
            .iter()
            .filter(|member| branch_id.map_or(true, |b| member.branch_id == b))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryDatabase {
    async fn create(
        &self,
        request: &CreateAppointmentRequest,
    ) -> Result<Appointment, DatabaseError> {
        let appointment = Appointment::from_request(request.clone());
        self.appointments.write().await.push(appointment.clone());
        Ok(appointment)
    }

    async fn list_mine(&self, customer_id: &str) -> Result<Vec<Appointment>, DatabaseError> {
        let appointments = self.appointments.read().await;
        Ok(appointments
            .iter()
            .filter(|a| a.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn list_for_staff_on_date(
        &self,
        staff_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, DatabaseError> {
        let appointments = self.appointments.read().await;
        Ok(appointments
            .iter()
            .filter(|a| a.staff_id == staff_id && a.date == date)
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, DatabaseError> {
        let mut appointments = self.appointments.write().await;
        let appointment = appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| DatabaseError::NotFound {
                entity: "appointment",
                id: id.to_string(),
            })?;
        appointment.status = status;
        Ok(appointment.clone())
    }
}
