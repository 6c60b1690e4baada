// ABOUTME: SQLite-backed appointment repository using sqlx
// ABOUTME: Stores appointments with JSON-encoded line items and indexes staff/date lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::str::FromStr;

use super::AppointmentRepository;
use crate::errors::DatabaseError;
use crate::models::{
    Appointment, AppointmentLineItem, AppointmentStatus, CreateAppointmentRequest,
    CustomerContact, PaymentMethod, TimeSlot,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

const SELECT_COLUMNS: &str = r"
    SELECT id, customer_id, branch_id, staff_id, date, time_minutes,
           customer_name, customer_email, customer_phone, services,
           total_price, status, payment_method, notes, created_at
    FROM appointments
";

/// Appointment repository on a `SQLite` connection pool
#[derive(Clone)]
pub struct SqliteAppointmentRepository {
    pool: SqlitePool,
}

impl SqliteAppointmentRepository {
    /// Create a repository on an existing pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url`, creating the file if needed, and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the connection fails, or migration fails
    pub async fn connect(database_url: &str) -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| DatabaseError::ConnectionError(format!("{database_url}: {e}")))?
            .create_if_missing(true);

        // Each in-memory connection is a separate database, so keep exactly one
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        let repository = Self::new(pool);
        repository.migrate().await?;
        info!(database_url, "Appointment store ready");
        Ok(repository)
    }

    /// Create the appointments table and indexes if they do not exist
    ///
    /// # Errors
    ///
    /// Returns an error if a DDL statement fails
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS appointments (
                id TEXT PRIMARY KEY,
                customer_id TEXT NOT NULL,
                branch_id TEXT NOT NULL,
                staff_id TEXT NOT NULL,
                date TEXT NOT NULL,
                time_minutes INTEGER NOT NULL,
                customer_name TEXT NOT NULL,
                customer_email TEXT NOT NULL,
                customer_phone TEXT NOT NULL,
                services TEXT NOT NULL,
                total_price REAL NOT NULL,
                status TEXT NOT NULL,
                payment_method TEXT NOT NULL,
                notes TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::query(format!("Failed to create appointments table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_appointments_staff_date ON appointments (staff_id, date)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::query(format!("Failed to create staff/date index: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_appointments_customer ON appointments (customer_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::query(format!("Failed to create customer index: {e}")))?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>, DatabaseError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::query(format!("Failed to get appointment: {e}")))?;

        row.map(|r| row_to_appointment(&r)).transpose()
    }
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepository {
    async fn create(
        &self,
        request: &CreateAppointmentRequest,
    ) -> Result<Appointment, DatabaseError> {
        let appointment = Appointment::from_request(request.clone());
        let services = serde_json::to_string(&appointment.services)
            .map_err(|e| DatabaseError::InvalidData {
                context: format!("line items: {e}"),
            })?;

        sqlx::query(
            r"
            INSERT INTO appointments (
                id, customer_id, branch_id, staff_id, date, time_minutes,
                customer_name, customer_email, customer_phone, services,
                total_price, status, payment_method, notes, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(appointment.id.to_string())
        .bind(&appointment.customer_id)
        .bind(&appointment.branch_id)
        .bind(&appointment.staff_id)
        .bind(appointment.date.to_string())
        .bind(i64::from(appointment.time.minutes_of_day()))
        .bind(&appointment.customer.name)
        .bind(&appointment.customer.email)
        .bind(&appointment.customer.phone)
        .bind(services)
        .bind(appointment.total_price)
        .bind(appointment.status.as_str())
        .bind(appointment.payment_method.as_str())
        .bind(&appointment.notes)
        .bind(appointment.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::query(format!("Failed to create appointment: {e}")))?;

        debug!(
            appointment_id = %appointment.id,
            staff_id = %appointment.staff_id,
            "Inserted appointment"
        );
        Ok(appointment)
    }

    async fn list_mine(&self, customer_id: &str) -> Result<Vec<Appointment>, DatabaseError> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE customer_id = ? ORDER BY date DESC, time_minutes DESC"
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::query(format!("Failed to list appointments: {e}")))?;

        rows.iter().map(row_to_appointment).collect()
    }

    async fn list_for_staff_on_date(
        &self,
        staff_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, DatabaseError> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE staff_id = ? AND date = ? ORDER BY time_minutes ASC"
        ))
        .bind(staff_id)
        .bind(date.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::query(format!("Failed to list staff appointments: {e}")))?;

        rows.iter().map(row_to_appointment).collect()
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, DatabaseError> {
        let result = sqlx::query("UPDATE appointments SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::query(format!("Failed to update status: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound {
                entity: "appointment",
                id: id.to_string(),
            });
        }

        self.get(id).await?.ok_or_else(|| DatabaseError::NotFound {
            entity: "appointment",
            id: id.to_string(),
        })
    }
}

fn invalid(column: &str, e: impl std::fmt::Display) -> DatabaseError {
    DatabaseError::InvalidData {
        context: format!("{column}: {e}"),
    }
}

fn row_to_appointment(row: &SqliteRow) -> Result<Appointment, DatabaseError> {
    let get_text = |column: &str| -> Result<String, DatabaseError> {
        row.try_get::<String, _>(column).map_err(|e| invalid(column, e))
    };

    let id = Uuid::parse_str(&get_text("id")?).map_err(|e| invalid("id", e))?;
    let date = NaiveDate::parse_from_str(&get_text("date")?, "%Y-%m-%d")
        .map_err(|e| invalid("date", e))?;
    let minutes: i64 = row
        .try_get("time_minutes")
        .map_err(|e| invalid("time_minutes", e))?;
    let time = u32::try_from(minutes)
        .ok()
        .and_then(|m| TimeSlot::from_hm(m / 60, m % 60))
        .ok_or_else(|| invalid("time_minutes", minutes))?;
    let services: Vec<AppointmentLineItem> =
        serde_json::from_str(&get_text("services")?).map_err(|e| invalid("services", e))?;
    let status = AppointmentStatus::from_str(&get_text("status")?)
        .map_err(|e| invalid("status", e))?;
    let created_at = DateTime::parse_from_rfc3339(&get_text("created_at")?)
        .map_err(|e| invalid("created_at", e))?
        .with_timezone(&Utc);

    Ok(Appointment {
        id,
        customer_id: get_text("customer_id")?,
        branch_id: get_text("branch_id")?,
        staff_id: get_text("staff_id")?,
        date,
        time,
        customer: CustomerContact {
            name: get_text("customer_name")?,
            email: get_text("customer_email")?,
            phone: get_text("customer_phone")?,
        },
        services,
        total_price: row
            .try_get("total_price")
            .map_err(|e| invalid("total_price", e))?,
        status,
        payment_method: PaymentMethod::parse(&get_text("payment_method")?),
        notes: get_text("notes")?,
        created_at,
    })
}
