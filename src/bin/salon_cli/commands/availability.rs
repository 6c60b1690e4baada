// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Availability command checking a staff member against the appointment store
// ABOUTME: Checks one slot or lists every free configured slot for a day

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use salon_booking::availability::{AppointmentAvailabilityChecker, AvailabilityChecker};
use salon_booking::config::BookingConfig;
use salon_booking::database::SqliteAppointmentRepository;
use salon_booking::models::TimeSlot;
use tracing::info;

/// Report `staff_id`'s availability on `date`
pub async fn run(
    config: &BookingConfig,
    staff_id: &str,
    date: NaiveDate,
    time: Option<&str>,
) -> Result<()> {
    info!("Connecting to appointment store: {}", config.database.url);
    let repository = SqliteAppointmentRepository::connect(&config.database.url).await?;
    let checker = AppointmentAvailabilityChecker::with_duration(
        Arc::new(repository),
        config.scheduling.appointment_duration_minutes,
    );

    if let Some(label) = time {
        let slot = TimeSlot::parse(label)?;
        let free = checker.is_available(staff_id, date, slot).await?;
        println!(
            "{staff_id} on {date} at {slot}: {}",
            if free { "available" } else { "unavailable" }
        );
        return Ok(());
    }

    let free = checker
        .available_slots(staff_id, date, &config.scheduling.time_slots)
        .await?;
    println!("Free slots for {staff_id} on {date}:");
    if free.is_empty() {
        println!("  none");
    }
    for slot in free {
        println!("  {slot}");
    }
    Ok(())
}
