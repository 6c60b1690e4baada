// ABOUTME: Time slot type for appointment scheduling with label parsing and conflict checks
// ABOUTME: Accepts 24-hour ("10:00") and 12-hour ("10:00 AM") labels, renders the 12-hour form
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::errors::AppError;
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// A bookable start time within a day
///
/// Slots are compared by clock time, so `"10:00"` and `"10:00 AM"` are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    /// Create a slot from an hour (0-23) and minute
    #[must_use]
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Parse a slot label
    ///
    /// # Errors
    ///
    /// Returns an error if the label is neither `HH:MM` nor `HH:MM AM/PM`
    pub fn parse(label: &str) -> Result<Self, AppError> {
        let normalized = label.trim().to_uppercase();
        ["%I:%M %p", "%I:%M%p", "%H:%M", "%H:%M:%S"]
            .iter()
            .find_map(|format| NaiveTime::parse_from_str(&normalized, format).ok())
            .map(Self)
            .ok_or_else(|| AppError::invalid_input(format!("Invalid time slot: '{label}'")))
    }

    /// Underlying clock time
    #[must_use]
    pub const fn time(&self) -> NaiveTime {
        self.0
    }

    /// Minutes since midnight
    #[must_use]
    pub fn minutes_of_day(&self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }

    /// Whether two appointments of `duration_minutes` starting at these slots overlap
    #[must_use]
    pub fn overlaps(&self, other: &Self, duration_minutes: u32) -> bool {
        self.minutes_of_day().abs_diff(other.minutes_of_day()) < duration_minutes
    }

    /// 12-hour display label, e.g. `"01:30 PM"`
    #[must_use]
    pub fn label(&self) -> String {
        self.0.format("%I:%M %p").to_string()
    }
}

impl Display for TimeSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for TimeSlot {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.label()
    }
}
