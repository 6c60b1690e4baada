// ABOUTME: Environment configuration management for the booking engine
// ABOUTME: Parses pricing, slot, timeout, and pending-booking settings from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{persistence, pricing, scheduling};
use crate::models::TimeSlot;
use crate::pricing::PricingEngine;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Appointment store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection URL
    pub url: String,
}

/// Pricing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Fixed tax rate applied after discounts
    pub tax_rate: f64,
    /// Symbol prefixed to displayed amounts
    pub currency_symbol: String,
}

/// Scheduling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingConfig {
    /// Fixed duration assumed when checking staff conflicts
    pub appointment_duration_minutes: u32,
    /// Selectable slot enumeration
    pub time_slots: Vec<TimeSlot>,
}

/// Submission settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Per-service create call timeout
    pub timeout: Duration,
}

/// Pending booking handoff settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingBookingConfig {
    /// Key of the single pending-booking slot
    pub slot: String,
    /// Snapshots older than this are treated as absent
    pub ttl: Duration,
    /// File-backed store location; in-memory when `None`
    pub store_path: Option<PathBuf>,
}

/// Booking engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Appointment store
    pub database: DatabaseConfig,
    /// Pricing
    pub pricing: PricingConfig,
    /// Slot enumeration and conflict duration
    pub scheduling: SchedulingConfig,
    /// Create call behaviour
    pub submission: SubmissionConfig,
    /// Pending booking handoff
    pub pending: PendingBookingConfig,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: "sqlite::memory:".to_owned(),
            },
            pricing: PricingConfig {
                tax_rate: pricing::DEFAULT_TAX_RATE,
                currency_symbol: pricing::DEFAULT_CURRENCY_SYMBOL.to_owned(),
            },
            scheduling: SchedulingConfig {
                appointment_duration_minutes: scheduling::DEFAULT_APPOINTMENT_DURATION_MINUTES,
                time_slots: default_time_slots(),
            },
            submission: SubmissionConfig {
                timeout: Duration::from_secs(scheduling::DEFAULT_SUBMISSION_TIMEOUT_SECS),
            },
            pending: PendingBookingConfig {
                slot: persistence::PENDING_BOOKING_SLOT.to_owned(),
                ttl: Duration::from_secs(persistence::DEFAULT_PENDING_BOOKING_TTL_SECS),
                store_path: None,
            },
        }
    }
}

impl BookingConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or the result fails validation
    pub fn from_env() -> Result<Self> {
        info!("Loading booking configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        let config = Self {
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            database: DatabaseConfig {
                url: env_var_or("DATABASE_URL", "sqlite::memory:"),
            },
            pricing: PricingConfig {
                tax_rate: env_var_or("TAX_RATE", &pricing::DEFAULT_TAX_RATE.to_string())
                    .parse()
                    .context("Invalid TAX_RATE value")?,
                currency_symbol: env_var_or("CURRENCY_SYMBOL", pricing::DEFAULT_CURRENCY_SYMBOL),
            },
            scheduling: SchedulingConfig {
                appointment_duration_minutes: env_var_or(
                    "APPOINTMENT_DURATION_MINUTES",
                    &scheduling::DEFAULT_APPOINTMENT_DURATION_MINUTES.to_string(),
                )
                .parse()
                .context("Invalid APPOINTMENT_DURATION_MINUTES value")?,
                time_slots: match env::var("TIME_SLOTS") {
                    Ok(raw) => parse_time_slots(&raw).context("Invalid TIME_SLOTS value")?,
                    Err(_) => default_time_slots(),
                },
            },
            submission: SubmissionConfig {
                timeout: Duration::from_secs(
                    env_var_or(
                        "SUBMISSION_TIMEOUT_SECS",
                        &scheduling::DEFAULT_SUBMISSION_TIMEOUT_SECS.to_string(),
                    )
                    .parse()
                    .context("Invalid SUBMISSION_TIMEOUT_SECS value")?,
                ),
            },
            pending: PendingBookingConfig {
                slot: env_var_or("PENDING_BOOKING_SLOT", persistence::PENDING_BOOKING_SLOT),
                ttl: Duration::from_secs(
                    env_var_or(
                        "PENDING_BOOKING_TTL_SECS",
                        &persistence::DEFAULT_PENDING_BOOKING_TTL_SECS.to_string(),
                    )
                    .parse()
                    .context("Invalid PENDING_BOOKING_TTL_SECS value")?,
                ),
                store_path: env::var("PENDING_STORE_PATH").ok().map(PathBuf::from),
            },
        };

        config.validate()?;
        info!("Booking configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.pricing.tax_rate) {
            return Err(anyhow::anyhow!(
                "TAX_RATE must be in [0, 1), got {}",
                self.pricing.tax_rate
            ));
        }
        if self.scheduling.appointment_duration_minutes == 0 {
            return Err(anyhow::anyhow!(
                "APPOINTMENT_DURATION_MINUTES must be positive"
            ));
        }
        if self.scheduling.time_slots.is_empty() {
            return Err(anyhow::anyhow!("TIME_SLOTS must list at least one slot"));
        }
        if self.submission.timeout.is_zero() {
            return Err(anyhow::anyhow!("SUBMISSION_TIMEOUT_SECS must be positive"));
        }
        if self.pending.slot.trim().is_empty() {
            return Err(anyhow::anyhow!("PENDING_BOOKING_SLOT cannot be empty"));
        }
        Ok(())
    }

    /// Pricing engine configured with this tax rate
    #[must_use]
    pub const fn pricing_engine(&self) -> PricingEngine {
        PricingEngine::new(self.pricing.tax_rate)
    }

    /// Configuration summary for logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Salon Booking Configuration:\n\
             - Environment: {}\n\
             - Database: {}\n\
             - Tax Rate: {}\n\
             - Appointment Duration: {} min\n\
             - Time Slots: {}\n\
             - Submission Timeout: {}s\n\
             - Pending Store: {}",
            self.environment,
            self.database.url,
            self.pricing.tax_rate,
            self.scheduling.appointment_duration_minutes,
            self.scheduling.time_slots.len(),
            self.submission.timeout.as_secs(),
            self.pending
                .store_path
                .as_ref()
                .map_or_else(|| "memory".to_owned(), |p| p.display().to_string()),
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// The built-in hourly slot enumeration
#[must_use]
pub fn default_time_slots() -> Vec<TimeSlot> {
    scheduling::DEFAULT_TIME_SLOTS
        .iter()
        .filter_map(|label| TimeSlot::parse(label).ok())
        .collect()
}

/// Parse a comma-separated slot list such as `"10:00 AM, 1:30 PM"`
fn parse_time_slots(raw: &str) -> Result<Vec<TimeSlot>> {
    let mut slots = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| TimeSlot::parse(s).map_err(|e| anyhow::anyhow!("{s}: {e}")))
        .collect::<Result<Vec<_>>>()?;
    slots.sort();
    slots.dedup();
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 6] = [
        "TAX_RATE",
        "TIME_SLOTS",
        "APPOINTMENT_DURATION_MINUTES",
        "SUBMISSION_TIMEOUT_SECS",
        "PENDING_BOOKING_SLOT",
        "PENDING_STORE_PATH",
    ];

    fn clear_vars() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str_or_default("PROD"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default("test"),
            Environment::Testing
        );
        assert_eq!(
            Environment::from_str_or_default("invalid"),
            Environment::Development
        );
    }

    #[test]
    fn test_parse_time_slots() {
        let slots = parse_time_slots("11:00 AM, 10:00,10:00 AM, 1:30 PM").unwrap();
        let labels: Vec<String> = slots.iter().map(TimeSlot::label).collect();
        assert_eq!(labels, vec!["10:00 AM", "11:00 AM", "01:30 PM"]);
        assert!(parse_time_slots("25:00").is_err());
    }

    #[test]
    fn test_default_slots_are_hourly() {
        let slots = default_time_slots();
        assert_eq!(slots.len(), scheduling::DEFAULT_TIME_SLOTS.len());
        assert_eq!(slots[0].label(), "10:00 AM");
        assert_eq!(slots[slots.len() - 1].label(), "07:00 PM");
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_vars();
        let config = BookingConfig::from_env().unwrap();

        assert!((config.pricing.tax_rate - 0.18).abs() < f64::EPSILON);
        assert_eq!(config.scheduling.appointment_duration_minutes, 60);
        assert_eq!(config.submission.timeout, Duration::from_secs(15));
        assert_eq!(config.pending.slot, "pendingBooking");
        assert!(config.pending.store_path.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides_and_rejects() {
        clear_vars();
        env::set_var("TAX_RATE", "0.05");
        env::set_var("TIME_SLOTS", "09:00 AM,09:30 AM");
        let config = BookingConfig::from_env().unwrap();
        assert!((config.pricing_engine().tax_rate() - 0.05).abs() < f64::EPSILON);
        assert_eq!(config.scheduling.time_slots.len(), 2);

        env::set_var("TAX_RATE", "1.5");
        assert!(BookingConfig::from_env().is_err());

        env::set_var("TAX_RATE", "abc");
        let err = BookingConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("TAX_RATE"));

        clear_vars();
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = BookingConfig::default();
        assert!(config.validate().is_ok());
        config.submission.timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
