// ABOUTME: Salon booking CLI - price quotes and staff availability from the command line
// ABOUTME: Wraps the pricing engine and availability checker behind clap subcommands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Price two services from a catalog file with a coupon
//! salon-booking-cli quote --catalog services.json --service cut --service spa --coupon welcome10
//!
//! # Check one slot for a stylist
//! salon-booking-cli availability --staff stylist-1 --date 2024-06-01 --time "10:00 AM"
//!
//! # List every free slot for a stylist that day
//! salon-booking-cli availability --staff stylist-1 --date 2024-06-01
//!
//! # Take the booking saved before a sign-in redirect
//! PENDING_STORE_PATH=./pending.json salon-booking-cli pending
//! ```
//!
//! Failures are printed to stderr as a JSON error payload with a stable code.

mod commands;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use salon_booking::config::BookingConfig;
use salon_booking::errors;
use salon_booking::logging::LoggingConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser)]
#[command(
    name = "salon-booking-cli",
    about = "Salon booking engine CLI",
    long_about = "Price service selections, check staff availability against the appointment store, and inspect the pending booking."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Price a set of services with an optional coupon
    Quote {
        /// JSON file holding an array of catalog services
        #[arg(long)]
        catalog: PathBuf,

        /// Service ID to include (repeatable)
        #[arg(long = "service", required = true)]
        services: Vec<String>,

        /// Coupon code
        #[arg(long)]
        coupon: Option<String>,
    },

    /// Check a staff member's availability
    Availability {
        /// Staff ID
        #[arg(long)]
        staff: String,

        /// Day in YYYY-MM-DD form
        #[arg(long)]
        date: NaiveDate,

        /// Slot such as "10:00 AM"; lists every free slot when omitted
        #[arg(long)]
        time: Option<String>,
    },

    /// Take and print the pending booking saved before sign-in
    Pending,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("Command failed: {error:#}");
            eprintln!("{}", errors::render(error));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        "debug".clone_into(&mut logging.level);
    }
    logging.init()?;

    let mut config = BookingConfig::from_env()?;
    if let Some(url) = cli.database_url {
        config.database.url = url;
    }
    info!("{}", config.summary());

    match cli.command {
        Command::Quote {
            catalog,
            services,
            coupon,
        } => commands::quote::run(&config, &catalog, &services, coupon.as_deref()).await,
        Command::Availability { staff, date, time } => {
            commands::availability::run(&config, &staff, date, time.as_deref()).await
        }
        Command::Pending => commands::pending::run(&config).await,
    }
}
