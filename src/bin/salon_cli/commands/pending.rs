// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Pending command consuming the booking saved before a sign-in redirect
// ABOUTME: Prints the restored step and draft summary, leaving the slot empty

use anyhow::Result;
use salon_booking::booking::PendingBookingPersistence;
use salon_booking::config::BookingConfig;
use salon_booking::store::store_from_config;

/// Take the pending booking from the configured store and print it
pub async fn run(config: &BookingConfig) -> Result<()> {
    if config.pending.store_path.is_none() {
        println!("PENDING_STORE_PATH is not set; the in-memory store is always empty");
    }
    let persistence =
        PendingBookingPersistence::from_config(store_from_config(&config.pending), &config.pending);

    let Some(pending) = persistence.load_and_clear().await? else {
        println!("No pending booking in slot '{}'", persistence.slot());
        return Ok(());
    };

    let draft = &pending.draft;
    println!("Pending booking at step {}", pending.step);
    println!("  Branch:   {}", draft.branch_id().unwrap_or("-"));
    println!("  Services: {}", draft.service_ids().join(", "));
    match (draft.date(), draft.time()) {
        (Some(date), Some(time)) => println!("  When:     {date} {time}"),
        (Some(date), None) => println!("  When:     {date}"),
        _ => println!("  When:     -"),
    }
    if let Some(coupon) = draft.coupon() {
        println!("  Coupon:   {}", coupon.code);
    }
    let quote = config.pricing_engine().quote(draft.services(), draft.coupon());
    for line in quote.format_lines(&config.pricing.currency_symbol) {
        println!("  {line}");
    }
    Ok(())
}
