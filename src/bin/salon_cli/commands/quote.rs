// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Quote command pricing catalog services with an optional coupon
// ABOUTME: Reads the catalog from a JSON file and prints the price breakdown

use std::path::Path;

use anyhow::{Context, Result};
use salon_booking::config::BookingConfig;
use salon_booking::database::{CatalogRepository, InMemoryDatabase};
use salon_booking::models::ServiceOffering;
use salon_booking::pricing::{CouponRegistry, StaticCouponRegistry};

/// Price `service_ids` from the catalog at `catalog_path`
pub async fn run(
    config: &BookingConfig,
    catalog_path: &Path,
    service_ids: &[String],
    coupon_code: Option<&str>,
) -> Result<()> {
    let raw = tokio::fs::read_to_string(catalog_path)
        .await
        .with_context(|| format!("Failed to read catalog {}", catalog_path.display()))?;
    let services: Vec<ServiceOffering> =
        serde_json::from_str(&raw).context("Catalog must be a JSON array of services")?;
    let catalog = InMemoryDatabase::with_records(services, Vec::new(), Vec::new());

    let mut selected: Vec<ServiceOffering> = Vec::with_capacity(service_ids.len());
    for id in service_ids {
        let service = catalog
            .get_service(id)
            .await?
            .with_context(|| format!("Unknown service '{id}'"))?;
        if !selected.iter().any(|s| s.id == service.id) {
            selected.push(service);
        }
    }

    let coupon = match coupon_code {
        Some(code) => {
            let found = StaticCouponRegistry::with_defaults().lookup(code).await?;
            if found.is_none() {
                println!("Coupon '{code}' is not valid; pricing without it");
            }
            found
        }
        None => None,
    };

    let currency = &config.pricing.currency_symbol;
    let quote = config.pricing_engine().quote(&selected, coupon.as_ref());

    println!("\nQuote");
    println!("{}", "=".repeat(40));
    for service in &selected {
        println!(
            "  {:<24} {currency}{:.2}",
            service.name,
            salon_booking::pricing::PricingEngine::service_price(service)
        );
    }
    if let Some(coupon) = &coupon {
        println!("  Coupon: {}", coupon.code);
    }
    println!("{}", "-".repeat(40));
    for line in quote.format_lines(currency) {
        println!("  {line}");
    }
    Ok(())
}
