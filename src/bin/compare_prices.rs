// src/bin/compare_prices.rs
//
// Usage: compare_prices <price_history.csv>
use anyhow::{bail, Result};
use club_price_tracker::models::PriceRecord;
use club_price_tracker::services::comparison::compare_stores;
use club_price_tracker::services::csv_import::load_price_records;
use club_price_tracker::services::discount::{format_period, today_in_seoul};
use club_price_tracker::services::pricing::normalize_all;
use dotenv::dotenv;
use log::info;
use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let Some(path) = env::args().nth(1).map(PathBuf::from) else {
        bail!("usage: compare_prices <price_history.csv>");
    };

    let records = normalize_all(load_price_records(&path)?);
    let today = today_in_seoul();
    info!("Comparing prices as of {} (Asia/Seoul)", today);

    let mut by_product: BTreeMap<String, Vec<PriceRecord>> = BTreeMap::new();
    for record in records {
        by_product.entry(record.product_id.clone()).or_default().push(record);
    }

    for (product_id, records) in &by_product {
        let comparison = compare_stores(records, today);
        match &comparison.lowest {
            Some(lowest) => println!(
                "{product_id}: lowest {} at {}",
                lowest.record.current_price, lowest.store_id
            ),
            None => println!("{product_id}: no prices"),
        }

        for store in &comparison.stores {
            if store.on_discount {
                let period = format_period(store.record.discount_period.as_deref(), today).unwrap_or_default();
                println!(
                    "  {:<16} {:>8} (-{} during {})",
                    store.store_id, store.record.current_price, store.discount_amount, period
                );
            } else {
                println!("  {:<16} {:>8}", store.store_id, store.record.selling_price);
            }
        }
    }

    Ok(())
}
