// src/handlers/prices.rs
use log::{error, info};
use serde::Deserialize;
use std::collections::BTreeSet;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::models::RawPriceRecord;
use crate::services::comparison::compare_stores;
use crate::services::discount::today_in_seoul;
use crate::services::pricing::{dedupe, normalize_all, sort_newest_first};

#[derive(Debug, Deserialize)]
pub struct PriceRecordsRequest {
    pub records: Vec<RawPriceRecord>,
}

// Dedupe keys and store comparisons are per product.
fn ensure_single_product(records: &[RawPriceRecord]) -> Result<(), Rejection> {
    let products: BTreeSet<&str> = records.iter().map(|r| r.product_id.as_str()).collect();
    if products.len() > 1 {
        error!("Price request mixes {} products", products.len());
        return Err(warp::reject::custom(ApiError::bad_request(format!(
            "records must belong to a single product, got {}",
            products.len()
        ))));
    }
    Ok(())
}

pub async fn get_price_history(body: PriceRecordsRequest) -> Result<Json, Rejection> {
    info!("Handling request to deduplicate {} price records", body.records.len());
    ensure_single_product(&body.records)?;

    let mut records = normalize_all(body.records);
    sort_newest_first(&mut records);
    let history = dedupe(records, today_in_seoul());

    Ok(warp::reply::json(&history))
}

pub async fn compare_prices(body: PriceRecordsRequest) -> Result<Json, Rejection> {
    info!("Handling request to compare {} price records across stores", body.records.len());
    ensure_single_product(&body.records)?;

    let records = normalize_all(body.records);
    let comparison = compare_stores(&records, today_in_seoul());
    if let Some(lowest) = &comparison.lowest {
        info!("Lowest price {} at store {}", lowest.record.current_price, lowest.store_id);
    }

    Ok(warp::reply::json(&comparison))
}
