// src/services/pricing.rs
use chrono::NaiveDate;
use log::debug;
use serde::Serialize;
use std::collections::HashSet;

use crate::models::{PriceRecord, RawPriceRecord};
use crate::services::discount::start_sort_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiscountBreakdown {
    pub amount: i64,
    pub discounted_price: i64,
}

/// Split the overloaded `discount_price` column into an amount and a final price.
///
/// Upstream rows store either the amount taken off or the price after the discount
/// in the same column. Anything above 30% of the selling price is read as the final
/// price, anything at or below it as the amount.
pub fn resolve_discount(selling_price: i64, discount_price: Option<i64>) -> Option<DiscountBreakdown> {
    let discount_price = discount_price?;
    // integer form of `discount_price > selling_price * 0.3`, widened so request values cannot overflow
    let breakdown = if discount_price as i128 * 10 > selling_price as i128 * 3 {
        DiscountBreakdown {
            amount: selling_price.saturating_sub(discount_price),
            discounted_price: discount_price,
        }
    } else {
        DiscountBreakdown {
            amount: discount_price,
            discounted_price: selling_price.saturating_sub(discount_price),
        }
    };
    Some(breakdown)
}

pub fn normalize(raw: RawPriceRecord) -> PriceRecord {
    let breakdown = resolve_discount(raw.selling_price, raw.discount_price);
    PriceRecord {
        product_id: raw.product_id,
        store_id: raw.store_id,
        recorded_at: raw.recorded_at,
        selling_price: raw.selling_price,
        discount_amount: breakdown.map(|b| b.amount),
        discounted_price: breakdown.map(|b| b.discounted_price),
        current_price: raw.current_price,
        discount_period: raw.discount_period,
    }
}

pub fn normalize_all(raw: Vec<RawPriceRecord>) -> Vec<PriceRecord> {
    raw.into_iter().map(normalize).collect()
}

/// Stable sort, most recent `recorded_at` first.
pub fn sort_newest_first(records: &mut [PriceRecord]) {
    records.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
}

/// `(period start as YYMMDD or 0, current price)`
pub fn dedupe_key(record: &PriceRecord, today: NaiveDate) -> (u32, i64) {
    let start = start_sort_key(record.discount_period.as_deref(), today).unwrap_or(0);
    (start, record.current_price)
}

/// Collapse price history that describes the same discount event.
///
/// `records` must already be newest first: the first record seen for a key is kept,
/// so the survivor of each group is its most recent registration. Plain prices with
/// no period share the start key 0 and collapse per price.
pub fn dedupe(records: Vec<PriceRecord>, today: NaiveDate) -> Vec<PriceRecord> {
    let total = records.len();
    let mut seen = HashSet::new();
    let retained: Vec<PriceRecord> = records
        .into_iter()
        .filter(|record| seen.insert(dedupe_key(record, today)))
        .collect();

    debug!("Deduplicated price history: kept {} of {}", retained.len(), total);
    retained
}
