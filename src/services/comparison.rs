// src/services/comparison.rs
use chrono::NaiveDate;
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::PriceRecord;
use crate::services::discount::is_active;

/// One store's latest known price for a product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorePrice {
    pub store_id: String,
    pub on_discount: bool,
    pub discount_amount: i64,
    pub record: PriceRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceComparison {
    pub lowest: Option<StorePrice>,
    /// Discounted stores first (by current price), then regular stores (by selling price).
    pub stores: Vec<StorePrice>,
}

/// Latest record per store, keyed by store id.
///
/// When two records of a store share a timestamp the first one seen wins.
pub fn latest_by_store(records: &[PriceRecord]) -> BTreeMap<&str, &PriceRecord> {
    let mut latest: BTreeMap<&str, &PriceRecord> = BTreeMap::new();
    for record in records {
        latest
            .entry(record.store_id.as_str())
            .and_modify(|current| {
                if record.recorded_at > current.recorded_at {
                    *current = record;
                }
            })
            .or_insert(record);
    }
    latest
}

fn store_price(record: &PriceRecord, today: NaiveDate) -> StorePrice {
    let discount_amount = record.discount_amount.unwrap_or(0);
    StorePrice {
        store_id: record.store_id.clone(),
        on_discount: is_active(record.discount_period.as_deref(), today) && record.has_discount_amount(),
        discount_amount,
        record: record.clone(),
    }
}

/// Compare one product's prices across stores.
///
/// Stores are visited in store id order, so the lowest price ties go to the
/// lexically smallest store id.
pub fn compare_stores(records: &[PriceRecord], today: NaiveDate) -> PriceComparison {
    let latest = latest_by_store(records);

    let mut lowest: Option<&PriceRecord> = None;
    for record in latest.values().copied() {
        if lowest.map_or(true, |best| record.current_price < best.current_price) {
            lowest = Some(record);
        }
    }

    let (mut discounted, mut regular): (Vec<StorePrice>, Vec<StorePrice>) = latest
        .values()
        .map(|record| store_price(record, today))
        .partition(|store| store.on_discount);

    discounted.sort_by_key(|store| store.record.current_price);
    regular.sort_by_key(|store| store.record.selling_price);

    debug!(
        "Compared {} stores: {} on discount, {} regular",
        latest.len(),
        discounted.len(),
        regular.len()
    );

    discounted.extend(regular);
    PriceComparison {
        lowest: lowest.map(|record| store_price(record, today)),
        stores: discounted,
    }
}
