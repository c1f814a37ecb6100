// src/services/csv_import.rs
use anyhow::{Context, Result};
use csv::Reader;
use log::info;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::models::RawPriceRecord;

/// Read price rows from a CSV export of the price history table.
///
/// Expected header: `product_id,store_id,recorded_at,selling_price,discount_price,current_price,discount_period`
/// with `recorded_at` in RFC 3339. Empty `discount_price` / `discount_period` cells are read as absent.
pub fn read_price_records<R: Read>(reader: R) -> Result<Vec<RawPriceRecord>> {
    let mut rdr = Reader::from_reader(reader);
    let mut records = Vec::new();
    for (idx, row) in rdr.deserialize::<RawPriceRecord>().enumerate() {
        // +2: header line and 1-based numbering
        let record = row.with_context(|| format!("Invalid price record on line {}", idx + 2))?;
        records.push(record);
    }
    Ok(records)
}

pub fn load_price_records(path: &Path) -> Result<Vec<RawPriceRecord>> {
    info!("Loading price records from {}", path.display());
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let records = read_price_records(file)?;
    info!("Loaded {} price records", records.len());
    Ok(records)
}
