// src/models.rs
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar date with no time-of-day or offset attached.
///
/// Fields are only range checked (month 1-12, day 1-31) by the period parser,
/// so comparisons go through [`CivilDate::key`] rather than a calendar type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CivilDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CivilDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        CivilDate { year, month, day }
    }

    /// `YYYYMMDD` as one comparable integer.
    pub fn key(&self) -> i64 {
        self.year as i64 * 10000 + self.month as i64 * 100 + self.day as i64
    }

    /// `YYMMDD` with a two-digit year, used for sorting and grouping.
    pub fn short_key(&self) -> u32 {
        self.year.rem_euclid(100) as u32 * 10000 + self.month * 100 + self.day
    }

    /// `YY.MM.DD`
    pub fn short_display(&self) -> String {
        format!("{:02}.{:02}.{:02}", self.year.rem_euclid(100), self.month, self.day)
    }
}

impl From<NaiveDate> for CivilDate {
    fn from(date: NaiveDate) -> Self {
        CivilDate::new(date.year(), date.month(), date.day())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountPeriod {
    pub start: CivilDate,
    pub end: CivilDate,
}

impl DiscountPeriod {
    pub fn contains(&self, day: CivilDate) -> bool {
        self.start.key() <= day.key() && day.key() <= self.end.key()
    }
}

/// Canonical `YY.MM.DD - YY.MM.DD` rendering.
impl fmt::Display for DiscountPeriod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} - {}", self.start.short_display(), self.end.short_display())
    }
}

/// A price row as it comes out of the data layer or an export.
///
/// `discount_price` is overloaded upstream: it is either the discount amount or the
/// final discounted price. Use [`crate::services::pricing::normalize`] before
/// reading discount information from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPriceRecord {
    pub product_id: String,
    pub store_id: String,
    pub recorded_at: DateTime<Utc>,
    pub selling_price: i64,
    #[serde(default)]
    pub discount_price: Option<i64>,
    pub current_price: i64,
    #[serde(default)]
    pub discount_period: Option<String>,
}

/// A price row with the discount fields split into unambiguous values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub product_id: String,
    pub store_id: String,
    pub recorded_at: DateTime<Utc>,
    pub selling_price: i64,
    pub discount_amount: Option<i64>,
    pub discounted_price: Option<i64>,
    /// The price to display and compare, whatever the discount fields say.
    pub current_price: i64,
    pub discount_period: Option<String>,
}

impl PriceRecord {
    pub fn has_discount_amount(&self) -> bool {
        self.discount_amount.unwrap_or(0) > 0
    }
}
