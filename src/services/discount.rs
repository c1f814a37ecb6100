//! Discount period text handling.
//!
//! Price tags and manual registrations carry the discount period as free text in
//! one of three shapes:
//! - `YY.MM.DD ~ YY.MM.DD`, e.g. "26.01.05 ~ 26.01.19"
//! - `YY.MM.DD - YY.MM.DD`, e.g. "25.12.01 - 25.12.14"
//! - `MM/DD - MM/DD`, e.g. "12/01 - 12/14" (legacy, no year)
//!
//! Everything here is total: unparsable text is "no period", never an error.
//! The current date is passed in explicitly; [`today_in_seoul`] supplies it at
//! the HTTP and CLI edges.

use chrono::{Datelike, NaiveDate, Utc};
use chrono_tz::Asia::Seoul;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::models::{CivilDate, DiscountPeriod};

static TILDE_PERIOD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{2})\.(\d{2})\.(\d{2})\s*~\s*(\d{2})\.(\d{2})\.(\d{2})").unwrap());

static DASH_PERIOD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{2})\.(\d{2})\.(\d{2})\s*-\s*(\d{2})\.(\d{2})\.(\d{2})").unwrap());

static SLASH_PERIOD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})/(\d{1,2})\s*-\s*(\d{1,2})/(\d{1,2})").unwrap());

/// The civil date in Korea right now, regardless of the host's local time zone.
pub fn today_in_seoul() -> NaiveDate {
    Utc::now().with_timezone(&Seoul).date_naive()
}

/// Parse a discount period, trying the tilde, dash and slash formats in that order.
///
/// The first pattern that matches decides the result: if any of its month or day
/// fields is out of range the whole text is rejected, later patterns are not tried.
/// Slash periods take their year from `today`; a period whose end month/day comes
/// before its start month/day crosses New Year, and `today` decides which side of
/// the boundary it sits on.
pub fn parse_period(text: Option<&str>, today: NaiveDate) -> Option<DiscountPeriod> {
    let text = text?;

    if let Some(caps) = TILDE_PERIOD.captures(text) {
        return dated_period(&caps);
    }
    if let Some(caps) = DASH_PERIOD.captures(text) {
        return dated_period(&caps);
    }
    if let Some(caps) = SLASH_PERIOD.captures(text) {
        return month_day_period(&caps, today);
    }

    None
}

/// Whether `today` falls inside the period, both ends inclusive.
pub fn is_active(text: Option<&str>, today: NaiveDate) -> bool {
    parse_period(text, today)
        .map(|period| period.contains(CivilDate::from(today)))
        .unwrap_or(false)
}

/// Canonical `YY.MM.DD - YY.MM.DD` form of the period.
///
/// Text that does not parse is handed back unchanged so legacy data still displays.
pub fn format_period(text: Option<&str>, today: NaiveDate) -> Option<String> {
    let original = text?;
    match parse_period(Some(original), today) {
        Some(period) => Some(period.to_string()),
        None => Some(original.to_string()),
    }
}

/// `YYMMDD` of the start date.
pub fn start_sort_key(text: Option<&str>, today: NaiveDate) -> Option<u32> {
    parse_period(text, today).map(|period| period.start.short_key())
}

/// `YY.MM.DD` of the start date.
pub fn start_display(text: Option<&str>, today: NaiveDate) -> Option<String> {
    parse_period(text, today).map(|period| period.start.short_display())
}

fn field(caps: &Captures, idx: usize) -> Option<u32> {
    caps.get(idx)?.as_str().parse().ok()
}

fn in_range(month: u32, day: u32) -> bool {
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

fn two_digit_year_date(caps: &Captures, first: usize) -> Option<CivilDate> {
    let year = field(caps, first)?;
    let month = field(caps, first + 1)?;
    let day = field(caps, first + 2)?;
    in_range(month, day).then(|| CivilDate::new(2000 + year as i32, month, day))
}

fn dated_period(caps: &Captures) -> Option<DiscountPeriod> {
    let start = two_digit_year_date(caps, 1)?;
    let end = two_digit_year_date(caps, 4)?;
    // explicit years cannot be wrapped, so a reversed range is bad data
    if end.key() < start.key() {
        return None;
    }
    Some(DiscountPeriod { start, end })
}

fn month_day_period(caps: &Captures, today: NaiveDate) -> Option<DiscountPeriod> {
    let start_month = field(caps, 1)?;
    let start_day = field(caps, 2)?;
    let end_month = field(caps, 3)?;
    let end_day = field(caps, 4)?;
    if !in_range(start_month, start_day) || !in_range(end_month, end_day) {
        return None;
    }

    let start_md = start_month * 100 + start_day;
    let end_md = end_month * 100 + end_day;
    let today_md = today.month() * 100 + today.day();
    let year = today.year();

    let (start_year, end_year) = if end_md >= start_md {
        (year, year)
    } else if today_md >= start_md {
        (year, year + 1)
    } else {
        (year - 1, year)
    };

    Some(DiscountPeriod {
        start: CivilDate::new(start_year, start_month, start_day),
        end: CivilDate::new(end_year, end_month, end_day),
    })
}
