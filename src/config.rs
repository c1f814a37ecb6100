// src/config.rs
use anyhow::{bail, Context, Result};
use chrono::Duration;
use log::warn;
use std::env;
use std::str::FromStr;

use crate::services::verification::VerificationPolicy;

// one year
const MAX_DUPLICATE_WINDOW_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub verification: VerificationPolicy,
}

impl AppConfig {
    /// Read settings from the process environment. Call `dotenv().ok()` first to
    /// pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = VerificationPolicy::default();

        let port = match lookup("PORT") {
            Some(value) => parse_value("PORT", &value)?,
            None => {
                warn!("$PORT not set, defaulting to 3030");
                3030
            }
        };

        let window_hours: i64 = parse_or("DUPLICATE_WINDOW_HOURS", &lookup, 24)?;
        if !(1..=MAX_DUPLICATE_WINDOW_HOURS).contains(&window_hours) {
            bail!(
                "DUPLICATE_WINDOW_HOURS must be between 1 and {MAX_DUPLICATE_WINDOW_HOURS}, got {window_hours}"
            );
        }
        let verification = VerificationPolicy {
            duplicate_window: Duration::hours(window_hours),
            max_store_distance_m: parse_or("MAX_STORE_DISTANCE_M", &lookup, defaults.max_store_distance_m)?,
            min_vision_confidence: parse_or("MIN_VISION_CONFIDENCE", &lookup, defaults.min_vision_confidence)?,
            points_per_submission: parse_or("SUBMISSION_POINTS", &lookup, defaults.points_per_submission)?,
        };

        Ok(AppConfig { port, verification })
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a number, got {value:?}"))
}

fn parse_or<T>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => parse_value(key, &value),
        None => Ok(default),
    }
}
