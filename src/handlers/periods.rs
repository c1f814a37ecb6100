// src/handlers/periods.rs
use log::{debug, info};
use serde::{Deserialize, Serialize};
use warp::reply::Json;
use warp::Rejection;

use crate::models::CivilDate;
use crate::services::discount::{
    format_period, is_active, parse_period, start_display, start_sort_key, today_in_seoul,
};

#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
struct NormalizedPeriod {
    original: Option<String>,
    canonical: Option<String>,
    start: Option<CivilDate>,
    end: Option<CivilDate>,
    start_sort_key: Option<u32>,
    start_display: Option<String>,
    active: bool,
}

pub async fn normalize_period(body: NormalizeRequest) -> Result<Json, Rejection> {
    info!("Handling request to normalize a discount period");

    let today = today_in_seoul();
    let text = body.text.as_deref();
    let period = parse_period(text, today);
    debug!("Parsed {:?} as {:?} (today {})", text, period, today);

    let response = NormalizedPeriod {
        original: body.text.clone(),
        canonical: format_period(text, today),
        start: period.map(|p| p.start),
        end: period.map(|p| p.end),
        start_sort_key: start_sort_key(text, today),
        start_display: start_display(text, today),
        active: is_active(text, today),
    };

    Ok(warp::reply::json(&response))
}
