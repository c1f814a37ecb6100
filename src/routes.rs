// src/routes.rs
use log::{error, info};
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use std::sync::Arc;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::config::AppConfig;
use crate::handlers::error::ApiError;
use crate::handlers::periods::{normalize_period, NormalizeRequest};
use crate::handlers::prices::{compare_prices, get_price_history, PriceRecordsRequest};
use crate::handlers::submissions::verify;
use crate::services::verification::VerificationRequest;

const MAX_BODY_BYTES: u64 = 1024 * 1024;

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.clone();
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = e.to_string();
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        code = warp::http::StatusCode::PAYLOAD_TOO_LARGE;
        message = "Payload Too Large".to_string();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = warp::http::StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else {
        error!("Unhandled rejection: {:?}", err);
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

fn json_body<T: DeserializeOwned + Send>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

pub fn routes(config: Arc<AppConfig>) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    info!("Configuring routes...");

    let config_filter = warp::any().map(move || config.clone());

    let period_route = warp::path!("api" / "v1" / "discount-periods" / "normalize")
        .and(warp::post())
        .and(json_body::<NormalizeRequest>())
        .and_then(normalize_period);

    let history_route = warp::path!("api" / "v1" / "prices" / "history")
        .and(warp::post())
        .and(json_body::<PriceRecordsRequest>())
        .and_then(get_price_history);

    let compare_route = warp::path!("api" / "v1" / "prices" / "compare")
        .and(warp::post())
        .and(json_body::<PriceRecordsRequest>())
        .and_then(compare_prices);

    let verify_route = warp::path!("api" / "v1" / "submissions" / "verify")
        .and(warp::post())
        .and(config_filter.clone())
        .and(json_body::<VerificationRequest>())
        .and_then(verify);

    info!("All routes configured successfully.");

    period_route
        .or(history_route)
        .or(compare_route)
        .or(verify_route)
        .recover(handle_rejection)
}
