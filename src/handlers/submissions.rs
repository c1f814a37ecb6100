// src/handlers/submissions.rs
use log::info;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use crate::config::AppConfig;
use crate::services::verification::{verify_submission, VerificationRequest};

pub async fn verify(config: Arc<AppConfig>, body: VerificationRequest) -> Result<Json, Rejection> {
    info!(
        "Handling verification for user {} at store {}",
        body.submission.user_id, body.submission.store_id
    );

    let outcome = verify_submission(&body, &config.verification);
    Ok(warp::reply::json(&outcome))
}
