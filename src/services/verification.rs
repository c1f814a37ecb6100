// src/services/verification.rs
//
// Fraud checks run before a price tag submission earns points. The vision model
// call and the lookups of recent submissions and store coordinates happen
// upstream; this module only decides on the data it is handed.
use chrono::{DateTime, Duration, Utc};
use geo::{HaversineDistance, Point};
use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct VerificationPolicy {
    /// A repeat of the same user/product/store inside this window is a duplicate.
    pub duplicate_window: Duration,
    pub max_store_distance_m: f64,
    pub min_vision_confidence: f64,
    pub points_per_submission: i64,
}

impl Default for VerificationPolicy {
    fn default() -> Self {
        VerificationPolicy {
            duplicate_window: Duration::hours(24),
            max_store_distance_m: 1000.0,
            min_vision_confidence: 0.7,
            points_per_submission: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Great-circle distance in metres.
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        // geo points are (x = longitude, y = latitude)
        let a = Point::new(self.longitude, self.latitude);
        let b = Point::new(other.longitude, other.latitude);
        a.haversine_distance(&b)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub user_id: String,
    pub product_id: String,
    pub store_id: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorSubmission {
    pub user_id: String,
    pub product_id: String,
    pub store_id: String,
    pub submitted_at: DateTime<Utc>,
}

/// What the vision model said about the uploaded photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionVerdict {
    pub is_price_tag: bool,
    pub confidence: f64,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub submission: Submission,
    pub vision: VisionVerdict,
    #[serde(default)]
    pub store_location: Option<GeoPoint>,
    /// Earlier submissions, not including the one being verified.
    #[serde(default)]
    pub recent_submissions: Vec<PriorSubmission>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum RejectionReason {
    NotAPriceTag { detail: Option<String> },
    LowConfidence { confidence: f64, required: f64 },
    DuplicateSubmission { previous_at: DateTime<Utc> },
    TooFarFromStore { distance_m: f64, limit_m: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerificationOutcome {
    Verified { points: i64 },
    Rejected { reason: RejectionReason },
}

fn check_image(vision: &VisionVerdict, policy: &VerificationPolicy) -> Result<(), RejectionReason> {
    if !vision.is_price_tag {
        return Err(RejectionReason::NotAPriceTag {
            detail: vision.reason.clone(),
        });
    }
    if vision.confidence < policy.min_vision_confidence {
        return Err(RejectionReason::LowConfidence {
            confidence: vision.confidence,
            required: policy.min_vision_confidence,
        });
    }
    Ok(())
}

fn check_duplicate(
    submission: &Submission,
    recent: &[PriorSubmission],
    policy: &VerificationPolicy,
) -> Result<(), RejectionReason> {
    let previous = recent
        .iter()
        .filter(|prior| {
            prior.user_id == submission.user_id
                && prior.product_id == submission.product_id
                && prior.store_id == submission.store_id
        })
        .map(|prior| prior.submitted_at)
        .filter(|at| {
            let elapsed = submission.submitted_at - *at;
            elapsed >= Duration::zero() && elapsed < policy.duplicate_window
        })
        .max();

    match previous {
        Some(previous_at) => Err(RejectionReason::DuplicateSubmission { previous_at }),
        None => Ok(()),
    }
}

fn check_distance(
    submission: &Submission,
    store_location: Option<&GeoPoint>,
    policy: &VerificationPolicy,
) -> Result<(), RejectionReason> {
    let (Some(from), Some(store)) = (submission.location.as_ref(), store_location) else {
        return Ok(());
    };
    let distance_m = from.distance_m(store);
    if distance_m > policy.max_store_distance_m {
        return Err(RejectionReason::TooFarFromStore {
            distance_m,
            limit_m: policy.max_store_distance_m,
        });
    }
    Ok(())
}

/// Run the image, duplicate and distance checks in that order and award points
/// when all of them pass.
pub fn verify_submission(request: &VerificationRequest, policy: &VerificationPolicy) -> VerificationOutcome {
    let submission = &request.submission;
    let result = check_image(&request.vision, policy)
        .and_then(|_| check_duplicate(submission, &request.recent_submissions, policy))
        .and_then(|_| check_distance(submission, request.store_location.as_ref(), policy));

    match result {
        Ok(()) => {
            info!(
                "Verified submission by {} for product {} at store {}",
                submission.user_id, submission.product_id, submission.store_id
            );
            VerificationOutcome::Verified {
                points: policy.points_per_submission,
            }
        }
        Err(reason) => {
            warn!("Rejected submission by {}: {:?}", submission.user_id, reason);
            VerificationOutcome::Rejected { reason }
        }
    }
}
