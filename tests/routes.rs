use club_price_tracker::config::AppConfig;
use club_price_tracker::routes::routes;
use club_price_tracker::services::verification::VerificationPolicy;
use serde_json::{json, Value};
use std::sync::Arc;
use warp::http::StatusCode;

// wide enough to be active whenever the tests run
const ALWAYS_ON: &str = "20.01.01 ~ 99.12.31";

fn api() -> impl warp::Filter<Extract = (impl warp::Reply,), Error = std::convert::Infallible> + Clone {
    routes(Arc::new(AppConfig {
        port: 0,
        verification: VerificationPolicy::default(),
    }))
}

async fn post(path: &str, body: Value) -> (StatusCode, Value) {
    let resp = warp::test::request()
        .method("POST")
        .path(path)
        .json(&body)
        .reply(&api())
        .await;
    let status = resp.status();
    let body = serde_json::from_slice(resp.body()).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn normalizes_discount_period() {
    let (status, body) = post(
        "/api/v1/discount-periods/normalize",
        json!({ "text": "26.01.05 ~ 26.01.19" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["canonical"], "26.01.05 - 26.01.19");
    assert_eq!(body["start_sort_key"], 260105);
    assert_eq!(body["start_display"], "26.01.05");
    assert_eq!(body["start"], json!({ "year": 2026, "month": 1, "day": 5 }));
}

#[tokio::test]
async fn garbage_period_passes_through() {
    let (status, body) = post(
        "/api/v1/discount-periods/normalize",
        json!({ "text": "garbage text" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["canonical"], "garbage text");
    assert_eq!(body["start"], Value::Null);
    assert_eq!(body["active"], false);

    let (_, body) = post("/api/v1/discount-periods/normalize", json!({})).await;
    assert_eq!(body["canonical"], Value::Null);
    assert_eq!(body["active"], false);
}

#[tokio::test]
async fn history_is_sorted_and_deduplicated() {
    let (status, body) = post(
        "/api/v1/prices/history",
        json!({ "records": [
            { "product_id": "p-1", "store_id": "yangjae", "recorded_at": "2025-12-02T01:00:00Z",
              "selling_price": 15990, "discount_price": 3000, "current_price": 12990,
              "discount_period": "25.12.01 - 25.12.14" },
            { "product_id": "p-1", "store_id": "yangjae", "recorded_at": "2025-12-05T01:00:00Z",
              "selling_price": 15990, "discount_price": 12990, "current_price": 12990,
              "discount_period": "25.12.01 ~ 25.12.20" },
            { "product_id": "p-1", "store_id": "yangjae", "recorded_at": "2025-11-20T01:00:00Z",
              "selling_price": 15990, "current_price": 15990 }
        ]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let history = body.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["recorded_at"], "2025-12-05T01:00:00Z");
    assert_eq!(history[0]["discount_amount"], 3000);
    assert_eq!(history[0]["discounted_price"], 12990);
    assert_eq!(history[1]["current_price"], 15990);
}

#[tokio::test]
async fn compares_stores_with_discount_first() {
    let (status, body) = post(
        "/api/v1/prices/compare",
        json!({ "records": [
            { "product_id": "p-1", "store_id": "a-yangjae", "recorded_at": "2025-12-05T01:00:00Z",
              "selling_price": 10000, "current_price": 10000 },
            { "product_id": "p-1", "store_id": "b-sangbong", "recorded_at": "2025-12-05T01:00:00Z",
              "selling_price": 10000, "discount_price": 500, "current_price": 9500,
              "discount_period": ALWAYS_ON }
        ]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lowest"]["store_id"], "b-sangbong");
    assert_eq!(body["lowest"]["on_discount"], true);
    assert_eq!(body["stores"][0]["store_id"], "b-sangbong");
    assert_eq!(body["stores"][1]["store_id"], "a-yangjae");
    assert_eq!(body["stores"][1]["on_discount"], false);
}

#[tokio::test]
async fn rejects_mixed_products() {
    let (status, body) = post(
        "/api/v1/prices/compare",
        json!({ "records": [
            { "product_id": "p-1", "store_id": "a", "recorded_at": "2025-12-05T01:00:00Z",
              "selling_price": 10000, "current_price": 10000 },
            { "product_id": "p-2", "store_id": "a", "recorded_at": "2025-12-05T01:00:00Z",
              "selling_price": 20000, "current_price": 20000 }
        ]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("single product"));
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let (status, body) = post("/api/v1/prices/compare", json!({ "records": "nope" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn verifies_submission() {
    let (status, body) = post(
        "/api/v1/submissions/verify",
        json!({
            "submission": {
                "user_id": "u-1", "product_id": "p-1", "store_id": "yangjae",
                "submitted_at": "2025-12-10T05:00:00Z",
                "location": { "latitude": 37.4640, "longitude": 127.0435 }
            },
            "vision": { "is_price_tag": true, "confidence": 0.95 },
            "store_location": { "latitude": 37.4633, "longitude": 127.0432 },
            "recent_submissions": []
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "verified", "points": 10 }));
}

#[tokio::test]
async fn duplicate_submission_is_rejected() {
    let (status, body) = post(
        "/api/v1/submissions/verify",
        json!({
            "submission": {
                "user_id": "u-1", "product_id": "p-1", "store_id": "yangjae",
                "submitted_at": "2025-12-10T05:00:00Z"
            },
            "vision": { "is_price_tag": true, "confidence": 0.95 },
            "recent_submissions": [
                { "user_id": "u-1", "product_id": "p-1", "store_id": "yangjae",
                  "submitted_at": "2025-12-10T01:00:00Z" }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["reason"]["code"], "duplicate_submission");
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let (status, body) = post("/api/v1/nothing", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn huge_discount_price_still_compares() {
    let (status, body) = post(
        "/api/v1/prices/compare",
        json!({ "records": [
            { "product_id": "p-1", "store_id": "a-yangjae", "recorded_at": "2025-12-05T01:00:00Z",
              "selling_price": 10000, "discount_price": 4611686018427387904_i64, "current_price": 10000,
              "discount_period": ALWAYS_ON }
        ]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lowest"]["store_id"], "a-yangjae");
    assert_eq!(body["lowest"]["on_discount"], false);
}
