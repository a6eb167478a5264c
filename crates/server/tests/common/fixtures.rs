//! Request helpers and data fixtures shared across integration tests.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

/// Fresh idempotency key for a single mutating request.
#[allow(dead_code)]
pub fn ikey() -> String {
    Uuid::new_v4().to_string()
}

/// Send a JSON request through the router and decode the JSON response.
///
/// `idempotency_key` is attached as the `Idempotency-Key` header when given;
/// mutating routes reject requests without one.
#[allow(dead_code)]
pub async fn json_request(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
    idempotency_key: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(key) = idempotency_key {
        builder = builder.header("Idempotency-Key", key);
    }

    let body = match body {
        Some(v) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    let request = builder.body(body).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body_json: serde_json::Value = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, body_json)
}

/// Create a country through the API and return its ID.
#[allow(dead_code)]
pub async fn create_country(router: &axum::Router, name: &str) -> String {
    let (status, body) = json_request(
        router,
        "POST",
        "/v1/countries",
        Some(json!({ "country_name": name })),
        Some(&ikey()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "country setup failed: {body}");
    body["country_id"].as_str().unwrap().to_string()
}

/// Create a distillery through the API and return its ID.
#[allow(dead_code)]
pub async fn create_distillery(router: &axum::Router, name: &str, country_id: &str) -> String {
    let (status, body) = json_request(
        router,
        "POST",
        "/v1/distilleries",
        Some(json!({
            "distillery_name": name,
            "country_id": country_id,
        })),
        Some(&ikey()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "distillery setup failed: {body}");
    body["distillery_id"].as_str().unwrap().to_string()
}

/// Create a brand through the API and return its ID.
#[allow(dead_code)]
pub async fn create_brand(router: &axum::Router, name: &str) -> String {
    let (status, body) = json_request(
        router,
        "POST",
        "/v1/brands",
        Some(json!({ "brand_name": name })),
        Some(&ikey()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "brand setup failed: {body}");
    body["brand_id"].as_str().unwrap().to_string()
}
