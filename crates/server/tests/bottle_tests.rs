//! Integration tests for bottle CRUD operations.

mod common;

use axum::http::StatusCode;
use common::{TestServer, create_brand, create_country, create_distillery, ikey, json_request};
use serde_json::json;
use uuid::Uuid;

async fn server_with_distillery() -> (TestServer, String) {
    let server = TestServer::new().await;
    let country_id = create_country(&server.router, "Scotland").await;
    let distillery_id = create_distillery(&server.router, "Lagavulin", &country_id).await;
    (server, distillery_id)
}

#[tokio::test]
async fn test_create_bottle_with_valid_data() {
    let (server, distillery_id) = server_with_distillery().await;
    let brand_id = create_brand(&server.router, "Gordon & MacPhail").await;

    let (status, body) = json_request(
        &server.router,
        "POST",
        "/v1/bottles",
        Some(json!({
            "bottle_name": "Lagavulin 16",
            "distillery_id": distillery_id,
            "brand_id": brand_id,
            "age_years": 16,
            "abv": 43.0,
            "volume_cl": 70,
            "bottled_year": 2021,
            "rating": 92,
        })),
        Some(&ikey()),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["bottle_id"].is_string());
    assert_eq!(body["bottle_name"], "Lagavulin 16");
    assert_eq!(body["distillery_id"], distillery_id);
    assert_eq!(body["brand_id"], brand_id);
    assert_eq!(body["age_years"], 16);
    assert_eq!(body["rating"], 92);
}

#[tokio::test]
async fn test_create_bottle_requires_existing_distillery() {
    let server = TestServer::new().await;

    let (status, _) = json_request(
        &server.router,
        "POST",
        "/v1/bottles",
        Some(json!({
            "bottle_name": "Mystery Dram",
            "distillery_id": Uuid::new_v4().to_string(),
        })),
        Some(&ikey()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_bottle_requires_existing_brand() {
    let (server, distillery_id) = server_with_distillery().await;

    let (status, _) = json_request(
        &server.router,
        "POST",
        "/v1/bottles",
        Some(json!({
            "bottle_name": "Lagavulin 16",
            "distillery_id": distillery_id,
            "brand_id": Uuid::new_v4().to_string(),
        })),
        Some(&ikey()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_bottle_validates_measurements() {
    let (server, distillery_id) = server_with_distillery().await;

    let cases = [
        json!({ "abv": 101.5 }),
        json!({ "abv": -1.0 }),
        json!({ "rating": 101 }),
        json!({ "age_years": -3 }),
    ];
    for extra in cases {
        let mut body = json!({
            "bottle_name": "Bad Bottle",
            "distillery_id": distillery_id,
        });
        body.as_object_mut()
            .unwrap()
            .extend(extra.as_object().unwrap().clone());

        let (status, _) = json_request(
            &server.router,
            "POST",
            "/v1/bottles",
            Some(body),
            Some(&ikey()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {extra} accepted");
    }
}

#[tokio::test]
async fn test_update_bottle_fields() {
    let (server, distillery_id) = server_with_distillery().await;

    let (_, created) = json_request(
        &server.router,
        "POST",
        "/v1/bottles",
        Some(json!({
            "bottle_name": "Lagavulin 16",
            "distillery_id": distillery_id,
            "rating": 85,
        })),
        Some(&ikey()),
    )
    .await;
    let bottle_id = created["bottle_id"].as_str().unwrap();

    let (status, body) = json_request(
        &server.router,
        "PUT",
        &format!("/v1/bottles/{bottle_id}"),
        Some(json!({
            "rating": 92,
            "notes": "Peat, iodine, long finish",
        })),
        Some(&ikey()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bottle_name"], "Lagavulin 16");
    assert_eq!(body["rating"], 92);
    assert_eq!(body["notes"], "Peat, iodine, long finish");
}

#[tokio::test]
async fn test_list_bottles_for_distillery() {
    let (server, distillery_id) = server_with_distillery().await;

    for name in ["Lagavulin 16", "Lagavulin 8"] {
        json_request(
            &server.router,
            "POST",
            "/v1/bottles",
            Some(json!({
                "bottle_name": name,
                "distillery_id": distillery_id,
            })),
            Some(&ikey()),
        )
        .await;
    }

    let (status, body) = json_request(
        &server.router,
        "GET",
        &format!("/v1/distilleries/{distillery_id}/bottles"),
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["bottle_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Lagavulin 16", "Lagavulin 8"]);

    let (status, _) = json_request(
        &server.router,
        "GET",
        &format!("/v1/distilleries/{}/bottles", Uuid::new_v4()),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_distillery_cascades_to_bottles() {
    let (server, distillery_id) = server_with_distillery().await;

    let (_, created) = json_request(
        &server.router,
        "POST",
        "/v1/bottles",
        Some(json!({
            "bottle_name": "Lagavulin 16",
            "distillery_id": distillery_id,
        })),
        Some(&ikey()),
    )
    .await;
    let bottle_id = created["bottle_id"].as_str().unwrap();

    let (status, _) = json_request(
        &server.router,
        "DELETE",
        &format!("/v1/distilleries/{distillery_id}"),
        None,
        Some(&ikey()),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = json_request(
        &server.router,
        "GET",
        &format!("/v1/bottles/{bottle_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_bottle() {
    let (server, distillery_id) = server_with_distillery().await;

    let (_, created) = json_request(
        &server.router,
        "POST",
        "/v1/bottles",
        Some(json!({
            "bottle_name": "Lagavulin 16",
            "distillery_id": distillery_id,
        })),
        Some(&ikey()),
    )
    .await;
    let bottle_id = created["bottle_id"].as_str().unwrap();

    let (status, _) = json_request(
        &server.router,
        "DELETE",
        &format!("/v1/bottles/{bottle_id}"),
        None,
        Some(&ikey()),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = json_request(
        &server.router,
        "GET",
        &format!("/v1/bottles/{bottle_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
