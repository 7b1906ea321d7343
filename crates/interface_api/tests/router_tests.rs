//! Router tests against the in-memory claims store

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use domain_claims::{ClaimsServiceConfig, FailPoint, InMemoryClaimsStore, DEFAULT_COLLECTION};
use interface_api::{create_router, AppState};
use test_utils::ClaimFixtures;

fn app_with(store: Arc<InMemoryClaimsStore>) -> Router {
    create_router(AppState::new(store, ClaimsServiceConfig::default()))
}

fn standard_app() -> (Router, Arc<InMemoryClaimsStore>) {
    let store = Arc::new(ClaimFixtures::store(ClaimFixtures::standard()));
    (app_with(store.clone()), store)
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (app, _) = standard_app();
    let (status, body) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_uses_provider_health() {
    let (app, _) = standard_app();
    let (status, body) = get_json(app, "/health/ready").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_list_claims_envelope() {
    let (app, _) = standard_app();
    let (status, body) = get_json(app, "/api/v1/claims?page=1&limit=10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCount"], 25);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 10);
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
    assert_eq!(body["data"][0]["claim"], 100_024);
}

#[tokio::test]
async fn test_list_claims_defaults_and_clamping() {
    let (app, _) = standard_app();
    let (_, body) = get_json(app.clone(), "/api/v1/claims").await;
    assert_eq!(body["limit"], 25);
    assert_eq!(body["totalPages"], 1);

    let (_, body) = get_json(app, "/api/v1/claims?page=-3&limit=0").await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 1);
    assert_eq!(body["totalPages"], 25);
}

#[tokio::test]
async fn test_list_claims_filters_and_sort() {
    let (app, _) = standard_app();
    let (status, body) = get_json(
        app,
        "/api/v1/claims?hospital%5B%5D=Calvary&cost_from=100&cost_to=500&sort_field=cost&sort_order=asc",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCount"], 2);
    assert_eq!(body["data"][0]["cost"], 100.0);
    assert_eq!(body["data"][1]["cost"], 500.0);
}

#[tokio::test]
async fn test_repeated_status_keys_form_a_set() {
    let (app, _) = standard_app();
    let (_, body) = get_json(app, "/api/v1/claims?status=Paid&status=Assessed&limit=50").await;

    assert_eq!(body["totalCount"], 10);
}

#[tokio::test]
async fn test_search_with_metacharacters() {
    let store = Arc::new(ClaimFixtures::store(ClaimFixtures::with_metacharacters()));
    let (status, body) = get_json(
        app_with(store),
        "/api/v1/claims?search=test.search%2Bweird%3Fchars",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCount"], 1);
    assert_eq!(body["data"][0]["patient"], "test.search+weird?chars");
}

#[tokio::test]
async fn test_options_are_sorted() {
    let (app, _) = standard_app();
    let (status, body) = get_json(app, "/api/v1/claims/options").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hospitals"][0], "Calvary");
    assert_eq!(body["providers"].as_array().unwrap().len(), 3);
    assert_eq!(body["statuses"][0], "Assessed");
}

#[tokio::test]
async fn test_export_json() {
    let (app, store) = standard_app();
    let (status, body) = get_json(app, "/api/v1/claims/export?hospital=Calvary").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 7);

    let pipelines = store
        .handle(DEFAULT_COLLECTION)
        .unwrap()
        .recorded_pipelines()
        .await;
    assert!(pipelines
        .iter()
        .all(|stages| !domain_claims::query::is_paginated(stages)));
}

#[tokio::test]
async fn test_export_csv() {
    let (app, _) = standard_app();
    let (status, headers, body) = get(app, "/api/v1/claims/export?format=csv&status=Paid").await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));

    let text = String::from_utf8(body).unwrap();
    let mut lines = text.lines();
    assert!(lines.next().unwrap().starts_with("claim_type,status,"));
    assert_eq!(lines.count(), 5);
}

#[tokio::test]
async fn test_export_csv_empty_still_has_header() {
    let store = Arc::new(InMemoryClaimsStore::new());
    let (status, _, body) = get(app_with(store), "/api/v1/claims/export?format=csv").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap().lines().count(), 1);
}

#[tokio::test]
async fn test_export_unknown_format_is_bad_request() {
    let (app, _) = standard_app();
    let (status, body) = get_json(app, "/api/v1/claims/export?format=pdf").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_storage_failure_is_500_without_partial_body() {
    let (app, store) = standard_app();
    store
        .handle(DEFAULT_COLLECTION)
        .unwrap()
        .fail_on(FailPoint::Count)
        .await;

    let (status, body) = get_json(app, "/api/v1/claims").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "database_error");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_request_id_is_set_and_propagated() {
    let (app, _) = standard_app();
    let (_, headers, _) = get(app.clone(), "/health").await;
    assert!(headers.contains_key("x-request-id"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "abc-123");
}
