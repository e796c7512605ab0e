#![cfg(all(feature = "http-server", feature = "local-repo"))]

mod support;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::json;

use support::http::{delete, get, patch, post, send_request, test_app};

fn ada() -> serde_json::Value {
    json!({"first_name": "Ada", "last_name": "Lovelace", "email": "ada@x.com"})
}

#[tokio::test]
async fn test_create_customer_then_list() {
    let (app, _repo) = test_app();

    let created = post(&app, "/customers", ada()).await;
    assert_eq!(created.status, StatusCode::ACCEPTED);
    assert_eq!(created.json(), json!({"message": "Customer Created"}));

    let listed = get(&app, "/customers").await;
    assert_eq!(listed.status, StatusCode::ACCEPTED);
    let customers = listed.json()["customers"].as_array().unwrap().clone();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0]["first_name"], "Ada");
    assert_eq!(customers[0]["last_name"], "Lovelace");
    assert_eq!(customers[0]["email"], "ada@x.com");
    assert_eq!(customers[0]["number_courses_completed"], 0);
    assert!(customers[0]["id"].is_i64());
}

#[tokio::test]
async fn test_list_customers_empty() {
    let (app, _repo) = test_app();

    let listed = get(&app, "/customers").await;
    assert_eq!(listed.status, StatusCode::ACCEPTED);
    assert_eq!(listed.json(), json!({"customers": []}));
}

#[tokio::test]
async fn test_get_customer_by_id() {
    let (app, _repo) = test_app();
    post(&app, "/customers", ada()).await;

    let id = get(&app, "/customers").await.json()["customers"][0]["id"]
        .as_i64()
        .unwrap();
    let fetched = get(&app, &format!("/customer/{}", id)).await;

    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json()["customer"]["email"], "ada@x.com");
}

#[tokio::test]
async fn test_get_missing_customer_omits_key() {
    let (app, _repo) = test_app();

    let fetched = get(&app, "/customer/4242").await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json(), json!({}));
}

#[tokio::test]
async fn test_update_customer_then_refetch() {
    let (app, _repo) = test_app();
    post(&app, "/customers", ada()).await;
    let id = get(&app, "/customers").await.json()["customers"][0]["id"]
        .as_i64()
        .unwrap();

    let updated = patch(
        &app,
        &format!("/customer/{}", id),
        json!({
            "first_name": "Ada",
            "last_name": "King",
            "email": "ada@x.com",
            "number_courses_completed": 5
        }),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(
        updated.json(),
        json!({"message": format!("updated customer {}", id)})
    );

    let customer = get(&app, &format!("/customer/{}", id)).await.json()["customer"].clone();
    assert_eq!(customer["number_courses_completed"], 5);
    assert_eq!(customer["last_name"], "King");
}

#[tokio::test]
async fn test_update_missing_customer_succeeds() {
    let (app, repo) = test_app();

    let updated = patch(
        &app,
        "/customer/77",
        json!({
            "first_name": "Grace",
            "last_name": "Hopper",
            "email": "grace@x.com",
            "number_courses_completed": 1
        }),
    )
    .await;

    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.json()["message"], "updated customer 77");
    assert_eq!(repo.customer_count(), 0);
}

#[tokio::test]
async fn test_update_requires_every_field() {
    let (app, _repo) = test_app();
    post(&app, "/customers", ada()).await;

    let updated = patch(&app, "/customer/1", json!({"first_name": "Ada"})).await;
    assert_eq!(updated.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(updated.json()["message"].is_string());
}

#[tokio::test]
async fn test_delete_customer_twice() {
    let (app, repo) = test_app();
    post(&app, "/customers", ada()).await;

    let first = delete(&app, "/customer/1", None).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.json(), json!({"message": "deleted"}));
    assert_eq!(repo.customer_count(), 0);

    let second = delete(&app, "/customer/1", None).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.json(), json!({"message": "deleted"}));
}

#[tokio::test]
async fn test_create_customer_rejects_blank_name() {
    let (app, repo) = test_app();

    let created = post(
        &app,
        "/customers",
        json!({"first_name": " ", "last_name": "Lovelace", "email": "ada@x.com"}),
    )
    .await;

    assert_eq!(created.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(created.json(), json!({"message": "first_name is required"}));
    assert_eq!(repo.customer_count(), 0);
}

#[tokio::test]
async fn test_create_customer_missing_field_is_500() {
    let (app, repo) = test_app();

    let created = post(&app, "/customers", json!({"first_name": "Ada"})).await;
    assert_eq!(created.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(created.json()["message"].is_string());
    assert_eq!(repo.customer_count(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_500() {
    let (app, _repo) = test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/customers")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = send_request(&app, request).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.json()["message"].is_string());
}

#[tokio::test]
async fn test_non_numeric_customer_id_is_500() {
    let (app, _repo) = test_app();

    let fetched = get(&app, "/customer/abc").await;
    assert_eq!(fetched.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(fetched.json()["message"].is_string());
}

#[tokio::test]
async fn test_storage_failure_is_sanitized_500() {
    let (app, repo) = test_app();
    repo.set_healthy(false);

    let listed = get(&app, "/customers").await;
    assert_eq!(listed.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        listed.json(),
        json!({"message": "Failed to list customers: database unavailable"})
    );
}

#[tokio::test]
async fn test_health_reports_repository_status() {
    let (app, repo) = test_app();

    let healthy = get(&app, "/health").await;
    assert_eq!(healthy.status, StatusCode::OK);
    assert_eq!(
        healthy.json(),
        json!({"status": "ok", "version": "v1", "database": "connected"})
    );

    repo.set_healthy(false);
    let unhealthy = get(&app, "/health").await;
    assert_eq!(unhealthy.json()["database"], "disconnected");
}

#[tokio::test]
async fn test_index_lists_endpoints() {
    let (app, _repo) = test_app();

    let index = get(&app, "/").await;
    assert_eq!(index.status, StatusCode::OK);
    let text = index.text();
    assert!(text.contains("GET    /customers"));
    assert!(text.contains("DELETE /result"));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let (app, _repo) = test_app();

    let request = Request::builder()
        .method(Method::GET)
        .uri("/customers")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = send_request(&app, request).await;

    assert_eq!(
        response.headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _repo) = test_app();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/customer/1")
        .header(header::ORIGIN, "http://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = send_request(&app, request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
    assert!(response
        .headers
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}
