//! HTTP surface tests, driven through the router without a socket.
#![cfg(feature = "http")]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use schedule_kit::http::router;
use schedule_kit::repository::JsonFileRepository;
use schedule_kit::ScheduleService;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

fn app() -> (TempDir, Router) {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let service = ScheduleService::new(JsonFileRepository::new(
        dir.path().join("data").join("schedule.json"),
    ));
    (dir, router(service))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Router should not fail");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, value)
}

#[tokio::test]
async fn test_root_and_health() {
    let (_dir, app) = app();

    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Schedule backend is running");

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_crud_roundtrip() {
    let (_dir, app) = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/schedule",
        Some(json!({
            "title": "Heat pump install",
            "customerId": "c1",
            "customerName": "Dana",
            "startTime": "2025-03-01T10:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let created = body["appointment"].clone();
    let id = created["id"].as_str().expect("id is a string").to_string();
    assert_eq!(created["endTime"], "2025-03-01T11:00:00Z");
    assert_eq!(created["status"], "CONFIRMED");

    let (status, body) = send(&app, Method::GET, &format!("/api/schedule/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appointment"], created);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/schedule/{}", id),
        Some(json!({ "title": "", "status": "COMPLETED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appointment"]["title"], "Heat pump install");
    assert_eq!(body["appointment"]["status"], "COMPLETED");
    assert!(body["appointment"]["updatedAt"].is_string());

    let (status, body) =
        send(&app, Method::DELETE, &format!("/api/schedule/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["message"],
        format!("Appointment {} deleted successfully", id)
    );

    let (status, body) = send(&app, Method::GET, &format!("/api/schedule/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], true);
    assert_eq!(body["message"], format!("Appointment {} not found", id));
}

#[tokio::test]
async fn test_list_with_query_filters() {
    let (_dir, app) = app();

    for (customer, start) in [
        ("c1", "2025-03-01T10:00:00Z"),
        ("c2", "2025-03-02T10:00:00Z"),
        ("c1", "2025-03-05T10:00:00Z"),
    ] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/schedule",
            Some(json!({ "customerId": customer, "startTime": start })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, Method::GET, "/api/schedule", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appointments"].as_array().map(Vec::len), Some(3));

    let (_, body) = send(&app, Method::GET, "/api/schedule?customerId=c1", None).await;
    let starts: Vec<&str> = body["appointments"]
        .as_array()
        .expect("appointments array")
        .iter()
        .filter_map(|a| a["startTime"].as_str())
        .collect();
    assert_eq!(starts, vec!["2025-03-01T10:00:00Z", "2025-03-05T10:00:00Z"]);

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/schedule?startDate=2025-03-02&endDate=2025-03-03&customerId=",
        None,
    )
    .await;
    let customers: Vec<&str> = body["appointments"]
        .as_array()
        .expect("appointments array")
        .iter()
        .filter_map(|a| a["customerId"].as_str())
        .collect();
    assert_eq!(customers, vec!["c2"]);
}

#[tokio::test]
async fn test_update_and_delete_unknown_id() {
    let (_dir, app) = app();

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/schedule/ghost",
        Some(json!({ "title": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], true);

    let (status, _) = send(&app, Method::DELETE, "/api/schedule/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_payload_is_bad_request() {
    let (_dir, app) = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/schedule",
        Some(json!({ "title": 42 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn test_corrupt_store_is_server_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("schedule.json");
    std::fs::write(&path, "[[[").expect("Failed to seed store");
    let app = router(ScheduleService::new(JsonFileRepository::new(&path)));

    let (status, body) = send(&app, Method::GET, "/api/schedule", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"]
        .as_str()
        .expect("message is a string")
        .starts_with("Store corrupt"));
}
