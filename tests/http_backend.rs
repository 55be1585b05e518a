mod common;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use common::test_config;
use reqwest::Client;
use reservas::components::notifications::source::{HttpNotificationSource, NotificationSource};
use reservas::components::reservation_calendar::source::{HttpReservationSource, ReservationSource};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Serve `router` on an ephemeral port and return its base URL
async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/", addr)
}

async fn reservations(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    match params.get("space_id").map(String::as_str) {
        Some("3") => Json(json!([{ "id": 30, "start": "2024-03-15", "spaceName": "Sala 3" }])),
        _ => Json(json!([
            { "id": 10, "start": "2024-03-15", "spaceName": "Sala 1" },
            { "id": 11, "start": 42 },
            { "id": 12, "start": "2024-03-16T09:00:00", "extendedProps": { "spaceName": "Sala 2" } },
        ])),
    }
}

async fn notification_list(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let unread_only = params.get("unread_only").map(String::as_str) == Some("true");
    let kind = if unread_only { "warning" } else { "info" };
    Json(json!([{
        "id": 7,
        "type": kind,
        "title": "Reserva pendiente",
        "message": "Sala 1",
        "read": false,
        "created_at": "2024-03-15T08:00:00"
    }]))
}

async fn mark_one(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    if id == "7" {
        (StatusCode::OK, Json(json!({ "success": true })))
    } else {
        (StatusCode::BAD_REQUEST, Json(json!({ "success": false })))
    }
}

fn backend() -> Router {
    Router::new()
        .route("/user/api/reservations", get(reservations))
        .route("/notifications/api/list", get(notification_list))
        .route(
            "/notifications/api/unread_count",
            get(|| async { Json(json!({ "count": 4 })) }),
        )
        .route("/notifications/{id}/read", post(mark_one))
        .route(
            "/notifications/mark_all_read",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "database is down") }),
        )
}

#[tokio::test]
async fn reservations_are_fetched_with_space_filter() {
    let base = spawn_backend(backend()).await;
    let source = HttpReservationSource::from_config(Client::new(), &test_config(&base)).unwrap();

    let all = source.fetch_reservations(None).await.unwrap();
    let ids: Vec<_> = all.iter().filter_map(|r| r.id_string()).collect();
    assert_eq!(ids, ["10", "11", "12"]);

    let filtered = source.fetch_reservations(Some("3")).await.unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id_string().as_deref(), Some("30"));
}

#[tokio::test]
async fn non_success_status_is_a_backend_error() {
    let router = Router::new().route(
        "/user/api/reservations",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = spawn_backend(router).await;
    let source = HttpReservationSource::from_config(Client::new(), &test_config(&base)).unwrap();

    let err = source.fetch_reservations(None).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("500"), "{}", message);
    assert!(message.contains("boom"), "{}", message);
}

#[tokio::test]
async fn notification_endpoints_round_trip() {
    let base = spawn_backend(backend()).await;
    let source = HttpNotificationSource::from_config(Client::new(), &test_config(&base)).unwrap();

    let listed = source.list(true).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, "7");
    assert_eq!(
        listed[0].kind,
        reservas::components::notifications::models::NotificationKind::Warning
    );

    assert_eq!(source.unread_count().await.unwrap(), 4);
    assert!(source.mark_read("7").await.unwrap());
    // A refusal comes back as a 400 with a body, which still decides the outcome
    assert!(!source.mark_read("8").await.unwrap());
    // No parseable body on a failed status is an error
    assert!(source.mark_all_read().await.is_err());
}
