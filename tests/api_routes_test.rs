// ABOUTME: Router-level tests for the user-facing API: sync trigger, connection, activities
// ABOUTME: Exercises the full axum router with oneshot requests against in-memory state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{raw_activity, test_connection, test_resources, StubStrava};
use serde_json::Value;
use std::sync::Arc;
use stridesync::routes;
use tower::ServiceExt;
use uuid::Uuid;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let resources = test_resources(Arc::new(StubStrava::default())).await;
    let app = routes::router(resources);

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn manual_sync_reports_disconnected_for_unknown_user() {
    let resources = test_resources(Arc::new(StubStrava::default())).await;
    let app = routes::router(resources);

    let response = app
        .oneshot(post(&format!("/api/users/{}/sync", Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "disconnected");
}

#[tokio::test]
async fn manual_sync_reports_new_activity_count() {
    let stub = Arc::new(StubStrava::with_activities(vec![
        raw_activity(1, "Run", "one"),
        raw_activity(2, "Ride", "two"),
    ]));
    let resources = test_resources(stub).await;
    let database = resources.database.clone();

    let user_id = Uuid::new_v4();
    database
        .upsert_connection(&test_connection(user_id))
        .await
        .unwrap();

    let app = routes::router(resources);

    let response = app
        .oneshot(post(&format!("/api/users/{user_id}/sync")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "completed");
    assert_eq!(body["new_activities"], 2);
}

#[tokio::test]
async fn connection_status_reflects_stored_state() {
    let resources = test_resources(Arc::new(StubStrava::default())).await;
    let database = resources.database.clone();
    let user_id = Uuid::new_v4();
    let app = routes::router(resources);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/users/{user_id}/connection")))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["connected"], false);

    database
        .upsert_connection(&test_connection(user_id))
        .await
        .unwrap();

    let response = app
        .oneshot(get(&format!("/api/users/{user_id}/connection")))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["connected"], true);
    assert_eq!(body["athlete_id"], common::TEST_ATHLETE_ID);
    assert_eq!(body["athlete_name"], "Test Athlete");
    assert_eq!(body["all_time_totals"]["all_run_totals"]["count"], 0);
}

#[tokio::test]
async fn disconnect_deletes_the_connection() {
    let resources = test_resources(Arc::new(StubStrava::default())).await;
    let database = resources.database.clone();
    let user_id = Uuid::new_v4();
    database
        .upsert_connection(&test_connection(user_id))
        .await
        .unwrap();

    let app = routes::router(resources);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/users/{user_id}/connection"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(database.get_connection(user_id).await.unwrap().is_none());
}

#[tokio::test]
async fn disconnect_without_connection_is_not_found() {
    let resources = test_resources(Arc::new(StubStrava::default())).await;
    let app = routes::router(resources);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/users/{}/connection", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn activity_listing_and_summary_roundtrip() {
    let stub = Arc::new(StubStrava::with_activities(vec![
        raw_activity(1, "Run", "one"),
        raw_activity(2, "Swim", "two"),
    ]));
    let resources = test_resources(stub).await;
    let database = resources.database.clone();

    let user_id = Uuid::new_v4();
    database
        .upsert_connection(&test_connection(user_id))
        .await
        .unwrap();

    let app = routes::router(resources);

    app.clone()
        .oneshot(post(&format!("/api/users/{user_id}/sync")))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get(&format!("/api/users/{user_id}/activities?limit=10")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let response = app
        .oneshot(get(&format!("/api/users/{user_id}/points/summary")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total_activities"], 2);
    assert!(body["total_points"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn activity_listing_rejects_out_of_range_limit() {
    let resources = test_resources(Arc::new(StubStrava::default())).await;
    let app = routes::router(resources);

    let response = app
        .oneshot(get(&format!(
            "/api/users/{}/activities?limit=0",
            Uuid::new_v4()
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn auth_url_issues_state_and_callback_connects() {
    let resources = test_resources(Arc::new(StubStrava::default())).await;
    let database = resources.database.clone();
    let user_id = Uuid::new_v4();
    let app = routes::router(resources);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/strava/auth-url?user_id={user_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let state = body["state"].as_str().unwrap().to_owned();
    assert!(body["authorization_url"]
        .as_str()
        .unwrap()
        .contains(&state));

    let response = app
        .oneshot(get(&format!(
            "/api/strava/callback?code=test_code&state={state}"
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "connected");

    let connection = database.get_connection(user_id).await.unwrap().unwrap();
    assert_eq!(connection.access_token, "exchanged_access");
}

#[tokio::test]
async fn callback_rejects_unknown_state() {
    let resources = test_resources(Arc::new(StubStrava::default())).await;
    let app = routes::router(resources);

    let response = app
        .oneshot(get("/api/strava/callback?code=test_code&state=bogus"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
