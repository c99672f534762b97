// ABOUTME: Router-level tests for webhook verification and event delivery
// ABOUTME: Exercises the full axum router with oneshot requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Stridesync Project

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{raw_activity, test_connection, test_resources, StubStrava, TEST_ATHLETE_ID};
use serde_json::{json, Value};
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

#[tokio::test]
async fn verification_echoes_challenge_for_matching_token() {
    let resources = test_resources(Arc::new(StubStrava::default())).await;
    let app = routes::router(resources);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/webhook/strava?hub.mode=subscribe&hub.challenge=abc123&hub.verify_token=test_verify_token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["hub.challenge"], "abc123");
}

#[tokio::test]
async fn verification_rejects_wrong_token() {
    let resources = test_resources(Arc::new(StubStrava::default())).await;
    let app = routes::router(resources);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/webhook/strava?hub.mode=subscribe&hub.challenge=abc123&hub.verify_token=wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn event_for_unknown_athlete_acknowledges_without_syncing() {
    let resources = test_resources(Arc::new(StubStrava::default())).await;
    let database = resources.database.clone();
    let app = routes::router(resources);

    let event = json!({
        "object_type": "activity",
        "object_id": 900,
        "aspect_type": "create",
        "owner_id": 123456,
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook/strava")
                .header("content-type", "application/json")
                .body(Body::from(event.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    // Delivery contract: acknowledge no matter what happened internally.
    assert_eq!(response.status(), StatusCode::OK);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activities")
        .fetch_one(database.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn event_for_connected_athlete_syncs_the_activity() {
    let stub = Arc::new(StubStrava::with_activities(vec![raw_activity(
        900, "Run", "webhook run",
    )]));
    let resources = test_resources(stub).await;
    let database = resources.database.clone();

    let user_id = Uuid::new_v4();
    database
        .upsert_connection(&test_connection(user_id))
        .await
        .unwrap();

    let app = routes::router(resources);

    let event = json!({
        "object_type": "activity",
        "object_id": 900,
        "aspect_type": "create",
        "owner_id": TEST_ATHLETE_ID,
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook/strava")
                .header("content-type", "application/json")
                .body(Body::from(event.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let activities = database.list_activities(user_id, 10).await.unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].external_id, Some(900));
}

#[tokio::test]
async fn undecodable_event_body_is_still_acknowledged() {
    let resources = test_resources(Arc::new(StubStrava::default())).await;
    let database = resources.database.clone();
    let app = routes::router(resources);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook/strava")
                .header("content-type", "application/json")
                .body(Body::from("not json at all {"))
                .unwrap(),
        )
        .await
        .unwrap();

    // Delivery contract holds even when the body cannot be parsed.
    assert_eq!(response.status(), StatusCode::OK);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activities")
        .fetch_one(database.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn non_create_events_are_ignored() {
    let stub = Arc::new(StubStrava::with_activities(vec![raw_activity(
        901, "Run", "updated run",
    )]));
    let resources = test_resources(stub).await;
    let database = resources.database.clone();

    let user_id = Uuid::new_v4();
    database
        .upsert_connection(&test_connection(user_id))
        .await
        .unwrap();

    let app = routes::router(resources);

    let event = json!({
        "object_type": "activity",
        "object_id": 901,
        "aspect_type": "update",
        "owner_id": TEST_ATHLETE_ID,
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook/strava")
                .header("content-type", "application/json")
                .body(Body::from(event.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let activities = database.list_activities(user_id, 10).await.unwrap();
    assert!(activities.is_empty());
}
