// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Gateway Integration Tests
//!
//! Integration tests for the request gateway:
//!
//! - Bearer attachment and omission
//! - Response classification (JSON, raw text, structured errors)
//! - The bounded renewal protocol and its call-count guarantees
//! - Single-flight renewal under concurrency
//!
//! ## Test Categories
//!
//! - `test_dispatch_*`: attachment and classification
//! - `test_renewal_*`: the renewal protocol
//! - `test_single_flight_*`: concurrency properties

use std::time::Duration;

use aula_gateway::{GatewayError, Method, RawResponse};
use aula_store::CredentialStore;
use aula_tests::prelude::*;

fn ok_json(value: serde_json::Value) -> RawResponse {
    RawResponse::json(200, &value)
}

// =============================================================================
// Dispatch & Classification Tests
// =============================================================================

#[tokio::test]
async fn test_dispatch_success_makes_exactly_one_call() {
    let harness = GatewayHarness::logged_in("acc-1", "ren-1", false).await;
    harness
        .transport
        .respond_json(Method::Get, "/api/grades", 200, serde_json::json!({"grades": []}));

    let payload = harness.gateway.get("/api/grades").await.unwrap();
    assert!(payload.as_json().is_some());

    assert_eq!(harness.transport.dispatch_count(), 1);
    assert_eq!(
        harness.transport.bearers_for(Method::Get, "/api/grades"),
        vec![Some("acc-1".to_string())]
    );
}

#[tokio::test]
async fn test_dispatch_without_credential_omits_header() {
    let harness = GatewayHarness::new();
    harness
        .transport
        .respond_json(Method::Get, "/api/terms", 200, serde_json::json!([]));

    harness.gateway.get("/api/terms").await.unwrap();

    assert_eq!(
        harness.transport.bearers_for(Method::Get, "/api/terms"),
        vec![None]
    );
}

#[tokio::test]
async fn test_dispatch_serializes_json_body() {
    let harness = GatewayHarness::logged_in("acc-1", "ren-1", false).await;
    harness
        .transport
        .respond_json(Method::Post, "/api/enroll", 201, serde_json::json!({"id": 7}));

    harness
        .gateway
        .post("/api/enroll", serde_json::json!({"course": "algebra-2"}))
        .await
        .unwrap();

    let history = harness.transport.history();
    let body = history[0].body.as_ref().unwrap();
    assert_eq!(body.content_type(), "application/json");
    assert_eq!(body.to_wire().unwrap(), r#"{"course":"algebra-2"}"#);
}

#[tokio::test]
async fn test_dispatch_non_json_success_returns_raw_text() {
    let harness = GatewayHarness::logged_in("acc-1", "ren-1", false).await;
    harness.transport.respond(
        Method::Get,
        "/api/schedule.ics",
        RawResponse::new(200, Some("text/calendar".to_string()), "BEGIN:VCALENDAR"),
    );

    let payload = harness.gateway.get("/api/schedule.ics").await.unwrap();
    assert_eq!(payload.as_text(), Some("BEGIN:VCALENDAR"));
}

#[tokio::test]
async fn test_dispatch_api_error_extracts_structured_message() {
    let harness = GatewayHarness::logged_in("acc-1", "ren-1", false).await;
    harness.transport.respond_json(
        Method::Get,
        "/api/grades",
        422,
        serde_json::json!({"message": "term not yet graded"}),
    );

    let err = harness.gateway.get("/api/grades").await.unwrap_err();
    match err {
        GatewayError::Api { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "term not yet graded");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_dispatch_api_error_generic_message_for_unstructured_body() {
    let harness = GatewayHarness::logged_in("acc-1", "ren-1", false).await;
    harness.transport.respond(
        Method::Get,
        "/api/grades",
        RawResponse::new(502, Some("text/html".to_string()), "<h1>Bad Gateway</h1>"),
    );

    let err = harness.gateway.get("/api/grades").await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.user_message(), "HTTP 502");
}

#[tokio::test]
async fn test_dispatch_transport_failure_is_not_retried() {
    let harness = GatewayHarness::logged_in("acc-1", "ren-1", false).await;
    harness.transport.fail_all(true);

    let err = harness.gateway.get("/api/grades").await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(harness.transport.dispatch_count(), 1);
}

// =============================================================================
// Renewal Protocol Tests
// =============================================================================

#[tokio::test]
async fn test_renewal_success_retries_exactly_once() {
    let harness = GatewayHarness::logged_in("stale-acc", "ren-1", false).await;
    harness.transport.reject_stale_bearer(
        Method::Get,
        "/api/grades",
        Some("stale-acc"),
        ok_json(serde_json::json!({"grades": ["A"]})),
    );
    harness
        .transport
        .renewal_ok(harness.renewal_path(), "acc-2", "ren-2");

    let payload = harness.gateway.get("/api/grades").await.unwrap();
    assert!(payload.as_json().is_some());

    // Exactly two calls to the endpoint plus one renewal exchange.
    assert_eq!(harness.transport.count_for(Method::Get, "/api/grades"), 2);
    assert_eq!(
        harness.transport.count_for(Method::Post, harness.renewal_path()),
        1
    );

    // The retry used the fresh credential, and the store was rotated.
    assert_eq!(
        harness.transport.bearers_for(Method::Get, "/api/grades"),
        vec![Some("stale-acc".to_string()), Some("acc-2".to_string())]
    );
    assert_eq!(
        harness.store.access_credential().await.unwrap().as_deref(),
        Some("acc-2")
    );
    assert_eq!(
        harness.store.renewal_credential().await.unwrap().as_deref(),
        Some("ren-2")
    );
}

#[tokio::test]
async fn test_renewal_second_unauthorized_is_terminal() {
    let harness = GatewayHarness::logged_in("stale-acc", "ren-1", false).await;
    // 401 for every bearer, fresh or stale.
    harness.transport.respond_json(
        Method::Get,
        "/api/grades",
        401,
        serde_json::json!({"message": "nope"}),
    );
    harness
        .transport
        .renewal_ok(harness.renewal_path(), "acc-2", "ren-2");

    let err = harness.gateway.get("/api/grades").await.unwrap_err();
    assert!(err.is_unauthenticated());

    // Original + retry, renewal once, and no third attempt.
    assert_eq!(harness.transport.count_for(Method::Get, "/api/grades"), 2);
    assert_eq!(
        harness.transport.count_for(Method::Post, harness.renewal_path()),
        1
    );

    // Store cleared so the next navigation is treated as logged out.
    assert_eq!(harness.store.access_credential().await.unwrap(), None);
    assert_eq!(harness.store.renewal_credential().await.unwrap(), None);
    assert!(!harness.store.is_elevated().await.unwrap());
}

#[tokio::test]
async fn test_renewal_failure_clears_store_and_skips_retry() {
    let harness = GatewayHarness::logged_in("stale-acc", "ren-1", false).await;
    harness.transport.respond_json(
        Method::Get,
        "/api/grades",
        401,
        serde_json::json!({"message": "expired"}),
    );
    harness.transport.renewal_fail(harness.renewal_path(), 403);

    let err = harness.gateway.get("/api/grades").await.unwrap_err();
    assert!(err.is_unauthenticated());

    // The retry never went out.
    assert_eq!(harness.transport.count_for(Method::Get, "/api/grades"), 1);
    assert_eq!(harness.store.access_credential().await.unwrap(), None);
}

#[tokio::test]
async fn test_renewal_without_renewal_credential_is_unauthenticated() {
    let harness = GatewayHarness::new();
    harness
        .store
        .set_access_credential("stale-acc")
        .await
        .unwrap();
    harness.transport.respond_json(
        Method::Get,
        "/api/grades",
        401,
        serde_json::json!({"message": "expired"}),
    );

    let err = harness.gateway.get("/api/grades").await.unwrap_err();
    assert!(err.is_unauthenticated());

    // No exchange was possible.
    assert_eq!(
        harness.transport.count_for(Method::Post, harness.renewal_path()),
        0
    );
}

#[tokio::test]
async fn test_renewal_preserves_elevation_flag() {
    let harness = GatewayHarness::logged_in("stale-acc", "ren-1", true).await;
    harness.transport.reject_stale_bearer(
        Method::Get,
        "/api/admin/settings",
        Some("stale-acc"),
        ok_json(serde_json::json!({})),
    );
    harness
        .transport
        .renewal_ok(harness.renewal_path(), "acc-2", "ren-2");

    harness.gateway.get("/api/admin/settings").await.unwrap();

    assert!(harness.store.is_elevated().await.unwrap());
    assert_eq!(
        harness.store.access_credential().await.unwrap().as_deref(),
        Some("acc-2")
    );
}

// =============================================================================
// Single-Flight Tests
// =============================================================================

#[tokio::test]
async fn test_single_flight_renewal_under_concurrent_401s() {
    let harness = GatewayHarness::logged_in("stale-acc", "ren-1", false).await;
    harness.transport.reject_stale_bearer(
        Method::Get,
        "/api/data",
        Some("stale-acc"),
        ok_json(serde_json::json!({"ok": true})),
    );
    harness
        .transport
        .renewal_ok(harness.renewal_path(), "acc-2", "ren-2");
    // Latency widens the window in which the 401s overlap.
    harness.transport.set_latency(Duration::from_millis(20));

    let tasks: Vec<_> = (0..5)
        .map(|_| {
            let gateway = harness.gateway.clone();
            tokio::spawn(async move { gateway.get("/api/data").await })
        })
        .collect();

    for task in tasks {
        let result = task.await.unwrap();
        assert!(result.is_ok(), "concurrent request failed: {:?}", result);
    }

    // N concurrent 401s, exactly one renewal exchange.
    assert_eq!(
        harness.transport.count_for(Method::Post, harness.renewal_path()),
        1
    );
    assert_eq!(
        harness.store.access_credential().await.unwrap().as_deref(),
        Some("acc-2")
    );
}

#[tokio::test]
async fn test_single_flight_failure_fans_out_to_waiters() {
    let harness = GatewayHarness::logged_in("stale-acc", "ren-1", false).await;
    harness.transport.respond_json(
        Method::Get,
        "/api/data",
        401,
        serde_json::json!({"message": "expired"}),
    );
    harness.transport.renewal_fail(harness.renewal_path(), 500);
    harness.transport.set_latency(Duration::from_millis(20));

    let tasks: Vec<_> = (0..3)
        .map(|_| {
            let gateway = harness.gateway.clone();
            tokio::spawn(async move { gateway.get("/api/data").await })
        })
        .collect();

    for task in tasks {
        let err = task.await.unwrap().unwrap_err();
        assert!(err.is_unauthenticated());
    }

    // One failed exchange; the waiters observed the cleared store
    // instead of issuing their own.
    assert_eq!(
        harness.transport.count_for(Method::Post, harness.renewal_path()),
        1
    );
    assert_eq!(harness.store.access_credential().await.unwrap(), None);
}
