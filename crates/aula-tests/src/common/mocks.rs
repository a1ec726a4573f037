// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! Mock transport for testing the gateway in isolation.
//!
//! ## Design Principles
//!
//! - Configurable behavior per method + path
//! - Recording of interactions for verification
//! - Thread-safe for concurrent testing
//! - Easy to set up error injection

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use aula_core::error::GatewayError;
use aula_gateway::{ApiTransport, Method, RawResponse, TransportRequest};

// =============================================================================
// Behaviors
// =============================================================================

/// What the mock does when a route is hit.
#[derive(Debug)]
enum Behavior {
    /// Always return a clone of this response.
    Always(RawResponse),
    /// Return queued responses in order; 404 when drained.
    Queue(VecDeque<RawResponse>),
    /// Return 401 when the request carries the given (stale) bearer,
    /// otherwise return the ok response. Drives renewal scenarios.
    RejectStaleBearer {
        stale: Option<String>,
        ok: RawResponse,
    },
}

// =============================================================================
// Mock Api Transport
// =============================================================================

/// A configurable mock transport for gateway tests.
#[derive(Debug, Default)]
pub struct MockApiTransport {
    /// Scripted behaviors keyed by `"METHOD /path"`.
    routes: Mutex<HashMap<String, Behavior>>,

    /// Every request seen, in order.
    history: Mutex<Vec<TransportRequest>>,

    /// Total dispatch count.
    dispatch_count: AtomicU64,

    /// Force the next dispatch to fail at the transport level.
    fail_next: AtomicBool,

    /// Force all dispatches to fail at the transport level.
    fail_all: AtomicBool,

    /// Simulated network latency, in milliseconds.
    latency_ms: AtomicU64,
}

impl MockApiTransport {
    /// Create a new mock with no scripted routes (everything 404s).
    pub fn new() -> Self {
        Self::default()
    }

    fn key(method: Method, path: &str) -> String {
        format!("{} {}", method.as_str(), path)
    }

    /// Script a fixed response for a route.
    pub fn respond(&self, method: Method, path: &str, response: RawResponse) {
        self.routes
            .lock()
            .unwrap()
            .insert(Self::key(method, path), Behavior::Always(response));
    }

    /// Script a fixed JSON response for a route.
    pub fn respond_json(&self, method: Method, path: &str, status: u16, value: serde_json::Value) {
        self.respond(method, path, RawResponse::json(status, &value));
    }

    /// Queue one response for a route (in addition to any already
    /// queued). Queued responses are consumed in order.
    pub fn enqueue(&self, method: Method, path: &str, response: RawResponse) {
        let mut routes = self.routes.lock().unwrap();
        match routes.entry(Self::key(method, path)).or_insert_with(|| {
            Behavior::Queue(VecDeque::new())
        }) {
            Behavior::Queue(queue) => queue.push_back(response),
            other => *other = Behavior::Queue(VecDeque::from([response])),
        }
    }

    /// Script a route to 401 requests carrying the given stale bearer
    /// and succeed for any other credential.
    pub fn reject_stale_bearer(
        &self,
        method: Method,
        path: &str,
        stale: Option<&str>,
        ok: RawResponse,
    ) {
        self.routes.lock().unwrap().insert(
            Self::key(method, path),
            Behavior::RejectStaleBearer {
                stale: stale.map(String::from),
                ok,
            },
        );
    }

    /// Script the renewal endpoint to return a fresh pair.
    pub fn renewal_ok(&self, renewal_path: &str, access: &str, renewal: &str) {
        self.respond_json(
            Method::Post,
            renewal_path,
            200,
            serde_json::json!({
                "accessCredential": access,
                "renewalCredential": renewal,
            }),
        );
    }

    /// Script the renewal endpoint to fail with the given status.
    pub fn renewal_fail(&self, renewal_path: &str, status: u16) {
        self.respond_json(
            Method::Post,
            renewal_path,
            status,
            serde_json::json!({"message": "renewal rejected"}),
        );
    }

    /// Force the next dispatch to fail at the transport level.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Force all dispatches to fail at the transport level.
    pub fn fail_all(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    /// Set a simulated per-request latency.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    /// Total number of dispatches, renewal calls included.
    pub fn dispatch_count(&self) -> u64 {
        self.dispatch_count.load(Ordering::SeqCst)
    }

    /// Number of dispatches to one route.
    pub fn count_for(&self, method: Method, path: &str) -> u64 {
        self.history
            .lock()
            .unwrap()
            .iter()
            .filter(|req| req.method == method && path_of(&req.url) == path)
            .count() as u64
    }

    /// Every request seen so far.
    pub fn history(&self) -> Vec<TransportRequest> {
        self.history.lock().unwrap().clone()
    }

    /// Bearer credentials attached to dispatches of one route, in order.
    pub fn bearers_for(&self, method: Method, path: &str) -> Vec<Option<String>> {
        self.history
            .lock()
            .unwrap()
            .iter()
            .filter(|req| req.method == method && path_of(&req.url) == path)
            .map(|req| req.bearer.clone())
            .collect()
    }

    /// Clear history and counters, keeping scripted routes.
    pub fn reset(&self) {
        self.history.lock().unwrap().clear();
        self.dispatch_count.store(0, Ordering::SeqCst);
        self.fail_next.store(false, Ordering::SeqCst);
        self.fail_all.store(false, Ordering::SeqCst);
    }
}

/// Strips scheme and authority from a URL, leaving the path.
fn path_of(url: &str) -> &str {
    url.find("://")
        .and_then(|scheme_end| {
            let rest = &url[scheme_end + 3..];
            rest.find('/').map(|slash| &rest[slash..])
        })
        .unwrap_or(url)
}

#[async_trait]
impl ApiTransport for MockApiTransport {
    async fn dispatch(&self, request: TransportRequest) -> Result<RawResponse, GatewayError> {
        self.dispatch_count.fetch_add(1, Ordering::SeqCst);
        self.history.lock().unwrap().push(request.clone());

        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        if self.fail_all.load(Ordering::SeqCst) || self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(GatewayError::transport("mock transport failure"));
        }

        let key = format!("{} {}", request.method.as_str(), path_of(&request.url));
        let mut routes = self.routes.lock().unwrap();

        let response = match routes.get_mut(&key) {
            Some(Behavior::Always(response)) => response.clone(),
            Some(Behavior::Queue(queue)) => queue
                .pop_front()
                .unwrap_or_else(|| RawResponse::new(404, None, "")),
            Some(Behavior::RejectStaleBearer { stale, ok }) => {
                if request.bearer == *stale {
                    RawResponse::json(401, &serde_json::json!({"message": "token expired"}))
                } else {
                    ok.clone()
                }
            }
            None => RawResponse::new(404, None, ""),
        };

        Ok(response)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_extraction() {
        assert_eq!(path_of("http://localhost:8080/api/x"), "/api/x");
        assert_eq!(path_of("https://portal.school.example/auth/refresh"), "/auth/refresh");
        assert_eq!(path_of("/already/a/path"), "/already/a/path");
    }

    #[tokio::test]
    async fn test_scripted_and_unmatched_routes() {
        let mock = MockApiTransport::new();
        mock.respond_json(Method::Get, "/api/ok", 200, serde_json::json!({"ok": true}));

        let hit = mock
            .dispatch(TransportRequest::new(Method::Get, "http://x/api/ok"))
            .await
            .unwrap();
        assert_eq!(hit.status, 200);

        let miss = mock
            .dispatch(TransportRequest::new(Method::Get, "http://x/api/other"))
            .await
            .unwrap();
        assert_eq!(miss.status, 404);

        assert_eq!(mock.dispatch_count(), 2);
        assert_eq!(mock.count_for(Method::Get, "/api/ok"), 1);
    }

    #[tokio::test]
    async fn test_queue_drains_in_order() {
        let mock = MockApiTransport::new();
        mock.enqueue(Method::Get, "/api/seq", RawResponse::new(500, None, ""));
        mock.enqueue(Method::Get, "/api/seq", RawResponse::new(200, None, ""));

        let req = || TransportRequest::new(Method::Get, "http://x/api/seq");
        assert_eq!(mock.dispatch(req()).await.unwrap().status, 500);
        assert_eq!(mock.dispatch(req()).await.unwrap().status, 200);
        assert_eq!(mock.dispatch(req()).await.unwrap().status, 404);
    }

    #[tokio::test]
    async fn test_stale_bearer_gate() {
        let mock = MockApiTransport::new();
        mock.reject_stale_bearer(
            Method::Get,
            "/api/data",
            Some("old"),
            RawResponse::json(200, &serde_json::json!({"ok": true})),
        );

        let stale = TransportRequest::new(Method::Get, "http://x/api/data").with_bearer("old");
        assert_eq!(mock.dispatch(stale).await.unwrap().status, 401);

        let fresh = TransportRequest::new(Method::Get, "http://x/api/data").with_bearer("new");
        assert_eq!(mock.dispatch(fresh).await.unwrap().status, 200);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let mock = MockApiTransport::new();
        mock.respond_json(Method::Get, "/api/x", 200, serde_json::json!({}));

        mock.fail_next();
        let req = || TransportRequest::new(Method::Get, "http://x/api/x");
        assert!(mock.dispatch(req()).await.is_err());
        assert!(mock.dispatch(req()).await.is_ok());
    }
}
