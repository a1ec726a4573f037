// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The API gateway: bearer attachment, response classification, and the
//! bounded renewal protocol.
//!
//! # Renewal Protocol
//!
//! A 401 on a request triggers at most one renewal exchange and at most
//! one retry of the original request:
//!
//! ```text
//! original ──401──▶ renew (single-flight) ──ok──▶ retry ──ok──▶ result
//!                        │                          │
//!                      fail                        401
//!                        │                          │
//!                        ▼                          ▼
//!                clear store, Unauthenticated (terminal)
//! ```
//!
//! The renewal exchange is single-flight per gateway: concurrent 401s
//! queue on one mutex, and each caller re-reads the store after
//! acquiring it. If the access credential changed while waiting, another
//! caller already renewed and the fresh credential is reused without a
//! second exchange. The store is always updated strictly before the
//! retry is dispatched.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use aula_core::error::GatewayError;
use aula_core::types::CredentialPair;
use aula_store::CredentialStore;

use crate::config::GatewayConfig;
use crate::transport::{ApiTransport, RawResponse, TransportRequest};
use crate::types::{Method, Payload, RenewalRequest, RequestBody};

// =============================================================================
// ApiGateway
// =============================================================================

/// Authenticated request gateway.
///
/// # Thread Safety
///
/// `Send + Sync`; one gateway is shared by all concurrent requests of a
/// client session. Independent requests proceed in parallel and only
/// serialize on the renewal gate.
#[derive(Debug)]
pub struct ApiGateway<T: ApiTransport> {
    /// The underlying transport.
    transport: Arc<T>,
    /// Credential store for this client session.
    store: Arc<dyn CredentialStore>,
    /// Gateway configuration.
    config: GatewayConfig,
    /// Single-flight renewal gate.
    renewal_gate: Mutex<()>,
    /// Gateway statistics.
    stats: GatewayStats,
}

impl<T: ApiTransport> ApiGateway<T> {
    /// Creates a gateway over the given transport and store.
    pub fn new(transport: T, store: Arc<dyn CredentialStore>, config: GatewayConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            store,
            config,
            renewal_gate: Mutex::new(()),
            stats: GatewayStats::new(),
        }
    }

    /// Returns the gateway configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Returns the gateway statistics.
    pub fn stats(&self) -> &GatewayStats {
        &self.stats
    }

    // =========================================================================
    // Request Execution
    // =========================================================================

    /// Executes a request against the portal API.
    ///
    /// Attaches the stored access credential when one exists, classifies
    /// the response, and transparently renews the credential on a 401
    /// (see the module docs for the bounded protocol).
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<Payload, GatewayError> {
        let request_id = Uuid::now_v7();
        let token = self.store.access_credential().await?;

        self.stats.record_request();
        let response = self
            .dispatch(request_id, method, path, &body, token.as_deref())
            .await?;

        if !response.is_unauthorized() {
            return self.classify(response);
        }

        self.stats.record_unauthorized();
        debug!(%request_id, path, "unauthorized response; entering renewal");

        let fresh = self.renew(token.as_deref()).await?;

        self.stats.record_retry();
        let response = self
            .dispatch(request_id, method, path, &body, Some(&fresh))
            .await?;

        if response.is_unauthorized() {
            // Terminal: the renewed credential was rejected too.
            self.stats.record_unauthorized();
            warn!(%request_id, path, "retried request still unauthorized; clearing session");
            self.clear_session().await;
            return Err(GatewayError::Unauthenticated);
        }

        self.classify(response)
    }

    /// Executes a request and decodes the JSON payload into a typed
    /// value.
    pub async fn execute_as<R: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<R, GatewayError> {
        self.execute(method, path, body).await?.decode()
    }

    /// GET convenience.
    pub async fn get(&self, path: &str) -> Result<Payload, GatewayError> {
        self.execute(Method::Get, path, None).await
    }

    /// POST convenience with a JSON body.
    pub async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<Payload, GatewayError> {
        self.execute(Method::Post, path, Some(RequestBody::Json(body)))
            .await
    }

    /// PUT convenience with a JSON body.
    pub async fn put(&self, path: &str, body: serde_json::Value) -> Result<Payload, GatewayError> {
        self.execute(Method::Put, path, Some(RequestBody::Json(body)))
            .await
    }

    /// PATCH convenience with a JSON body.
    pub async fn patch(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<Payload, GatewayError> {
        self.execute(Method::Patch, path, Some(RequestBody::Json(body)))
            .await
    }

    /// DELETE convenience.
    pub async fn delete(&self, path: &str) -> Result<Payload, GatewayError> {
        self.execute(Method::Delete, path, None).await
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Dispatches one attempt of a request.
    async fn dispatch(
        &self,
        request_id: Uuid,
        method: Method,
        path: &str,
        body: &Option<RequestBody>,
        bearer: Option<&str>,
    ) -> Result<RawResponse, GatewayError> {
        let mut request = TransportRequest::new(method, self.config.url_for(path));
        request.request_id = request_id;
        request.body = body.clone();
        request.bearer = bearer.map(String::from);

        match self.transport.dispatch(request).await {
            Ok(response) => Ok(response),
            Err(e) => {
                if e.is_transport() {
                    self.stats.record_transport_error();
                }
                Err(e)
            }
        }
    }

    /// Classifies a non-401 response.
    fn classify(&self, response: RawResponse) -> Result<Payload, GatewayError> {
        if !response.is_success() {
            self.stats.record_api_error();
            return Err(GatewayError::api(
                response.status,
                extract_error_message(&response),
            ));
        }

        self.stats.record_success();

        if response.is_json() {
            if response.body.trim().is_empty() {
                return Ok(Payload::Json(serde_json::Value::Null));
            }
            serde_json::from_str(&response.body)
                .map(Payload::Json)
                .map_err(|e| GatewayError::invalid_response(format!("decode JSON body: {}", e)))
        } else {
            Ok(Payload::Text(response.body))
        }
    }

    /// Single-flight renewal. Returns the access credential the retry
    /// must use.
    ///
    /// `stale` is the credential (if any) that was attached to the
    /// rejected request; it is how a queued caller detects that another
    /// caller already finished renewing.
    async fn renew(&self, stale: Option<&str>) -> Result<String, GatewayError> {
        let _guard = self.renewal_gate.lock().await;

        // A renewal that completed while we waited for the gate already
        // replaced the credential; reuse it instead of exchanging again.
        if let Some(current) = self.store.access_credential().await? {
            if stale != Some(current.as_str()) {
                debug!("renewal already completed by a concurrent request");
                return Ok(current);
            }
        }

        let renewal = match self.store.renewal_credential().await? {
            Some(renewal) => renewal,
            None => {
                debug!("no renewal credential stored; clearing session");
                self.clear_session().await;
                return Err(GatewayError::Unauthenticated);
            }
        };

        self.stats.record_renewal_attempt();
        match self.exchange(&renewal).await {
            Ok(pair) => {
                // Preserve the elevation flag across the rotation; the
                // store must be updated before the gate is released so
                // the retry (and every queued caller) sees the new pair.
                let elevated = self.store.is_elevated().await.unwrap_or(false);
                self.store.set_session(&pair, elevated).await?;
                self.stats.record_renewal_success();
                debug!("credential pair renewed");
                Ok(pair.access)
            }
            Err(e) => {
                debug!(error = %e, "renewal exchange failed; clearing session");
                self.clear_session().await;
                Err(GatewayError::Unauthenticated)
            }
        }
    }

    /// Exchanges the renewal credential for a fresh pair.
    async fn exchange(&self, renewal: &str) -> Result<CredentialPair, GatewayError> {
        let body = RequestBody::Json(
            serde_json::to_value(RenewalRequest::new(renewal))
                .map_err(|e| GatewayError::invalid_response(e.to_string()))?,
        );

        let request = TransportRequest::new(Method::Post, self.config.url_for(&self.config.renewal_path))
            .with_body(body);

        let response = self.transport.dispatch(request).await?;

        if !response.is_success() {
            return Err(GatewayError::api(
                response.status,
                extract_error_message(&response),
            ));
        }

        serde_json::from_str(&response.body)
            .map_err(|e| GatewayError::invalid_response(format!("decode renewal response: {}", e)))
    }

    /// Clears the session, downgrading a store failure to a warning:
    /// by this point the caller is getting `Unauthenticated` either way.
    async fn clear_session(&self) {
        if let Err(e) = self.store.clear_all().await {
            warn!(error = %e, "failed to clear credential store");
        }
    }
}

// =============================================================================
// Error Message Extraction
// =============================================================================

/// Pulls a human-readable message out of a structured error body, or
/// falls back to a generic one.
fn extract_error_message(response: &RawResponse) -> String {
    if response.is_json() {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&response.body) {
            for key in ["message", "error"] {
                if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                    if !message.is_empty() {
                        return message.to_string();
                    }
                }
            }
        }
    }
    format!("HTTP {}", response.status)
}

// =============================================================================
// GatewayStats
// =============================================================================

/// Lock-free gateway statistics.
///
/// All counters are cumulative and O(1) to read.
#[derive(Debug, Default)]
pub struct GatewayStats {
    /// Logical requests started.
    requests: AtomicU64,
    /// Successful responses classified.
    successes: AtomicU64,
    /// Structured API errors surfaced.
    api_errors: AtomicU64,
    /// Transport failures surfaced.
    transport_errors: AtomicU64,
    /// 401 responses observed (original and retried attempts).
    unauthorized: AtomicU64,
    /// Renewal exchanges attempted.
    renewals_attempted: AtomicU64,
    /// Renewal exchanges that produced a fresh pair.
    renewals_succeeded: AtomicU64,
    /// Retries dispatched after a renewal.
    retries: AtomicU64,
}

impl GatewayStats {
    /// Creates zeroed statistics.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn record_success(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn record_api_error(&self) {
        self.api_errors.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn record_transport_error(&self) {
        self.transport_errors.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn record_unauthorized(&self) {
        self.unauthorized.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn record_renewal_attempt(&self) {
        self.renewals_attempted.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn record_renewal_success(&self) {
        self.renewals_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of renewal exchanges attempted.
    pub fn renewals_attempted(&self) -> u64 {
        self.renewals_attempted.load(Ordering::Relaxed)
    }

    /// Creates a snapshot of the statistics.
    pub fn snapshot(&self) -> GatewayStatsSnapshot {
        GatewayStatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            api_errors: self.api_errors.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
            unauthorized: self.unauthorized.load(Ordering::Relaxed),
            renewals_attempted: self.renewals_attempted.load(Ordering::Relaxed),
            renewals_succeeded: self.renewals_succeeded.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
        }
    }
}

/// Immutable snapshot of gateway statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayStatsSnapshot {
    /// Logical requests started.
    pub requests: u64,
    /// Successful responses classified.
    pub successes: u64,
    /// Structured API errors surfaced.
    pub api_errors: u64,
    /// Transport failures surfaced.
    pub transport_errors: u64,
    /// 401 responses observed.
    pub unauthorized: u64,
    /// Renewal exchanges attempted.
    pub renewals_attempted: u64,
    /// Renewal exchanges that succeeded.
    pub renewals_succeeded: u64,
    /// Retries dispatched after a renewal.
    pub retries: u64,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use aula_store::MemoryCredentialStore;

    /// Replays scripted outcomes in order and records every request.
    #[derive(Debug, Default)]
    struct ScriptedTransport {
        script: std::sync::Mutex<VecDeque<Result<RawResponse, GatewayError>>>,
        log: std::sync::Mutex<Vec<TransportRequest>>,
    }

    impl ScriptedTransport {
        fn with_script(
            script: impl IntoIterator<Item = Result<RawResponse, GatewayError>>,
        ) -> Self {
            Self {
                script: std::sync::Mutex::new(script.into_iter().collect()),
                log: Default::default(),
            }
        }

        fn requests(&self) -> Vec<TransportRequest> {
            self.log.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl ApiTransport for ScriptedTransport {
        async fn dispatch(&self, request: TransportRequest) -> Result<RawResponse, GatewayError> {
            self.log.lock().unwrap().push(request);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(RawResponse::new(404, None, "")))
        }
    }

    async fn gateway_with(
        transport: ScriptedTransport,
        access: Option<&str>,
        renewal: Option<&str>,
    ) -> ApiGateway<ScriptedTransport> {
        let store: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::new());
        if let Some(access) = access {
            store.set_access_credential(access).await.unwrap();
        }
        if let Some(renewal) = renewal {
            store.set_renewal_credential(renewal).await.unwrap();
        }
        ApiGateway::new(transport, store, GatewayConfig::for_testing())
    }

    fn ok_json(value: serde_json::Value) -> Result<RawResponse, GatewayError> {
        Ok(RawResponse::json(200, &value))
    }

    fn unauthorized() -> Result<RawResponse, GatewayError> {
        Ok(RawResponse::json(401, &serde_json::json!({"message": "expired"})))
    }

    fn pair_response(access: &str, renewal: &str) -> Result<RawResponse, GatewayError> {
        ok_json(serde_json::json!({
            "accessCredential": access,
            "renewalCredential": renewal,
        }))
    }

    #[tokio::test]
    async fn test_success_makes_exactly_one_call() {
        let transport =
            ScriptedTransport::with_script([ok_json(serde_json::json!({"ok": true}))]);
        let gateway = gateway_with(transport, Some("acc"), Some("ren")).await;

        let payload = gateway.get("/api/ping").await.unwrap();
        assert_eq!(payload.as_json().unwrap()["ok"], true);

        let requests = gateway.transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].bearer.as_deref(), Some("acc"));
    }

    #[tokio::test]
    async fn test_no_credential_sends_no_header() {
        let transport = ScriptedTransport::with_script([ok_json(serde_json::json!({}))]);
        let gateway = gateway_with(transport, None, None).await;

        gateway.get("/api/public").await.unwrap();

        let requests = gateway.transport.requests();
        assert_eq!(requests[0].bearer, None);
    }

    #[tokio::test]
    async fn test_renewal_then_retry() {
        let transport = ScriptedTransport::with_script([
            unauthorized(),
            pair_response("acc-2", "ren-2"),
            ok_json(serde_json::json!({"ok": true})),
        ]);
        let gateway = gateway_with(transport, Some("acc-1"), Some("ren-1")).await;

        let payload = gateway.get("/api/grades").await.unwrap();
        assert_eq!(payload.as_json().unwrap()["ok"], true);

        let requests = gateway.transport.requests();
        assert_eq!(requests.len(), 3);
        // Renewal exchange carries the renewal credential, no bearer.
        assert!(requests[1].url.ends_with("/auth/refresh"));
        assert_eq!(requests[1].bearer, None);
        // Retry carries the fresh credential.
        assert_eq!(requests[2].bearer.as_deref(), Some("acc-2"));

        // Store was rotated.
        assert_eq!(
            gateway.store.access_credential().await.unwrap().as_deref(),
            Some("acc-2")
        );
        assert_eq!(gateway.stats.renewals_attempted(), 1);
    }

    #[tokio::test]
    async fn test_second_unauthorized_is_terminal() {
        let transport = ScriptedTransport::with_script([
            unauthorized(),
            pair_response("acc-2", "ren-2"),
            unauthorized(),
        ]);
        let gateway = gateway_with(transport, Some("acc-1"), Some("ren-1")).await;

        let err = gateway.get("/api/grades").await.unwrap_err();
        assert!(err.is_unauthenticated());

        // Exactly three dispatches: original, renewal, retry. No fourth.
        assert_eq!(gateway.transport.requests().len(), 3);
        // Store cleared.
        assert_eq!(gateway.store.access_credential().await.unwrap(), None);
        assert_eq!(gateway.store.renewal_credential().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_renewal_failure_clears_store() {
        let transport = ScriptedTransport::with_script([
            unauthorized(),
            Ok(RawResponse::json(403, &serde_json::json!({"message": "renewal revoked"}))),
        ]);
        let gateway = gateway_with(transport, Some("acc-1"), Some("ren-1")).await;

        let err = gateway.get("/api/grades").await.unwrap_err();
        assert!(err.is_unauthenticated());

        // Original + failed renewal only; the retry never went out.
        assert_eq!(gateway.transport.requests().len(), 2);
        assert_eq!(gateway.store.access_credential().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_retried() {
        let transport =
            ScriptedTransport::with_script([Err(GatewayError::transport("connection refused"))]);
        let gateway = gateway_with(transport, Some("acc"), Some("ren")).await;

        let err = gateway.get("/api/grades").await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(gateway.transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_api_error_message_extraction() {
        let transport = ScriptedTransport::with_script([Ok(RawResponse::json(
            422,
            &serde_json::json!({"message": "enrollment window closed"}),
        ))]);
        let gateway = gateway_with(transport, Some("acc"), Some("ren")).await;

        let err = gateway.post("/api/enroll", serde_json::json!({})).await.unwrap_err();
        match err {
            GatewayError::Api { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "enrollment window closed");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_success_returns_text() {
        let transport = ScriptedTransport::with_script([Ok(RawResponse::new(
            200,
            Some("text/calendar".to_string()),
            "BEGIN:VCALENDAR",
        ))]);
        let gateway = gateway_with(transport, Some("acc"), Some("ren")).await;

        let payload = gateway.get("/api/schedule.ics").await.unwrap();
        assert_eq!(payload.as_text(), Some("BEGIN:VCALENDAR"));
    }

    #[test]
    fn test_extract_error_message_fallbacks() {
        let structured = RawResponse::json(500, &serde_json::json!({"error": "boom"}));
        assert_eq!(extract_error_message(&structured), "boom");

        let html = RawResponse::new(502, Some("text/html".to_string()), "<h1>bad</h1>");
        assert_eq!(extract_error_message(&html), "HTTP 502");

        let empty = RawResponse::json(503, &serde_json::json!({"message": ""}));
        assert_eq!(extract_error_message(&empty), "HTTP 503");
    }
}
