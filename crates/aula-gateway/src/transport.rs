// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Abstract transport layer for API dispatch.
//!
//! This module defines the [`ApiTransport`] trait that decouples the
//! gateway's classification and renewal logic from the concrete HTTP
//! stack. The production implementation is
//! [`HttpApiTransport`](crate::http::HttpApiTransport); tests substitute
//! scripted transports.

use std::fmt::Debug;

use async_trait::async_trait;
use uuid::Uuid;

use aula_core::error::GatewayError;

use crate::types::{Method, RequestBody};

// =============================================================================
// TransportRequest
// =============================================================================

/// A fully-prepared outbound request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Bearer credential to attach; `None` sends no authorization
    /// header at all.
    pub bearer: Option<String>,
    /// Optional body.
    pub body: Option<RequestBody>,
    /// Request ID for tracing.
    pub request_id: Uuid,
}

impl TransportRequest {
    /// Creates a request with a fresh request ID.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            bearer: None,
            body: None,
            request_id: Uuid::now_v7(),
        }
    }

    /// Attaches a bearer credential.
    pub fn with_bearer(mut self, bearer: impl Into<String>) -> Self {
        self.bearer = Some(bearer.into());
        self
    }

    /// Attaches a body.
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }
}

// =============================================================================
// RawResponse
// =============================================================================

/// An un-classified response as the transport saw it.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Content type, when the server declared one.
    pub content_type: Option<String>,
    /// Body text.
    pub body: String,
}

impl RawResponse {
    /// Creates a response.
    pub fn new(status: u16, content_type: Option<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    /// Creates a JSON response (test/helper convenience).
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(
            status,
            Some("application/json".to_string()),
            value.to_string(),
        )
    }

    /// Returns `true` for 2xx statuses.
    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns `true` for 401.
    #[inline]
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Returns `true` when the declared content type is JSON.
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| {
                let essence = ct.split(';').next().unwrap_or(ct).trim();
                essence == "application/json" || essence.ends_with("+json")
            })
            .unwrap_or(false)
    }
}

// =============================================================================
// ApiTransport Trait
// =============================================================================

/// Abstract dispatch layer for API requests.
///
/// # Contract
///
/// - Returns `Ok` for every request that produced *any* response,
///   regardless of status; classification is the gateway's job.
/// - Returns `Err(GatewayError::Transport)` only when no response was
///   received (connect failure, DNS, timeout).
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; a single transport is shared
/// by all concurrent requests of one gateway.
#[async_trait]
pub trait ApiTransport: Send + Sync + Debug {
    /// Dispatches one request and returns the raw response.
    async fn dispatch(&self, request: TransportRequest) -> Result<RawResponse, GatewayError>;
}

#[async_trait]
impl<T: ApiTransport + ?Sized> ApiTransport for std::sync::Arc<T> {
    async fn dispatch(&self, request: TransportRequest) -> Result<RawResponse, GatewayError> {
        (**self).dispatch(request).await
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_response_status_classes() {
        assert!(RawResponse::new(200, None, "").is_success());
        assert!(RawResponse::new(204, None, "").is_success());
        assert!(!RawResponse::new(301, None, "").is_success());
        assert!(RawResponse::new(401, None, "").is_unauthorized());
        assert!(!RawResponse::new(403, None, "").is_unauthorized());
    }

    #[test]
    fn test_raw_response_json_detection() {
        let json = RawResponse::json(200, &serde_json::json!({}));
        assert!(json.is_json());

        let charset = RawResponse::new(
            200,
            Some("application/json; charset=utf-8".to_string()),
            "{}",
        );
        assert!(charset.is_json());

        let problem = RawResponse::new(400, Some("application/problem+json".to_string()), "{}");
        assert!(problem.is_json());

        let html = RawResponse::new(200, Some("text/html".to_string()), "<p></p>");
        assert!(!html.is_json());

        let untyped = RawResponse::new(200, None, "");
        assert!(!untyped.is_json());
    }

    #[test]
    fn test_transport_request_builder() {
        let req = TransportRequest::new(Method::Post, "https://x/api")
            .with_bearer("tok")
            .with_body(RequestBody::Json(serde_json::json!({"a": 1})));

        assert_eq!(req.method, Method::Post);
        assert_eq!(req.bearer.as_deref(), Some("tok"));
        assert!(req.body.is_some());
    }
}
