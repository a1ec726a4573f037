// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! HTTP transport backed by `reqwest`.

use async_trait::async_trait;
use reqwest::header;
use tracing::debug;

use aula_core::error::GatewayError;

use crate::config::GatewayConfig;
use crate::transport::{ApiTransport, RawResponse, TransportRequest};
use crate::types::Method;

// =============================================================================
// HttpApiTransport
// =============================================================================

/// Production transport dispatching over HTTP(S).
///
/// Holds a pooled `reqwest` client; cheap to clone and share. Any error
/// from the client before a status line is received maps to
/// [`GatewayError::Transport`].
#[derive(Debug, Clone)]
pub struct HttpApiTransport {
    client: reqwest::Client,
}

impl HttpApiTransport {
    /// Creates a transport honoring the configured timeout.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::transport_with("failed to build HTTP client", e))?;

        Ok(Self { client })
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl ApiTransport for HttpApiTransport {
    async fn dispatch(&self, request: TransportRequest) -> Result<RawResponse, GatewayError> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url);

        if let Some(bearer) = &request.bearer {
            builder = builder.bearer_auth(bearer);
        }

        if let Some(body) = &request.body {
            builder = builder
                .header(header::CONTENT_TYPE, body.content_type())
                .body(body.to_wire()?);
        }

        let response = builder.send().await.map_err(|e| {
            GatewayError::transport_with(
                format!("{} {} produced no response", request.method, request.url),
                e,
            )
        })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::transport_with("failed to read response body", e))?;

        debug!(
            request_id = %request.request_id,
            method = %request.method,
            url = %request.url,
            status,
            "request dispatched"
        );

        Ok(RawResponse::new(status, content_type, body))
    }
}

// =============================================================================
// Tests
// =============================================================================
