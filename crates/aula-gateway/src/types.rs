// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Request and response value types for the gateway.

use std::fmt;

use serde::{Deserialize, Serialize};

use aula_core::error::GatewayError;

// =============================================================================
// Method
// =============================================================================

/// HTTP method of an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// GET request.
    Get,
    /// POST request.
    Post,
    /// PUT request.
    Put,
    /// PATCH request.
    Patch,
    /// DELETE request.
    Delete,
}

impl Method {
    /// Returns the method as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// RequestBody
// =============================================================================

/// Body of an outbound request.
///
/// Structured values are serialized as JSON by the transport; raw bodies
/// pass through unchanged with their declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// A structured value, serialized as `application/json`.
    Json(serde_json::Value),
    /// An opaque body passed through unchanged.
    Raw {
        /// Content type to declare.
        content_type: String,
        /// Body bytes, as text.
        data: String,
    },
}

impl RequestBody {
    /// Creates a JSON body from any serializable value.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, GatewayError> {
        serde_json::to_value(value)
            .map(RequestBody::Json)
            .map_err(|e| GatewayError::invalid_response(format!("serialize request body: {}", e)))
    }

    /// Returns the content type this body is sent with.
    pub fn content_type(&self) -> &str {
        match self {
            RequestBody::Json(_) => "application/json",
            RequestBody::Raw { content_type, .. } => content_type,
        }
    }

    /// Serializes the body to its wire text.
    pub fn to_wire(&self) -> Result<String, GatewayError> {
        match self {
            RequestBody::Json(value) => serde_json::to_string(value).map_err(|e| {
                GatewayError::invalid_response(format!("serialize request body: {}", e))
            }),
            RequestBody::Raw { data, .. } => Ok(data.clone()),
        }
    }
}

// =============================================================================
// Payload
// =============================================================================

/// Successful response payload.
///
/// JSON responses are decoded; anything else is handed back as raw text
/// (callers that need structured data must request JSON explicitly).
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Decoded JSON body.
    Json(serde_json::Value),
    /// Raw text body of a non-JSON response.
    Text(String),
}

impl Payload {
    /// Returns the decoded JSON value, if this is a JSON payload.
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }

    /// Returns the raw text, if this is a text payload.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            Payload::Json(_) => None,
        }
    }

    /// Deserializes a JSON payload into a typed value.
    pub fn decode<T: serde::de::DeserializeOwned>(self) -> Result<T, GatewayError> {
        match self {
            Payload::Json(value) => serde_json::from_value(value)
                .map_err(|e| GatewayError::invalid_response(format!("decode response: {}", e))),
            Payload::Text(_) => Err(GatewayError::invalid_response(
                "expected a JSON response body",
            )),
        }
    }
}

// =============================================================================
// RenewalRequest
// =============================================================================

/// Wire request sent to the renewal endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenewalRequest {
    /// The stored renewal credential.
    #[serde(rename = "renewalCredential")]
    pub renewal_credential: String,
}

impl RenewalRequest {
    /// Creates a renewal request.
    pub fn new(renewal_credential: impl Into<String>) -> Self {
        Self {
            renewal_credential: renewal_credential.into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
