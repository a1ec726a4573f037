// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # aula-gateway
//!
//! Authenticated request gateway for the Aula portal.
//!
//! Every API call the portal makes goes through [`ApiGateway`], which:
//!
//! - attaches the stored access credential as a bearer header,
//! - classifies the outcome (success / structured API error / transport
//!   failure),
//! - and, on an unauthorized response, runs a bounded renewal protocol:
//!   one single-flight renewal exchange, one retry of the original
//!   request, and a terminal `Unauthenticated` (with the store cleared)
//!   if that retry is still rejected.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 ApiGateway                  │
//! │  (bearer attach, classify, renew-and-retry) │
//! └─────────────────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌─────────────────────────────────────────────┐
//! │                ApiTransport                 │
//! │          (abstract dispatch layer)          │
//! └─────────────────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌─────────────────────────────────────────────┐
//! │              HttpApiTransport               │
//! │                  (reqwest)                  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use aula_gateway::{ApiGateway, GatewayConfig, HttpApiTransport, Method};
//!
//! let config = GatewayConfig::builder()
//!     .base_url("https://portal.school.example")
//!     .build();
//! let transport = HttpApiTransport::new(&config)?;
//! let gateway = ApiGateway::new(transport, store, config);
//!
//! let grades = gateway.get("/api/grades/mine").await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod client;
mod config;
mod http;
mod transport;
mod types;

pub use client::{ApiGateway, GatewayStats, GatewayStatsSnapshot};
pub use config::{GatewayConfig, GatewayConfigBuilder};
pub use http::HttpApiTransport;
pub use transport::{ApiTransport, RawResponse, TransportRequest};
pub use types::{Method, Payload, RenewalRequest, RequestBody};

// Re-export the error type callers match on.
pub use aula_core::error::GatewayError;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
