// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # aula-guard
//!
//! Per-navigation access decisions for the Aula portal.
//!
//! The guard runs once per navigation, not per component: given the
//! requested path and the current credential state it decides to allow,
//! redirect to login, or redirect to the dashboard the caller actually
//! owns. Every ambiguous state fails closed to the least-privileged
//! outcome.

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod guard;
mod routes;

pub use guard::{Access, RouteGuard, LOGIN_PATH};
pub use routes::{RouteClass, RouteRule, RouteTable};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
