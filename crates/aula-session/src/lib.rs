// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # aula-session
//!
//! Identity resolution and session lifecycle for the Aula portal.
//!
//! Two pieces live here:
//!
//! - [`IdentityResolver`]: answers "is there a valid identity right
//!   now?" by decoding the stored access credential, checking expiry,
//!   and applying the elevation rule. Pure reads; safe to call on every
//!   request.
//! - [`SessionManager`]: persists what the login collaborator returned,
//!   and tears the session down on logout or demotion. The only writer
//!   besides the gateway's renewal protocol.

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod manager;
mod resolver;

pub use manager::{LoginOutcome, SessionManager};
pub use resolver::{CredentialState, IdentityResolver};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
