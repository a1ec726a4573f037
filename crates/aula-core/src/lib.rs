// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # aula-core
//!
//! Core abstractions and shared types for the Aula portal authentication
//! subsystem.
//!
//! This crate provides the foundational pieces used across all auth
//! components:
//!
//! - **Types**: `UserId`, `Role`, `EffectiveRole`, `CredentialPair`, `Identity`
//! - **Claims**: access-credential payload decoding (`AccessClaims`, `TokenDecoder`)
//! - **Error**: unified error hierarchy (`AuthError` and friends)
//!
//! ## Example
//!
//! ```rust,ignore
//! use aula_core::claims::TokenDecoder;
//! use aula_core::types::{EffectiveRole, Role};
//!
//! let decoder = TokenDecoder::new();
//! let claims = decoder.decode(token)?;
//!
//! let role = EffectiveRole::resolve(claims.role, /* elevated */ false);
//! assert_eq!(role, EffectiveRole::Student);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod claims;
pub mod error;
pub mod types;

pub use claims::{AccessClaims, TokenDecoder};
pub use error::{AuthError, AuthResult, DecodeError, GatewayError, StoreError};
pub use types::{CredentialPair, EffectiveRole, Identity, Role, UserId};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
