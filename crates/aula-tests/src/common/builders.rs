// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Builders
//!
//! Builders for constructing test credentials with sensible defaults.
//!
//! ## Design Principles
//!
//! - Tokens are real HS256 JWTs, not hand-assembled strings, so the
//!   decoder sees exactly what a server would produce
//! - Chainable methods for fluent setup
//! - Tampering helpers for malformed-credential scenarios

use base64::Engine;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use aula_core::claims::AccessClaims;
use aula_core::types::Role;

/// Signing secret used for every test token.
///
/// The subsystem never verifies signatures locally, so the value only
/// matters for producing structurally valid tokens.
pub const TEST_SECRET: &[u8] = b"aula-integration-test-secret";

// =============================================================================
// Token Builder
// =============================================================================

/// Builder for access credentials.
#[derive(Debug, Clone)]
pub struct TokenBuilder {
    sub: String,
    role: Role,
    exp: i64,
    username: Option<String>,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
}

impl TokenBuilder {
    /// Create a builder for the given subject; valid for one hour.
    pub fn new(sub: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            role: Role::Student,
            exp: Utc::now().timestamp() + 3600,
            username: None,
            email: None,
            first_name: None,
            last_name: None,
        }
    }

    /// Set the role claim.
    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Set the expiry to `secs` seconds from now.
    pub fn expires_in(mut self, secs: i64) -> Self {
        self.exp = Utc::now().timestamp() + secs;
        self
    }

    /// Set an absolute expiry timestamp.
    pub fn expires_at(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }

    /// Set the expiry one hour into the past.
    pub fn expired(self) -> Self {
        self.expires_in(-3600)
    }

    /// Set the username claim.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the email claim.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the name claims.
    pub fn name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    /// Build the claims without encoding them.
    pub fn claims(&self) -> AccessClaims {
        let mut claims = AccessClaims::new(self.sub.clone(), self.role, 0);
        claims.exp = self.exp;
        claims.username = self.username.clone();
        claims.email = self.email.clone();
        claims.first_name = self.first_name.clone();
        claims.last_name = self.last_name.clone();
        claims
    }

    /// Build the signed token.
    pub fn build(&self) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &self.claims(),
            &EncodingKey::from_secret(TEST_SECRET),
        )
        .expect("token encoding cannot fail for valid claims")
    }
}

// =============================================================================
// Tampering Helpers
// =============================================================================

/// Replace a token's payload segment with bytes that are valid base64
/// but not valid claims JSON.
pub fn corrupt_payload(token: &str) -> String {
    let mut parts: Vec<&str> = token.split('.').collect();
    let garbled = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(b"{\"not\": \"claims\"");
    if parts.len() == 3 {
        parts[1] = &garbled;
        parts.join(".")
    } else {
        garbled
    }
}

/// Truncate a token to two segments.
pub fn truncate_segments(token: &str) -> String {
    token.rsplit_once('.').map(|(head, _)| head.to_string()).unwrap_or_default()
}
