// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Access-credential claims and payload decoding.
//!
//! The access credential is a signed JWT. Its signature is verified
//! server-side on every request; the client decodes the payload purely
//! for display and routing decisions, so decoding here deliberately
//! skips signature verification and checks expiry explicitly instead of
//! through the validator (the boundary `exp == now` must count as
//! expired, with no leeway).

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::types::{EffectiveRole, Identity, Role, UserId};

// =============================================================================
// AccessClaims
// =============================================================================

/// Claims carried in the access credential payload.
///
/// These follow the portal's wire format: standard `sub`/`exp` claims
/// plus camelCase profile fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject - the user ID.
    pub sub: String,

    /// Role claim as signed by the server.
    pub role: Role,

    /// Expiration time (Unix timestamp, seconds).
    pub exp: i64,

    /// Login name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Given name.
    #[serde(default, rename = "firstName", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    /// Family name.
    #[serde(default, rename = "lastName", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl AccessClaims {
    /// Creates new claims for a user.
    pub fn new(user_id: impl Into<String>, role: Role, expires_in_secs: i64) -> Self {
        Self {
            sub: user_id.into(),
            role,
            exp: Utc::now().timestamp() + expires_in_secs,
            username: None,
            email: None,
            first_name: None,
            last_name: None,
        }
    }

    /// Returns the user ID.
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    /// Returns `true` if the claims are expired at the given instant.
    ///
    /// The boundary counts as expired: a credential whose `exp` equals
    /// the current second is already invalid.
    #[inline]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }

    /// Returns `true` if the claims are expired now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    /// Returns the expiration time as a `DateTime`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Sets the login name.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the given and family names.
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    /// Builds the effective identity, applying the elevation rule.
    pub fn to_identity(&self, elevated: bool) -> Identity {
        Identity {
            id: UserId::new(self.sub.clone()),
            username: self.username.clone(),
            email: self.email.clone(),
            role: EffectiveRole::resolve(self.role, elevated),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

// =============================================================================
// TokenDecoder
// =============================================================================

/// Decodes access-credential payloads without verifying the signature.
///
/// Signature verification happens server-side; locally decoded claims
/// gate only display and navigation, never a server-trusted decision.
/// Expiry validation is disabled in the validator so the caller controls
/// the boundary semantics via [`AccessClaims::is_expired_at`].
#[derive(Clone)]
pub struct TokenDecoder {
    validation: Validation,
    key: DecodingKey,
}

impl TokenDecoder {
    /// Creates a decoder for the portal's default algorithm (HS256).
    pub fn new() -> Self {
        Self::with_algorithm(Algorithm::HS256)
    }

    /// Creates a decoder accepting tokens signed with the given algorithm.
    pub fn with_algorithm(algorithm: Algorithm) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.insecure_disable_signature_validation();

        Self {
            validation,
            // Unused while signature validation is disabled.
            key: DecodingKey::from_secret(&[]),
        }
    }

    /// Decodes the claims payload of an access credential.
    ///
    /// Never panics; every malformed input (wrong segment count, bad
    /// base64, invalid JSON, unknown role, missing `exp`) maps to
    /// [`DecodeError::Malformed`].
    pub fn decode(&self, token: &str) -> Result<AccessClaims, DecodeError> {
        if token.is_empty() {
            return Err(DecodeError::malformed("empty credential"));
        }

        decode::<AccessClaims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| DecodeError::malformed(e.to_string()))
    }
}

impl Default for TokenDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenDecoder")
            .field("algorithms", &self.validation.algorithms)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn mint(claims: &AccessClaims) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_round_trip() {
        let claims = AccessClaims::new("u-100", Role::Teacher, 3600)
            .with_username("jdoe")
            .with_name("Jamie", "Doe");
        let token = mint(&claims);

        let decoded = TokenDecoder::new().decode(&token).unwrap();
        assert_eq!(decoded.sub, "u-100");
        assert_eq!(decoded.role, Role::Teacher);
        assert_eq!(decoded.username.as_deref(), Some("jdoe"));
        assert_eq!(decoded.first_name.as_deref(), Some("Jamie"));
        assert!(!decoded.is_expired());
    }

    #[test]
    fn test_decode_malformed_inputs() {
        let decoder = TokenDecoder::new();

        assert!(decoder.decode("").is_err());
        assert!(decoder.decode("not-a-token").is_err());
        assert!(decoder.decode("a.b").is_err());
        assert!(decoder.decode("!!!.@@@.###").is_err());
    }

    #[test]
    fn test_decode_unknown_role_is_malformed() {
        // Hand-roll claims with a role the portal does not know.
        #[derive(Serialize)]
        struct Alien<'a> {
            sub: &'a str,
            role: &'a str,
            exp: i64,
        }
        let token = encode(
            &Header::new(Algorithm::HS256),
            &Alien {
                sub: "u-1",
                role: "janitor",
                exp: Utc::now().timestamp() + 600,
            },
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();

        assert!(TokenDecoder::new().decode(&token).is_err());
    }

    #[test]
    fn test_expired_claims_still_decode() {
        // Expiry is the caller's concern; the decoder must hand back the
        // payload so the resolver can classify the state.
        let mut claims = AccessClaims::new("u-1", Role::Student, 0);
        claims.exp = Utc::now().timestamp() - 100;
        let token = mint(&claims);

        let decoded = TokenDecoder::new().decode(&token).unwrap();
        assert!(decoded.is_expired());
    }

    #[test]
    fn test_expiry_boundary_counts_as_expired() {
        let mut claims = AccessClaims::new("u-1", Role::Student, 0);
        claims.exp = 1_700_000_000;

        assert!(claims.is_expired_at(1_700_000_000));
        assert!(claims.is_expired_at(1_700_000_001));
        assert!(!claims.is_expired_at(1_699_999_999));
    }

    #[test]
    fn test_to_identity_applies_elevation() {
        let claims = AccessClaims::new("u-adm", Role::Admin, 3600);
        assert_eq!(claims.to_identity(true).role, EffectiveRole::GlobalAdmin);
        assert_eq!(claims.to_identity(false).role, EffectiveRole::Admin);

        let student = AccessClaims::new("u-stu", Role::Student, 3600);
        assert_eq!(student.to_identity(true).role, EffectiveRole::Student);
    }
}
