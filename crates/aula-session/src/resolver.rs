// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Identity resolution from the stored access credential.
//!
//! Resolution is a pure function of the stored credential and the
//! elevation flag, decoupled from how either got there. Decoding and
//! expiry checks are cheap and local, so every navigation and every
//! request can re-ask "who is this?" without a network round trip.
//!
//! Everything here fails closed: a store that cannot be read, a payload
//! that does not decode, and an expired credential all resolve to the
//! same observable outcome as "not logged in". `DecodeError` never
//! escapes this module.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use aula_core::claims::{AccessClaims, TokenDecoder};
use aula_core::types::{EffectiveRole, Identity};
use aula_store::CredentialStore;

// =============================================================================
// CredentialState
// =============================================================================

/// The three states a stored credential can be in.
///
/// Exactly one holds at any instant; `Valid` is the only state that ever
/// exposes a role, and it is produced only after the expiry check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialState {
    /// No credential stored, or one that does not decode.
    NoCredential,
    /// A decodable credential whose expiry has passed.
    Expired,
    /// A decodable, unexpired credential with its resolved role.
    Valid(EffectiveRole),
}

impl CredentialState {
    /// Returns `true` for the `Valid` state.
    pub fn is_valid(&self) -> bool {
        matches!(self, CredentialState::Valid(_))
    }
}

// =============================================================================
// IdentityResolver
// =============================================================================

/// Resolves the effective identity from a credential store.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    store: Arc<dyn CredentialStore>,
    decoder: TokenDecoder,
}

impl IdentityResolver {
    /// Creates a resolver over the given store.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            store,
            decoder: TokenDecoder::new(),
        }
    }

    /// Creates a resolver with a custom token decoder.
    pub fn with_decoder(store: Arc<dyn CredentialStore>, decoder: TokenDecoder) -> Self {
        Self { store, decoder }
    }

    /// Returns the store this resolver reads from.
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Returns `true` if a decodable, unexpired access credential is
    /// stored.
    ///
    /// Never panics and never surfaces an error: store failures and
    /// malformed payloads both count as invalid.
    pub async fn is_valid(&self) -> bool {
        self.valid_claims().await.is_some()
    }

    /// Returns the effective identity, or `None` under every condition
    /// that makes [`is_valid`](Self::is_valid) false.
    pub async fn effective_identity(&self) -> Option<Identity> {
        let claims = self.valid_claims().await?;
        let elevated = self.elevation_flag().await;
        Some(claims.to_identity(elevated))
    }

    /// Classifies the stored credential into one of the three states.
    pub async fn credential_state(&self) -> CredentialState {
        let token = match self.store.access_credential().await {
            Ok(Some(token)) => token,
            Ok(None) => return CredentialState::NoCredential,
            Err(e) => {
                debug!(error = %e, "credential store read failed; treating as no credential");
                return CredentialState::NoCredential;
            }
        };

        let claims = match self.decoder.decode(&token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(error = %e, "access credential failed to decode; treating as no credential");
                return CredentialState::NoCredential;
            }
        };

        if claims.is_expired_at(Utc::now().timestamp()) {
            return CredentialState::Expired;
        }

        let elevated = self.elevation_flag().await;
        CredentialState::Valid(EffectiveRole::resolve(claims.role, elevated))
    }

    /// Reads, decodes, and expiry-checks the stored credential.
    async fn valid_claims(&self) -> Option<AccessClaims> {
        let token = match self.store.access_credential().await {
            Ok(token) => token?,
            Err(e) => {
                debug!(error = %e, "credential store read failed; treating as invalid");
                return None;
            }
        };

        let claims = match self.decoder.decode(&token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(error = %e, "access credential failed to decode; treating as invalid");
                return None;
            }
        };

        if claims.is_expired_at(Utc::now().timestamp()) {
            return None;
        }

        Some(claims)
    }

    /// Reads the elevation flag, failing closed to `false`.
    async fn elevation_flag(&self) -> bool {
        match self.store.is_elevated().await {
            Ok(elevated) => elevated,
            Err(e) => {
                debug!(error = %e, "elevation flag read failed; treating as not elevated");
                false
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
