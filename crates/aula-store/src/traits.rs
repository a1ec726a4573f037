// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Credential store trait.
//!
//! This module defines the storage abstraction for the session's
//! credential pair and elevation flag.
//!
//! # Design Principles
//!
//! - **Dumb storage**: no validation, no decoding. A store accepts any
//!   string; the identity resolver decides what it means.
//! - **Reported failures**: storage unavailability surfaces as a
//!   `StoreError`, never as a silently-absent credential.
//! - **Atomic clearing**: `clear_all` must never expose a
//!   partially-cleared record to a concurrent reader.
//! - **Serialized writers**: login, renewal, and logout all mutate the
//!   record through single write operations (`set_session`,
//!   `clear_all`) so read-then-write sequences cannot interleave.
//!
//! # Trust Boundary
//!
//! The elevation flag lives in client-controlled storage, which means it
//! is not itself trustworthy as an authorization input; the server must
//! enforce admin-ness independently. It is kept behind this trait so a
//! signed-claim-based source of elevation can replace it without
//! touching the resolver or the guard.

use std::fmt::Debug;

use async_trait::async_trait;

use aula_core::error::StoreError;
use aula_core::types::CredentialPair;

// =============================================================================
// CredentialStore Trait
// =============================================================================

/// Durable key-value persistence for the session credentials.
///
/// # Implementation Requirements
///
/// - All methods are async for non-blocking I/O
/// - Implementations must be thread-safe (`Send + Sync`)
/// - `clear_all` and `set_session` are atomic with respect to readers
#[async_trait]
pub trait CredentialStore: Send + Sync + Debug {
    /// Stores the access credential, replacing any previous value.
    async fn set_access_credential(&self, token: &str) -> Result<(), StoreError>;

    /// Stores the renewal credential, replacing any previous value.
    async fn set_renewal_credential(&self, token: &str) -> Result<(), StoreError>;

    /// Stores the elevation flag.
    async fn set_elevation_flag(&self, elevated: bool) -> Result<(), StoreError>;

    /// Stores a full session in one write.
    ///
    /// Backends override this to commit the pair and the flag as a
    /// single atomic replacement. The default implementation performs
    /// the three writes in order and is only appropriate for backends
    /// that serialize writers some other way.
    async fn set_session(&self, pair: &CredentialPair, elevated: bool) -> Result<(), StoreError> {
        self.set_access_credential(&pair.access).await?;
        self.set_renewal_credential(&pair.renewal).await?;
        self.set_elevation_flag(elevated).await
    }

    /// Returns the stored access credential, if any.
    async fn access_credential(&self) -> Result<Option<String>, StoreError>;

    /// Returns the stored renewal credential, if any.
    async fn renewal_credential(&self) -> Result<Option<String>, StoreError>;

    /// Returns the elevation flag; `false` when unset.
    async fn is_elevated(&self) -> Result<bool, StoreError>;

    /// Removes both credentials and the elevation flag.
    ///
    /// Atomic with respect to reads: no reader may observe a state where
    /// one credential is gone and the other remains.
    async fn clear_all(&self) -> Result<(), StoreError>;
}

// =============================================================================
// Session Record
// =============================================================================

/// The persisted shape shared by backends.
///
/// A plain record with three optional-ish slots; `elevated` defaults to
/// false so an older record without the field still loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub(crate) struct SessionRecord {
    /// Access credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    /// Renewal credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renewal: Option<String>,
    /// Elevation flag.
    #[serde(default)]
    pub elevated: bool,
}

impl SessionRecord {
    /// Returns `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.access.is_none() && self.renewal.is_none() && !self.elevated
    }
}

// =============================================================================
// Tests
// =============================================================================
