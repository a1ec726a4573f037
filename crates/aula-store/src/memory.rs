// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory credential store.
//!
//! This module provides a thread-safe, process-local store that
//! implements the [`CredentialStore`] trait. It is the backend of choice
//! for tests and for embedding contexts that keep their own persistence.
//!
//! # Features
//!
//! - **Single-lock record**: the whole session lives under one
//!   `parking_lot::RwLock`, so `set_session` and `clear_all` are
//!   trivially atomic with respect to readers.
//! - **No persistence**: contents are lost when the store is dropped.

use async_trait::async_trait;
use parking_lot::RwLock;

use aula_core::error::StoreError;
use aula_core::types::CredentialPair;

use crate::traits::{CredentialStore, SessionRecord};

// =============================================================================
// Memory Store
// =============================================================================

/// An in-memory credential store.
///
/// # Thread Safety
///
/// `Send + Sync`; the record is protected by a `parking_lot::RwLock`
/// and no lock is ever held across an await point.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    record: RwLock<SessionRecord>,
}

impl MemoryCredentialStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a session (test convenience).
    pub fn with_session(pair: CredentialPair, elevated: bool) -> Self {
        Self {
            record: RwLock::new(SessionRecord {
                access: Some(pair.access),
                renewal: Some(pair.renewal),
                elevated,
            }),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn set_access_credential(&self, token: &str) -> Result<(), StoreError> {
        self.record.write().access = Some(token.to_string());
        Ok(())
    }

    async fn set_renewal_credential(&self, token: &str) -> Result<(), StoreError> {
        self.record.write().renewal = Some(token.to_string());
        Ok(())
    }

    async fn set_elevation_flag(&self, elevated: bool) -> Result<(), StoreError> {
        self.record.write().elevated = elevated;
        Ok(())
    }

    async fn set_session(&self, pair: &CredentialPair, elevated: bool) -> Result<(), StoreError> {
        *self.record.write() = SessionRecord {
            access: Some(pair.access.clone()),
            renewal: Some(pair.renewal.clone()),
            elevated,
        };
        Ok(())
    }

    async fn access_credential(&self) -> Result<Option<String>, StoreError> {
        Ok(self.record.read().access.clone())
    }

    async fn renewal_credential(&self) -> Result<Option<String>, StoreError> {
        Ok(self.record.read().renewal.clone())
    }

    async fn is_elevated(&self) -> Result<bool, StoreError> {
        Ok(self.record.read().elevated)
    }

    async fn clear_all(&self) -> Result<(), StoreError> {
        *self.record.write() = SessionRecord::default();
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
