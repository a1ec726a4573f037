// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session lifecycle: establish, tear down, demote.
//!
//! The login exchange itself happens elsewhere (the portal's login form
//! talks to the server); this module only persists what came back and
//! destroys it again. All writes go through the store's atomic
//! operations so a concurrent reader never sees a half-written session.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use aula_core::error::StoreError;
use aula_core::types::CredentialPair;
use aula_store::CredentialStore;

// =============================================================================
// LoginOutcome
// =============================================================================

/// What the login collaborator returns on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginOutcome {
    /// Short-lived access credential.
    #[serde(rename = "accessCredential")]
    pub access_credential: String,
    /// Longer-lived renewal credential.
    #[serde(rename = "renewalCredential")]
    pub renewal_credential: String,
    /// Set when the session was established via the global-admin login
    /// path. Absent means a regular login.
    #[serde(default, rename = "isGlobalAdmin", skip_serializing_if = "Option::is_none")]
    pub is_global_admin: Option<bool>,
}

impl LoginOutcome {
    /// Creates a regular (non-elevated) login outcome.
    pub fn new(access: impl Into<String>, renewal: impl Into<String>) -> Self {
        Self {
            access_credential: access.into(),
            renewal_credential: renewal.into(),
            is_global_admin: None,
        }
    }

    /// Marks the outcome as coming from the global-admin login path.
    pub fn global_admin(mut self) -> Self {
        self.is_global_admin = Some(true);
        self
    }

    /// Returns the credential pair.
    pub fn pair(&self) -> CredentialPair {
        CredentialPair::new(&self.access_credential, &self.renewal_credential)
    }
}

// =============================================================================
// SessionManager
// =============================================================================

/// Persists and destroys the session held in a credential store.
#[derive(Debug, Clone)]
pub struct SessionManager {
    store: Arc<dyn CredentialStore>,
}

impl SessionManager {
    /// Creates a manager over the given store.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Persists a login outcome: credential pair plus elevation flag.
    pub async fn login(&self, outcome: &LoginOutcome) -> Result<(), StoreError> {
        let elevated = outcome.is_global_admin.unwrap_or(false);
        self.store.set_session(&outcome.pair(), elevated).await?;
        debug!(elevated, "session established");
        Ok(())
    }

    /// Destroys the session: both credentials and the elevation flag.
    pub async fn logout(&self) -> Result<(), StoreError> {
        self.store.clear_all().await?;
        debug!("session cleared");
        Ok(())
    }

    /// Drops the elevation flag, leaving the credential pair intact.
    ///
    /// A global-admin session resolves as plain admin afterwards.
    pub async fn demote(&self) -> Result<(), StoreError> {
        self.store.set_elevation_flag(false).await?;
        debug!("session demoted");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
