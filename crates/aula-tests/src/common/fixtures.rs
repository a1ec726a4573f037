// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Pre-built tokens and stores for consistent, reproducible scenarios.

use std::sync::Arc;

use aula_core::types::{CredentialPair, Role};
use aula_store::{CredentialStore, MemoryCredentialStore};

use super::builders::{corrupt_payload, TokenBuilder};

// =============================================================================
// Token Fixtures
// =============================================================================

/// Fixture providing standard access credentials.
pub struct TokenFixtures;

impl TokenFixtures {
    /// A valid student credential.
    pub fn student() -> String {
        TokenBuilder::new("stu-001")
            .role(Role::Student)
            .username("jdoe")
            .email("jdoe@school.example")
            .name("Jamie", "Doe")
            .build()
    }

    /// A valid teacher credential.
    pub fn teacher() -> String {
        TokenBuilder::new("tch-001")
            .role(Role::Teacher)
            .username("tlee")
            .email("tlee@school.example")
            .build()
    }

    /// A valid admin credential.
    pub fn admin() -> String {
        TokenBuilder::new("adm-001")
            .role(Role::Admin)
            .username("principal")
            .build()
    }

    /// An expired student credential.
    pub fn expired_student() -> String {
        TokenBuilder::new("stu-001").role(Role::Student).expired().build()
    }

    /// Strings that must never decode to claims.
    pub fn malformed() -> Vec<String> {
        vec![
            String::new(),
            "garbage".to_string(),
            "only.two".to_string(),
            "!!!.@@@.###".to_string(),
            corrupt_payload(&Self::student()),
        ]
    }
}

// =============================================================================
// Store Fixtures
// =============================================================================

/// Fixture providing pre-populated credential stores.
pub struct StoreFixtures;

impl StoreFixtures {
    /// An empty store.
    pub fn empty() -> Arc<dyn CredentialStore> {
        Arc::new(MemoryCredentialStore::new())
    }

    /// A store holding the given access credential (and a renewal
    /// credential nobody inspects).
    pub fn with_access(token: &str) -> Arc<dyn CredentialStore> {
        Arc::new(MemoryCredentialStore::with_session(
            CredentialPair::new(token, "fixture-renewal"),
            false,
        ))
    }

    /// A store holding an admin session established through the
    /// global-admin login path.
    pub fn elevated_admin() -> Arc<dyn CredentialStore> {
        Arc::new(MemoryCredentialStore::with_session(
            CredentialPair::new(TokenFixtures::admin(), "fixture-renewal"),
            true,
        ))
    }
}
