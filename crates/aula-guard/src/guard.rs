// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The per-navigation access decision.
//!
//! The decision is a pure function of two inputs, the credential state
//! and the route class; both are computed fresh on every navigation.
//! The full table is always evaluated; there is deliberately no
//! early-out that would skip the role matching.

use tracing::debug;

use aula_session::{CredentialState, IdentityResolver};

use crate::routes::{RouteClass, RouteTable};

/// Where unauthenticated navigations are sent.
pub const LOGIN_PATH: &str = "/auth/login";

// =============================================================================
// Access
// =============================================================================

/// Outcome of a navigation decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Proceed to the requested path.
    Allow,
    /// Navigate to the given path instead.
    Redirect(String),
}

impl Access {
    /// Redirect to the login page.
    pub fn to_login() -> Self {
        Access::Redirect(LOGIN_PATH.to_string())
    }

    /// Returns `true` when the navigation may proceed.
    pub fn is_allow(&self) -> bool {
        matches!(self, Access::Allow)
    }

    /// Returns the redirect target, if any.
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Access::Redirect(target) => Some(target),
            Access::Allow => None,
        }
    }
}

// =============================================================================
// RouteGuard
// =============================================================================

/// Evaluates the access decision for every navigation.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    resolver: IdentityResolver,
    table: RouteTable,
}

impl RouteGuard {
    /// Creates a guard over the given resolver and route table.
    pub fn new(resolver: IdentityResolver, table: RouteTable) -> Self {
        Self { resolver, table }
    }

    /// Creates a guard with the portal's default route table.
    pub fn with_defaults(resolver: IdentityResolver) -> Self {
        Self::new(resolver, RouteTable::portal_defaults())
    }

    /// Returns the route table.
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Decides the outcome for a navigation to `path`.
    pub async fn evaluate(&self, path: &str) -> Access {
        let class = self.table.classify(path);
        let state = self.resolver.credential_state().await;
        let access = decide(&state, &class);

        debug!(path, ?state, ?access, "navigation evaluated");
        access
    }
}

/// The decision table.
///
/// `NoCredential` covers both "nothing stored" and "stored but does not
/// decode"; a valid credential redirected away from a public page lands
/// on its own dashboard; the elevation override falls out of
/// `EffectiveRole::matches_segment` (a global admin owns the `admin`
/// segment).
fn decide(state: &CredentialState, class: &RouteClass) -> Access {
    match (state, class) {
        (CredentialState::NoCredential | CredentialState::Expired, RouteClass::Public) => {
            Access::Allow
        }
        (CredentialState::NoCredential | CredentialState::Expired, RouteClass::Private { .. }) => {
            Access::to_login()
        }
        (CredentialState::Valid(role), RouteClass::Public) => {
            Access::Redirect(role.dashboard_path())
        }
        (
            CredentialState::Valid(role),
            RouteClass::Private {
                segment: Some(segment),
            },
        ) if role.matches_segment(segment) => Access::Allow,
        (CredentialState::Valid(role), RouteClass::Private { .. }) => {
            Access::Redirect(role.dashboard_path())
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
