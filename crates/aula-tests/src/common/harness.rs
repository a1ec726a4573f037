// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! One-call assembly of the subsystem for integration tests: a memory
//! store, a mock transport, and a gateway wired over both. The mock and
//! the store stay accessible for scripting and verification.

use std::sync::Arc;

use aula_core::types::CredentialPair;
use aula_gateway::{ApiGateway, GatewayConfig};
use aula_guard::{RouteGuard, RouteTable};
use aula_session::{IdentityResolver, SessionManager};
use aula_store::{CredentialStore, MemoryCredentialStore};

use super::init_test_logging;
use super::mocks::MockApiTransport;

// =============================================================================
// Gateway Harness
// =============================================================================

/// An assembled auth environment over a mock transport.
pub struct GatewayHarness {
    /// The mock transport, for scripting and interaction assertions.
    pub transport: Arc<MockApiTransport>,
    /// The credential store shared by every component.
    pub store: Arc<dyn CredentialStore>,
    /// The gateway under test.
    pub gateway: Arc<ApiGateway<Arc<MockApiTransport>>>,
    /// The configuration the gateway runs with.
    pub config: GatewayConfig,
}

impl GatewayHarness {
    /// Create a harness with an empty store.
    pub fn new() -> Self {
        init_test_logging();

        let config = GatewayConfig::for_testing();
        let transport = Arc::new(MockApiTransport::new());
        let store: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::new());
        let gateway = Arc::new(ApiGateway::new(
            transport.clone(),
            store.clone(),
            config.clone(),
        ));

        Self {
            transport,
            store,
            gateway,
            config,
        }
    }

    /// Create a harness with a stored session.
    pub async fn logged_in(access: &str, renewal: &str, elevated: bool) -> Self {
        let harness = Self::new();
        harness
            .store
            .set_session(&CredentialPair::new(access, renewal), elevated)
            .await
            .expect("memory store writes cannot fail");
        harness
    }

    /// The renewal endpoint path the gateway will call.
    pub fn renewal_path(&self) -> &str {
        &self.config.renewal_path
    }

    /// An identity resolver over the harness store.
    pub fn resolver(&self) -> IdentityResolver {
        IdentityResolver::new(self.store.clone())
    }

    /// A session manager over the harness store.
    pub fn session(&self) -> SessionManager {
        SessionManager::new(self.store.clone())
    }

    /// A route guard with the portal default table.
    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(self.resolver(), RouteTable::portal_defaults())
    }
}

impl Default for GatewayHarness {
    fn default() -> Self {
        Self::new()
    }
}
