// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Gateway configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// =============================================================================
// GatewayConfig
// =============================================================================

/// Configuration for the API gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the portal API, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the renewal endpoint, relative to the base URL.
    #[serde(default = "default_renewal_path")]
    pub renewal_path: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout")]
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_renewal_path() -> String {
    "/auth/refresh".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            renewal_path: default_renewal_path(),
            timeout: default_timeout(),
        }
    }
}

impl GatewayConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::default()
    }

    /// Creates a configuration for testing (short timeout).
    pub fn for_testing() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            renewal_path: default_renewal_path(),
            timeout: Duration::from_secs(2),
        }
    }

    /// Joins a request path onto the base URL.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Builder for [`GatewayConfig`].
#[derive(Debug, Default)]
pub struct GatewayConfigBuilder {
    config: GatewayConfig,
}

impl GatewayConfigBuilder {
    /// Sets the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Sets the renewal endpoint path.
    pub fn renewal_path(mut self, path: impl Into<String>) -> Self {
        self.config.renewal_path = path.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> GatewayConfig {
        self.config
    }
}

// =============================================================================
// Tests
// =============================================================================
