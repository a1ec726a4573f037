// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Common Test Utilities
//!
//! Shared utilities, fixtures, and helpers for the auth integration
//! tests.
//!
//! ## Module Structure
//!
//! - `builders`: Builders that mint real signed tokens
//! - `fixtures`: Pre-built tokens and stores
//! - `mocks`: Mock transport with recording and failure injection
//! - `harness`: Assembled store + transport + gateway environments

pub mod builders;
pub mod fixtures;
pub mod harness;
pub mod mocks;

// Re-exports for convenience
pub use builders::*;
pub use fixtures::*;
pub use harness::*;
pub use mocks::*;

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialize test logging. Call this at the start of each test.
pub fn init_test_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("warn,aula=debug")),
            )
            .with_test_writer()
            .init();
    });
}
