// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # aula-store
//!
//! Durable credential persistence for the Aula portal auth subsystem.
//!
//! This crate owns the session's credential pair and elevation flag and
//! nothing else: no decoding, no network, no policy. Two backends are
//! provided, an in-memory store for tests and short-lived tools and a
//! file-backed store for anything that must survive a restart.

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod file;
mod memory;
mod traits;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;
pub use traits::CredentialStore;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
