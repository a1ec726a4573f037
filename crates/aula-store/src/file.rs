// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! File-backed credential store.
//!
//! This module provides a durable store that persists the session record
//! as a JSON file, for portal clients that must survive a restart.
//!
//! # Durability Model
//!
//! Every mutation rewrites the whole record to a temporary file and
//! renames it over the old one. The rename is the commit point, so a
//! crash mid-write leaves either the old record or the new record on
//! disk, never a partially-cleared hybrid.
//!
//! # Concurrency
//!
//! Writers are serialized by a `tokio::sync::RwLock` around the cached
//! record; reads are served from the cache without touching the disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use aula_core::error::StoreError;
use aula_core::types::CredentialPair;

use crate::traits::{CredentialStore, SessionRecord};

// =============================================================================
// File Store
// =============================================================================

/// A credential store persisted as a JSON record file.
#[derive(Debug)]
pub struct FileCredentialStore {
    /// Record file location.
    path: PathBuf,
    /// Cached record; the file is only read at open.
    record: RwLock<SessionRecord>,
}

impl FileCredentialStore {
    /// Opens a store at the given path, loading an existing record.
    ///
    /// A missing file starts an empty session. A present-but-unparsable
    /// file is reported as [`StoreError::Corrupt`] rather than being
    /// silently discarded; callers decide whether to delete it.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StoreError::unavailable_with(
                    format!("cannot create {}", parent.display()),
                    e,
                )
            })?;
        }

        let record = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::corrupt(format!("{}: {}", path.display(), e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SessionRecord::default(),
            Err(e) => {
                return Err(StoreError::unavailable_with(
                    format!("cannot read {}", path.display()),
                    e,
                ))
            }
        };

        debug!(path = %path.display(), empty = record.is_empty(), "credential store opened");

        Ok(Self {
            path,
            record: RwLock::new(record),
        })
    }

    /// Returns the record file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persists the record atomically: write to a sibling temp file,
    /// then rename over the real one.
    async fn persist(&self, record: &SessionRecord) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(record)
            .map_err(|e| StoreError::corrupt(format!("serialize session record: {}", e)))?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes).await.map_err(|e| {
            StoreError::unavailable_with(format!("cannot write {}", tmp.display()), e)
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            StoreError::unavailable_with(format!("cannot commit {}", self.path.display()), e)
        })?;

        Ok(())
    }

    /// Applies a mutation under the writer lock and commits it to disk
    /// before the cache is updated.
    async fn update<F>(&self, mutate: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut SessionRecord),
    {
        let mut guard = self.record.write().await;
        let mut next = guard.clone();
        mutate(&mut next);
        self.persist(&next).await?;
        *guard = next;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn set_access_credential(&self, token: &str) -> Result<(), StoreError> {
        let token = token.to_string();
        self.update(|r| r.access = Some(token)).await
    }

    async fn set_renewal_credential(&self, token: &str) -> Result<(), StoreError> {
        let token = token.to_string();
        self.update(|r| r.renewal = Some(token)).await
    }

    async fn set_elevation_flag(&self, elevated: bool) -> Result<(), StoreError> {
        self.update(|r| r.elevated = elevated).await
    }

    async fn set_session(&self, pair: &CredentialPair, elevated: bool) -> Result<(), StoreError> {
        let next = SessionRecord {
            access: Some(pair.access.clone()),
            renewal: Some(pair.renewal.clone()),
            elevated,
        };
        self.update(|r| *r = next).await
    }

    async fn access_credential(&self) -> Result<Option<String>, StoreError> {
        Ok(self.record.read().await.access.clone())
    }

    async fn renewal_credential(&self) -> Result<Option<String>, StoreError> {
        Ok(self.record.read().await.renewal.clone())
    }

    async fn is_elevated(&self) -> Result<bool, StoreError> {
        Ok(self.record.read().await.elevated)
    }

    async fn clear_all(&self) -> Result<(), StoreError> {
        self.update(|r| *r = SessionRecord::default()).await
    }
}

// =============================================================================
// Tests
// =============================================================================
