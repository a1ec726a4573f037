// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Static route classification.
//!
//! The surrounding application owns the mapping from path prefixes to
//! access classes; this module just evaluates it. Matching is by path
//! segment: the prefix `/admin` matches `/admin` and `/admin/users`,
//! never `/administration`. The longest matching prefix wins.

use serde::{Deserialize, Serialize};

// =============================================================================
// RouteClass
// =============================================================================

/// Access class of a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum RouteClass {
    /// Reachable without a session.
    Public,
    /// Requires a valid session.
    Private {
        /// Role segment that owns the path; `None` when no single role
        /// does (e.g. unmatched paths under a closed fallback).
        segment: Option<String>,
    },
}

impl RouteClass {
    /// Creates a private class owned by the given role segment.
    pub fn private(segment: impl Into<String>) -> Self {
        RouteClass::Private {
            segment: Some(segment.into()),
        }
    }

    /// Creates a private class no role owns.
    pub fn login_required() -> Self {
        RouteClass::Private { segment: None }
    }

    /// Returns `true` for the public class.
    pub fn is_public(&self) -> bool {
        matches!(self, RouteClass::Public)
    }
}

// =============================================================================
// RouteRule
// =============================================================================

/// One prefix rule of the route table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRule {
    /// Path prefix, without a trailing slash.
    pub prefix: String,
    /// Class assigned to everything under the prefix.
    pub class: RouteClass,
}

impl RouteRule {
    /// Creates a rule.
    pub fn new(prefix: impl Into<String>, class: RouteClass) -> Self {
        let mut prefix = prefix.into();
        while prefix.len() > 1 && prefix.ends_with('/') {
            prefix.pop();
        }
        Self { prefix, class }
    }

    /// Returns `true` if the rule covers the given path.
    ///
    /// Matches whole segments only.
    pub fn matches(&self, path: &str) -> bool {
        path == self.prefix
            || path
                .strip_prefix(&self.prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

// =============================================================================
// RouteTable
// =============================================================================

/// Static mapping from path prefixes to route classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteTable {
    /// Prefix rules.
    rules: Vec<RouteRule>,
    /// Whether unmatched paths are public. The portal default is
    /// closed: unknown paths require a login.
    #[serde(default)]
    public_fallback: bool,
}

impl RouteTable {
    /// Creates an empty table with a closed fallback.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            public_fallback: false,
        }
    }

    /// The portal's standard table: `/auth` is public, the three role
    /// areas are private, and everything else requires a login.
    pub fn portal_defaults() -> Self {
        Self::new()
            .public("/auth")
            .private("/student", "student")
            .private("/teacher", "teacher")
            .private("/admin", "admin")
    }

    /// Adds a public prefix.
    pub fn public(mut self, prefix: impl Into<String>) -> Self {
        self.rules.push(RouteRule::new(prefix, RouteClass::Public));
        self
    }

    /// Adds a private prefix owned by a role segment.
    pub fn private(mut self, prefix: impl Into<String>, segment: impl Into<String>) -> Self {
        self.rules
            .push(RouteRule::new(prefix, RouteClass::private(segment)));
        self
    }

    /// Makes unmatched paths public instead of login-gated.
    pub fn with_public_fallback(mut self) -> Self {
        self.public_fallback = true;
        self
    }

    /// Classifies a path by its longest matching prefix.
    pub fn classify(&self, path: &str) -> RouteClass {
        self.rules
            .iter()
            .filter(|rule| rule.matches(path))
            .max_by_key(|rule| rule.prefix.len())
            .map(|rule| rule.class.clone())
            .unwrap_or_else(|| {
                if self.public_fallback {
                    RouteClass::Public
                } else {
                    RouteClass::login_required()
                }
            })
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::portal_defaults()
    }
}

// =============================================================================
// Tests
// =============================================================================
