// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Core data types for the Aula auth subsystem.
//!
//! This module provides the transport-agnostic types that flow between the
//! credential store, the identity resolver, the request gateway, and the
//! route guard.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Identifiers
// =============================================================================

/// A unique identifier for a portal user.
///
/// User IDs are issued server-side (the `sub` claim of the access
/// credential) and treated as opaque strings on the client.
///
/// # Examples
///
/// ```
/// use aula_core::types::UserId;
///
/// let id = UserId::new("u-20250114-0042");
/// assert_eq!(id.as_str(), "u-20250114-0042");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new user ID.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the ID and returns the inner string.
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Role
// =============================================================================

/// Role claim carried inside the access credential.
///
/// This is the role exactly as the server signed it. Elevation to
/// [`EffectiveRole::GlobalAdmin`] happens locally and only on top of
/// [`Role::Admin`]; see [`EffectiveRole::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Enrolled student.
    Student,
    /// Teaching staff.
    Teacher,
    /// School administrator.
    Admin,
}

impl Role {
    /// Returns the role name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Admin => "admin",
        }
    }

    /// Parses a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "student" => Some(Role::Student),
            "teacher" => Some(Role::Teacher),
            "admin" | "administrator" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// EffectiveRole
// =============================================================================

/// Role after applying the local elevation flag.
///
/// `GlobalAdmin` is never encoded in the credential itself; it is derived
/// by [`EffectiveRole::resolve`] from an `admin` claim plus the stored
/// elevation flag. It shares the `admin` route segment and dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectiveRole {
    /// Enrolled student.
    Student,
    /// Teaching staff.
    Teacher,
    /// School administrator.
    Admin,
    /// Administrator elevated through the global-admin login path.
    GlobalAdmin,
}

impl EffectiveRole {
    /// Applies the elevation rule to a decoded role claim.
    ///
    /// Elevation upgrades `admin` to `global-admin` and nothing else; a
    /// stale elevation flag next to a `student` or `teacher` claim is
    /// ignored.
    pub fn resolve(role: Role, elevated: bool) -> Self {
        match (role, elevated) {
            (Role::Admin, true) => EffectiveRole::GlobalAdmin,
            (Role::Admin, false) => EffectiveRole::Admin,
            (Role::Teacher, _) => EffectiveRole::Teacher,
            (Role::Student, _) => EffectiveRole::Student,
        }
    }

    /// Returns the role name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectiveRole::Student => "student",
            EffectiveRole::Teacher => "teacher",
            EffectiveRole::Admin => "admin",
            EffectiveRole::GlobalAdmin => "global-admin",
        }
    }

    /// Returns the route segment this role owns.
    ///
    /// A global admin navigates the regular admin area, so both admin
    /// variants map to `"admin"`.
    pub fn segment(&self) -> &'static str {
        match self {
            EffectiveRole::Student => "student",
            EffectiveRole::Teacher => "teacher",
            EffectiveRole::Admin | EffectiveRole::GlobalAdmin => "admin",
        }
    }

    /// Returns `true` if this role owns the given route segment.
    #[inline]
    pub fn matches_segment(&self, segment: &str) -> bool {
        self.segment() == segment
    }

    /// Returns the path of the dashboard owned by this role.
    pub fn dashboard_path(&self) -> String {
        format!("/{}/dashboard", self.segment())
    }

    /// Returns `true` for either admin variant.
    pub fn is_admin(&self) -> bool {
        matches!(self, EffectiveRole::Admin | EffectiveRole::GlobalAdmin)
    }
}

impl fmt::Display for EffectiveRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Role> for EffectiveRole {
    fn from(role: Role) -> Self {
        EffectiveRole::resolve(role, false)
    }
}

// =============================================================================
// CredentialPair
// =============================================================================

/// An access credential plus its longer-lived renewal credential.
///
/// Both tokens are opaque signed strings. The access credential carries
/// the claims inspected by [`crate::claims::TokenDecoder`]; the renewal
/// credential is never decoded locally and is only ever sent to the
/// renewal endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    /// Short-lived access credential.
    #[serde(rename = "accessCredential")]
    pub access: String,
    /// Longer-lived renewal credential.
    #[serde(rename = "renewalCredential")]
    pub renewal: String,
}

impl CredentialPair {
    /// Creates a new credential pair.
    pub fn new(access: impl Into<String>, renewal: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            renewal: renewal.into(),
        }
    }
}

// =============================================================================
// Identity
// =============================================================================

/// The effective identity of the current principal.
///
/// Derived from decoded claims plus the elevation flag; absent whenever
/// the access credential is absent, malformed, or expired. Never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable user identifier (the `sub` claim).
    pub id: UserId,
    /// Login name, when the credential carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Email address, when the credential carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Resolved role, elevation already applied.
    pub role: EffectiveRole,
    /// Given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl Identity {
    /// Returns a display name: full name when available, else username,
    /// else the raw ID.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            _ => self
                .username
                .clone()
                .unwrap_or_else(|| self.id.as_str().to_string()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
