// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Unified error hierarchy for the auth subsystem.
//!
//! # Error Hierarchy
//!
//! ```text
//! AuthError (root)
//! ├── StoreError    - Credential store reads/writes
//! ├── GatewayError  - Request dispatch, classification, renewal
//! └── DecodeError   - Credential payload decoding (internal only)
//! ```
//!
//! `DecodeError` never crosses a public API: a credential that fails to
//! decode is indistinguishable from "not logged in", which keeps the
//! route guard fail-closed. `GatewayError::Unauthenticated` carries the
//! contract that the store has already been cleared when it surfaces.

use thiserror::Error;

/// Result type alias for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Boxed error source used for transport/storage causes.
pub type ErrorSource = Box<dyn std::error::Error + Send + Sync + 'static>;

// =============================================================================
// AuthError - Root Error Type
// =============================================================================

/// The root error type for the auth subsystem.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Credential store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Request gateway error.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Credential decoding error.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

impl AuthError {
    /// Returns a user-friendly error message.
    ///
    /// Suitable for display to end users; avoids exposing internals.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Store(e) => e.user_message(),
            AuthError::Gateway(e) => e.user_message(),
            AuthError::Decode(_) => "인증 정보가 유효하지 않습니다".to_string(),
        }
    }
}

// =============================================================================
// StoreError
// =============================================================================

/// Errors from the credential store.
///
/// The store is dumb key-value persistence, so the only failures are the
/// backing storage being unavailable or holding a record that no longer
/// parses. Neither is ever silently swallowed.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing storage could not be read or written.
    #[error("Credential storage unavailable: {message}")]
    Unavailable {
        /// What failed.
        message: String,
        /// Underlying cause, when one exists.
        #[source]
        source: Option<ErrorSource>,
    },

    /// The stored record exists but cannot be parsed.
    #[error("Credential record corrupt: {message}")]
    Corrupt {
        /// What failed to parse.
        message: String,
    },
}

impl StoreError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an unavailable error with an underlying cause.
    pub fn unavailable_with(message: impl Into<String>, source: impl Into<ErrorSource>) -> Self {
        Self::Unavailable {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates a corrupt-record error.
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }

    /// Returns a user-friendly error message.
    pub fn user_message(&self) -> String {
        "세션 저장소에 접근할 수 없습니다".to_string()
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::unavailable_with("I/O failure", e)
    }
}

// =============================================================================
// DecodeError
// =============================================================================

/// Errors from decoding an access-credential payload.
///
/// Handled inside the subsystem and collapsed to "absent identity";
/// callers never see it through `is_valid`/`effective_identity`.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The credential is not a decodable token.
    #[error("Malformed credential: {message}")]
    Malformed {
        /// Decoder diagnostic.
        message: String,
    },
}

impl DecodeError {
    /// Creates a malformed-credential error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

// =============================================================================
// GatewayError
// =============================================================================

/// Errors from the request gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No response was received (network, DNS, timeout). Never retried.
    #[error("Transport failure: {message}")]
    Transport {
        /// What failed.
        message: String,
        /// Underlying cause, when one exists.
        #[source]
        source: Option<ErrorSource>,
    },

    /// The server reported a structured failure.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body, or a generic one.
        message: String,
    },

    /// Renewal failed or the retried request was still unauthorized.
    ///
    /// By the time this surfaces, all credentials have been cleared, so
    /// the next navigation is treated as logged out.
    #[error("Unauthenticated")]
    Unauthenticated,

    /// A success response carried a body that could not be decoded.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Decoder diagnostic.
        message: String,
    },

    /// The credential store failed underneath the gateway.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl GatewayError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a transport error with an underlying cause.
    pub fn transport_with(message: impl Into<String>, source: impl Into<ErrorSource>) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates an invalid-response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Returns the HTTP status, for API errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is a transport failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, GatewayError::Transport { .. })
    }

    /// Returns `true` if the session is gone and the caller should send
    /// the user back to login.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, GatewayError::Unauthenticated)
    }

    /// Returns a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Transport { .. } => "서버에 연결할 수 없습니다".to_string(),
            GatewayError::Api { message, .. } => message.clone(),
            GatewayError::Unauthenticated => "로그인이 필요합니다".to_string(),
            GatewayError::InvalidResponse { .. } => "서버 응답을 해석할 수 없습니다".to_string(),
            GatewayError::Store(e) => e.user_message(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_status() {
        let err = GatewayError::api(404, "Not found");
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_unauthenticated());

        assert_eq!(GatewayError::Unauthenticated.status(), None);
        assert!(GatewayError::Unauthenticated.is_unauthenticated());
    }

    #[test]
    fn test_transport_error_with_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let err = GatewayError::transport_with("request timed out", io);

        assert!(err.is_transport());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_store_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: StoreError = io.into();
        assert!(matches!(err, StoreError::Unavailable { .. }));
    }

    #[test]
    fn test_root_error_conversions() {
        let auth: AuthError = StoreError::unavailable("disk gone").into();
        assert!(matches!(auth, AuthError::Store(_)));

        let auth: AuthError = GatewayError::Unauthenticated.into();
        assert_eq!(auth.user_message(), "로그인이 필요합니다");
    }
}
