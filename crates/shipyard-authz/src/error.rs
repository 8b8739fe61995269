//! Error types for the authorization client.

use crate::reference::PermissionQuery;
use crate::types::Permissionship;

/// Authorization client errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// The check completed but did not grant the permission.
    #[error("permission check failed: {query} returned {permissionship}")]
    PermissionDenied {
        query: PermissionQuery,
        permissionship: Permissionship,
    },

    /// Token missing, invalid or expired (HTTP 401).
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// Token accepted but not allowed to perform the call (HTTP 403).
    #[error("forbidden: {message}")]
    Forbidden { message: String },

    /// Connection, DNS or TLS failure.
    #[error("network error: {message}")]
    Network { message: String },

    /// No response within the configured timeout.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Non-success status or an error line in a response stream.
    #[error("remote error (HTTP {status}): {message}")]
    Remote { status: u16, message: String },

    /// Response body could not be decoded.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// Malformed object, subject or query string.
    #[error("invalid reference: {reference} - {reason}")]
    InvalidReference { reference: String, reason: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl AuthzError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            // Assertion failure
            Self::PermissionDenied { .. } => 1,

            // Usage / config issues
            Self::Config { .. } => 2,
            Self::InvalidReference { .. } => 2,

            // Auth issues
            Self::Unauthorized { .. } => 4,
            Self::Forbidden { .. } => 4,

            // Network/transient
            Self::Network { .. } => 5,
            Self::Timeout { .. } => 5,

            // Remote side
            Self::Remote { .. } => 6,
            Self::InvalidResponse { .. } => 6,
        }
    }

    /// Whether the service rejected the credentials.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::Forbidden { .. })
    }

    pub(crate) fn invalid_reference(reference: &str, reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for authorization operations.
pub type AuthzResult<T> = Result<T, AuthzError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let unauthorized = AuthzError::Unauthorized {
            message: "bad token".into(),
        };
        let network = AuthzError::Network {
            message: "connection refused".into(),
        };
        assert_eq!(unauthorized.exit_code(), 4);
        assert_eq!(network.exit_code(), 5);
        assert_eq!(AuthzError::Timeout { timeout_secs: 1 }.exit_code(), 5);
        assert_eq!(
            AuthzError::Remote {
                status: 500,
                message: "boom".into()
            }
            .exit_code(),
            6
        );
    }

    #[test]
    fn test_auth_error_distinct_from_network() {
        assert!(AuthzError::Forbidden {
            message: "nope".into()
        }
        .is_auth_error());
        assert!(!AuthzError::Network {
            message: "reset".into()
        }
        .is_auth_error());
    }

    #[test]
    fn test_denied_message() {
        let query: PermissionQuery = "starship:orion#operate@user:picard".parse().unwrap();
        let err = AuthzError::PermissionDenied {
            query,
            permissionship: Permissionship::NoPermission,
        };
        assert_eq!(err.exit_code(), 1);
        assert_eq!(
            err.to_string(),
            "permission check failed: starship:orion#operate@user:picard returned NO_PERMISSION"
        );
    }
}
