//! Configuration, result enums and request/response bodies.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AuthzError, AuthzResult};
use crate::reference::{ObjectRef, Relationship, SubjectRef};

/// Result of a single permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permissionship {
    HasPermission,
    NoPermission,
    /// Depends on caveat context that was not supplied, or unknown.
    Conditional,
}

impl Permissionship {
    pub fn is_granted(self) -> bool {
        self == Self::HasPermission
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::HasPermission => "HAS_PERMISSION",
            Self::NoPermission => "NO_PERMISSION",
            Self::Conditional => "CONDITIONAL",
        }
    }
}

impl fmt::Display for Permissionship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permissionship of a looked-up resource or subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LookupPermissionship {
    HasPermission,
    ConditionalPermission,
    /// Missing or unrecognized on the wire.
    Unspecified,
}

impl fmt::Display for LookupPermissionship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::HasPermission => "HAS_PERMISSION",
            Self::ConditionalPermission => "CONDITIONAL_PERMISSION",
            Self::Unspecified => "UNSPECIFIED",
        })
    }
}

/// Snapshot requirement sent with every read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consistency {
    #[default]
    MinimizeLatency,
    FullyConsistent,
}

/// Authorization client configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthzConfig {
    /// Base URL of the service's HTTP API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Bearer token.
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// PEM file added as an extra trust root.
    #[serde(default)]
    pub ca_cert: Option<PathBuf>,

    #[serde(default)]
    pub consistency: Consistency,
}

fn default_endpoint() -> String {
    "https://localhost:8443".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            token: None,
            timeout_secs: default_timeout(),
            ca_cert: None,
            consistency: Consistency::default(),
        }
    }
}

// Token stays out of logs.
impl fmt::Debug for AuthzConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthzConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("ca_cert", &self.ca_cert)
            .field("consistency", &self.consistency)
            .finish()
    }
}

impl AuthzConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `SHIPYARD_AUTHZ_ENDPOINT` | Service base URL |
    /// | `SHIPYARD_AUTHZ_TOKEN` | Bearer token |
    /// | `SHIPYARD_AUTHZ_TIMEOUT` | Request timeout in seconds |
    /// | `SHIPYARD_AUTHZ_CA_CERT` | Extra PEM trust root |
    /// | `SHIPYARD_AUTHZ_FULLY_CONSISTENT` | Fully consistent reads |
    ///
    /// A timeout that is not a whole number of seconds is a config error.
    pub fn from_env() -> AuthzResult<Self> {
        let timeout_secs = match std::env::var("SHIPYARD_AUTHZ_TIMEOUT") {
            Ok(value) => value.trim().parse().map_err(|e| AuthzError::Config {
                message: format!("invalid SHIPYARD_AUTHZ_TIMEOUT {:?}: {}", value, e),
            })?,
            Err(_) => default_timeout(),
        };

        Ok(Self {
            endpoint: std::env::var("SHIPYARD_AUTHZ_ENDPOINT")
                .unwrap_or_else(|_| default_endpoint()),
            token: std::env::var("SHIPYARD_AUTHZ_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            timeout_secs,
            ca_cert: std::env::var_os("SHIPYARD_AUTHZ_CA_CERT").map(PathBuf::from),
            consistency: if std::env::var("SHIPYARD_AUTHZ_FULLY_CONSISTENT")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false)
            {
                Consistency::FullyConsistent
            } else {
                Consistency::MinimizeLatency
            },
        })
    }

    /// Set the base URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_ca_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_cert = Some(path.into());
        self
    }

    pub fn with_consistency(mut self, consistency: Consistency) -> Self {
        self.consistency = consistency;
        self
    }
}

// ---------------------------------------------------------------------------
// Wire bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) enum ConsistencyBody {
    MinimizeLatency(bool),
    FullyConsistent(bool),
}

impl From<Consistency> for ConsistencyBody {
    fn from(c: Consistency) -> Self {
        match c {
            Consistency::MinimizeLatency => Self::MinimizeLatency(true),
            Consistency::FullyConsistent => Self::FullyConsistent(true),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckPermissionRequest<'a> {
    pub consistency: ConsistencyBody,
    pub resource: &'a ObjectRef,
    pub permission: &'a str,
    pub subject: &'a SubjectRef,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckPermissionResponse {
    /// Omitted on the wire when unspecified.
    #[serde(default)]
    pub permissionship: WirePermissionship,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) enum WirePermissionship {
    #[serde(rename = "PERMISSIONSHIP_HAS_PERMISSION")]
    HasPermission,
    #[serde(rename = "PERMISSIONSHIP_NO_PERMISSION")]
    NoPermission,
    #[serde(rename = "PERMISSIONSHIP_CONDITIONAL_PERMISSION")]
    ConditionalPermission,
    #[default]
    #[serde(other)]
    Unspecified,
}

impl From<WirePermissionship> for Permissionship {
    fn from(p: WirePermissionship) -> Self {
        match p {
            WirePermissionship::HasPermission => Self::HasPermission,
            WirePermissionship::NoPermission => Self::NoPermission,
            WirePermissionship::ConditionalPermission | WirePermissionship::Unspecified => {
                Self::Conditional
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) enum WireLookupPermissionship {
    #[serde(rename = "LOOKUP_PERMISSIONSHIP_HAS_PERMISSION")]
    HasPermission,
    #[serde(rename = "LOOKUP_PERMISSIONSHIP_CONDITIONAL_PERMISSION")]
    ConditionalPermission,
    #[default]
    #[serde(other)]
    Unspecified,
}

impl From<WireLookupPermissionship> for LookupPermissionship {
    fn from(p: WireLookupPermissionship) -> Self {
        match p {
            WireLookupPermissionship::HasPermission => Self::HasPermission,
            WireLookupPermissionship::ConditionalPermission => Self::ConditionalPermission,
            WireLookupPermissionship::Unspecified => Self::Unspecified,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RelationshipFilter<'a> {
    pub resource_type: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReadRelationshipsRequest<'a> {
    pub consistency: ConsistencyBody,
    pub relationship_filter: RelationshipFilter<'a>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReadRelationshipsResponse {
    pub relationship: Relationship,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LookupResourcesRequest<'a> {
    pub consistency: ConsistencyBody,
    pub resource_object_type: &'a str,
    pub permission: &'a str,
    pub subject: &'a SubjectRef,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LookupResourcesResponse {
    pub resource_object_id: String,
    #[serde(default)]
    pub permissionship: WireLookupPermissionship,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LookupSubjectsRequest<'a> {
    pub consistency: ConsistencyBody,
    pub resource: &'a ObjectRef,
    pub permission: &'a str,
    pub subject_object_type: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LookupSubjectsResponse {
    pub subject: ResolvedSubject,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResolvedSubject {
    pub subject_object_id: String,
    #[serde(default)]
    pub permissionship: WireLookupPermissionship,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExpandPermissionTreeRequest<'a> {
    pub consistency: ConsistencyBody,
    pub resource: &'a ObjectRef,
    pub permission: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReadSchemaRequest {}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReadSchemaResponse {
    #[serde(default)]
    pub schema_text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExportBulkRelationshipsRequest {
    pub consistency: ConsistencyBody,
    /// Relationships per stream chunk; the service default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional_limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExportBulkRelationshipsResponse {
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

/// Error body returned by the service (`google.rpc.Status`).
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RpcStatus {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// One line of a newline-delimited streaming response.
#[derive(Debug, Deserialize)]
pub(crate) struct StreamLine<T> {
    pub result: Option<T>,
    pub error: Option<RpcStatus>,
}
