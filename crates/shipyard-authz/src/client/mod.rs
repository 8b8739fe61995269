//! Authorization service client.
//!
//! Public API: no status code knowledge. All HTTP/status mapping in http.rs.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, info, warn};

use crate::error::{AuthzError, AuthzResult};
use crate::reference::{ObjectRef, PermissionQuery, Relationship, SubjectRef};
use crate::tree::{PermissionNode, PermissionTree};
use crate::types::{
    AuthzConfig, CheckPermissionRequest, CheckPermissionResponse, ExpandPermissionTreeRequest,
    ExportBulkRelationshipsRequest, ExportBulkRelationshipsResponse, LookupPermissionship,
    LookupResourcesRequest, LookupResourcesResponse, LookupSubjectsRequest,
    LookupSubjectsResponse, Permissionship, ReadRelationshipsRequest, ReadRelationshipsResponse,
    ReadSchemaRequest, ReadSchemaResponse, RelationshipFilter,
};

mod helpers;
mod http;

use http::HttpBackend;

const USER_AGENT_VALUE: &str = concat!("shipyard-authz/", env!("CARGO_PKG_VERSION"));

/// Client for a SpiceDB-compatible HTTP API.
#[derive(Debug, Clone)]
pub struct AuthzClient {
    http: HttpBackend,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpandResponse {
    #[serde(default)]
    tree_root: Option<PermissionTree>,
}

impl AuthzClient {
    pub fn new(config: AuthzConfig) -> AuthzResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers);

        if let Some(path) = &config.ca_cert {
            let pem = std::fs::read(path).map_err(|e| AuthzError::Config {
                message: format!("failed to read CA certificate {}: {}", path.display(), e),
            })?;
            let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| AuthzError::Config {
                message: format!("invalid CA certificate {}: {}", path.display(), e),
            })?;
            builder = builder.add_root_certificate(cert);
        }

        let client = builder.build().map_err(|e| AuthzError::Config {
            message: format!("failed to create HTTP client: {}", e),
        })?;

        let base_url = config.endpoint.trim_end_matches('/').to_string();
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(AuthzError::Config {
                message: format!("endpoint must be an http(s) URL: {}", config.endpoint),
            });
        }

        Ok(Self {
            http: HttpBackend {
                client,
                base_url,
                config,
            },
        })
    }

    pub fn from_env() -> AuthzResult<Self> {
        Self::new(AuthzConfig::from_env()?)
    }

    /// Base URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.http.base_url
    }

    /// Check a single permission.
    ///
    /// `PERMISSIONSHIP_UNSPECIFIED` (or any unknown value) is reported as
    /// [`Permissionship::Conditional`].
    pub async fn check_permission(&self, query: &PermissionQuery) -> AuthzResult<Permissionship> {
        debug!(query = %query, "checking permission");

        let request = CheckPermissionRequest {
            consistency: self.http.config.consistency.into(),
            resource: &query.resource,
            permission: &query.permission,
            subject: &query.subject,
        };
        let response: CheckPermissionResponse = self
            .http
            .post_json("/v1/permissions/check", &request)
            .await?;

        let permissionship = Permissionship::from(response.permissionship);
        info!(query = %query, permissionship = %permissionship, "permission checked");
        Ok(permissionship)
    }

    /// Check a permission and fail unless it is granted.
    pub async fn require_permission(&self, query: &PermissionQuery) -> AuthzResult<()> {
        let permissionship = self.check_permission(query).await?;
        if permissionship.is_granted() {
            return Ok(());
        }

        warn!(query = %query, permissionship = %permissionship, "permission denied");
        Err(AuthzError::PermissionDenied {
            query: query.clone(),
            permissionship,
        })
    }

    /// All stored relationships whose resource is of `resource_type`.
    pub async fn read_relationships(&self, resource_type: &str) -> AuthzResult<Vec<Relationship>> {
        debug!(resource_type, "reading relationships");

        let request = ReadRelationshipsRequest {
            consistency: self.http.config.consistency.into(),
            relationship_filter: RelationshipFilter { resource_type },
        };
        let lines: Vec<ReadRelationshipsResponse> = self
            .http
            .post_stream("/v1/relationships/read", &request)
            .await?;

        Ok(lines.into_iter().map(|l| l.relationship).collect())
    }

    /// Every stored relationship, in the order the service streams them.
    ///
    /// `limit` caps the relationships per streamed chunk, not the total.
    pub async fn export_relationships(
        &self,
        limit: Option<u32>,
    ) -> AuthzResult<Vec<Relationship>> {
        debug!(?limit, "exporting relationships");

        let request = ExportBulkRelationshipsRequest {
            consistency: self.http.config.consistency.into(),
            optional_limit: limit,
        };
        let chunks: Vec<ExportBulkRelationshipsResponse> = self
            .http
            .post_stream("/v1/relationships/exportbulk", &request)
            .await?;

        Ok(chunks
            .into_iter()
            .flat_map(|chunk| chunk.relationships)
            .collect())
    }

    /// Schema text currently stored in the service.
    pub async fn read_schema(&self) -> AuthzResult<String> {
        debug!("reading schema");

        let response: ReadSchemaResponse = self
            .http
            .post_json("/v1/schemas/read", &ReadSchemaRequest {})
            .await?;
        Ok(response.schema_text)
    }

    /// Ids of `resource_type` objects on which `subject` has `permission`.
    pub async fn lookup_resources(
        &self,
        resource_type: &str,
        permission: &str,
        subject: &SubjectRef,
    ) -> AuthzResult<BTreeMap<String, LookupPermissionship>> {
        debug!(resource_type, permission, subject = %subject, "looking up resources");

        let request = LookupResourcesRequest {
            consistency: self.http.config.consistency.into(),
            resource_object_type: resource_type,
            permission,
            subject,
        };
        let lines: Vec<LookupResourcesResponse> = self
            .http
            .post_stream("/v1/permissions/resources", &request)
            .await?;

        Ok(lines
            .into_iter()
            .map(|l| (l.resource_object_id, l.permissionship.into()))
            .collect())
    }

    /// Ids of `subject_type` subjects that have `permission` on `resource`.
    pub async fn lookup_subjects(
        &self,
        resource: &ObjectRef,
        permission: &str,
        subject_type: &str,
    ) -> AuthzResult<BTreeMap<String, LookupPermissionship>> {
        debug!(resource = %resource, permission, subject_type, "looking up subjects");

        let request = LookupSubjectsRequest {
            consistency: self.http.config.consistency.into(),
            resource,
            permission,
            subject_object_type: subject_type,
        };
        let lines: Vec<LookupSubjectsResponse> = self
            .http
            .post_stream("/v1/permissions/subjects", &request)
            .await?;

        Ok(lines
            .into_iter()
            .map(|l| (l.subject.subject_object_id, l.subject.permissionship.into()))
            .collect())
    }

    /// Expand `permission` on `resource` into a simplified tree.
    ///
    /// `None` when the service returns no tree.
    pub async fn expand_permission_tree(
        &self,
        resource: &ObjectRef,
        permission: &str,
    ) -> AuthzResult<Option<PermissionNode>> {
        debug!(resource = %resource, permission, "expanding permission tree");

        let request = ExpandPermissionTreeRequest {
            consistency: self.http.config.consistency.into(),
            resource,
            permission,
        };
        let response: ExpandResponse = self
            .http
            .post_json("/v1/permissions/expand", &request)
            .await?;

        Ok(response.tree_root.as_ref().map(PermissionTree::simplify))
    }
}
