//! Permission-check client for SpiceDB-compatible authorization services.
//!
//! This crate talks to the service's HTTP API and provides:
//!
//! - Typed references parsed from `type:id`, `type:id#relation` and
//!   `type:id#permission@type:id` strings
//! - A single permission check with a tri-state result, and a
//!   fail-loudly variant that turns anything but `HAS_PERMISSION` into an error
//! - Read-only exploration: relationships, full export, schema text,
//!   resource/subject lookups, and permission tree expansion rendered as
//!   JSON or GraphViz DOT
//!
//! # Quick Start
//!
//! ```no_run
//! use shipyard_authz::{AuthzClient, AuthzConfig, PermissionQuery};
//!
//! # async fn example() -> Result<(), shipyard_authz::AuthzError> {
//! let client = AuthzClient::new(
//!     AuthzConfig::default()
//!         .with_endpoint("https://localhost:8443")
//!         .with_token("my_laptop_dev"),
//! )?;
//!
//! let query: PermissionQuery = "starship_system:enterprise_bridge#operate@user:picard".parse()?;
//! client.require_permission(&query).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `SHIPYARD_AUTHZ_ENDPOINT` | Service base URL (default: `https://localhost:8443`) |
//! | `SHIPYARD_AUTHZ_TOKEN` | Bearer token |
//! | `SHIPYARD_AUTHZ_CA_CERT` | PEM file added as an extra trust root |
//! | `SHIPYARD_AUTHZ_TIMEOUT` | Request timeout in seconds (default: 30) |
//! | `SHIPYARD_AUTHZ_FULLY_CONSISTENT` | Use fully consistent reads |

pub mod client;
pub mod dot;
pub mod error;
pub mod reference;
pub mod tree;
pub mod types;

pub use client::AuthzClient;
pub use dot::{render_dot, DotOptions};
pub use error::{AuthzError, AuthzResult};
pub use reference::{ObjectRef, PermissionQuery, Relationship, SubjectRef};
pub use tree::{Operation, PermissionNode, PermissionTree};
pub use types::{AuthzConfig, Consistency, LookupPermissionship, Permissionship};
