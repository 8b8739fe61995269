use clap::{Parser, Subcommand};
use std::path::PathBuf;

use shipyard_authz::{ObjectRef, PermissionQuery, SubjectRef};

pub mod common;
pub use common::*;

#[derive(Parser)]
#[command(
    name = "shipyard",
    version,
    about = "Convert spaceship YAML to sorted JSON and check permissions against a SpiceDB-compatible service"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print a YAML file as sorted, pretty-printed JSON
    Convert(ConvertArgs),
    /// Check one permission; exits 1 unless it is granted
    Check(CheckArgs),
    /// List relationships of a resource type
    Relationships(RelationshipsArgs),
    /// Resources of a type on which a subject has a permission
    LookupResources(LookupResourcesArgs),
    /// Subjects of a type that have a permission on a resource
    LookupSubjects(LookupSubjectsArgs),
    /// Expand a permission into its tree (JSON or GraphViz DOT)
    Expand(ExpandArgs),
    /// Dump every stored relationship
    Export(ExportArgs),
    /// Print the stored schema
    Schema(SchemaArgs),
}

#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// YAML file to convert ("-" reads stdin)
    #[arg(env = "SHIPYARD_INPUT")]
    pub path: PathBuf,

    /// Spaces per indentation level
    #[arg(long, default_value_t = shipyard_core::DEFAULT_INDENT)]
    pub indent: usize,

    /// Write non-ASCII characters as-is instead of \uXXXX escapes
    #[arg(long)]
    pub unicode: bool,

    /// After printing, require this permission (type:id#permission@type:id[#relation])
    #[arg(long, value_name = "QUERY")]
    pub check: Option<PermissionQuery>,

    #[command(flatten)]
    pub authz: AuthzArgs,
}

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// type:id#permission@type:id[#relation]
    pub query: PermissionQuery,

    #[command(flatten)]
    pub authz: AuthzArgs,
}

#[derive(clap::Args, Debug)]
pub struct RelationshipsArgs {
    /// Resource type, e.g. starship
    pub resource_type: String,

    #[command(flatten)]
    pub authz: AuthzArgs,
}

#[derive(clap::Args, Debug)]
pub struct LookupResourcesArgs {
    pub resource_type: String,

    pub permission: String,

    /// type:id[#relation]
    pub subject: SubjectRef,

    #[command(flatten)]
    pub authz: AuthzArgs,
}

#[derive(clap::Args, Debug)]
pub struct LookupSubjectsArgs {
    /// type:id
    pub resource: ObjectRef,

    pub permission: String,

    pub subject_type: String,

    #[command(flatten)]
    pub authz: AuthzArgs,
}

#[derive(clap::Args, Debug)]
pub struct ExpandArgs {
    /// type:id
    pub resource: ObjectRef,

    pub permission: String,

    #[arg(long, value_enum, default_value_t)]
    pub format: ExpandFormat,

    /// Single-line output (no indentation)
    #[arg(long)]
    pub compact: bool,

    #[command(flatten)]
    pub authz: AuthzArgs,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Relationships per streamed chunk (service default when unset)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: Option<u32>,

    #[command(flatten)]
    pub authz: AuthzArgs,
}

#[derive(clap::Args, Debug)]
pub struct SchemaArgs {
    #[command(flatten)]
    pub authz: AuthzArgs,
}
