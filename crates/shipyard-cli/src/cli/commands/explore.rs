//! Read-only exploration of the authorization service.

use anyhow::Context;
use shipyard_authz::{render_dot, DotOptions};

use super::build_client;
use crate::cli::args::{
    ExpandArgs, ExpandFormat, ExportArgs, LookupResourcesArgs, LookupSubjectsArgs,
    RelationshipsArgs, SchemaArgs,
};
use crate::exit_codes::SUCCESS;

pub async fn relationships(args: RelationshipsArgs) -> anyhow::Result<i32> {
    let client = build_client(&args.authz)?;
    let relationships = client
        .read_relationships(&args.resource_type)
        .await
        .with_context(|| format!("reading {} relationships", args.resource_type))?;

    for relationship in relationships {
        println!("{}", relationship);
    }
    Ok(SUCCESS)
}

pub async fn export(args: ExportArgs) -> anyhow::Result<i32> {
    let client = build_client(&args.authz)?;
    let relationships = client
        .export_relationships(args.limit)
        .await
        .context("exporting relationships")?;

    for relationship in relationships {
        println!("{}", relationship);
    }
    Ok(SUCCESS)
}

pub async fn schema(args: SchemaArgs) -> anyhow::Result<i32> {
    let client = build_client(&args.authz)?;
    let schema = client.read_schema().await.context("reading schema")?;

    println!("{}", schema.trim_end());
    Ok(SUCCESS)
}

pub async fn lookup_resources(args: LookupResourcesArgs) -> anyhow::Result<i32> {
    let client = build_client(&args.authz)?;
    let found = client
        .lookup_resources(&args.resource_type, &args.permission, &args.subject)
        .await
        .with_context(|| {
            format!(
                "looking up {} resources with {} for {}",
                args.resource_type, args.permission, args.subject
            )
        })?;

    println!("{}", serde_json::to_string_pretty(&found)?);
    Ok(SUCCESS)
}

pub async fn lookup_subjects(args: LookupSubjectsArgs) -> anyhow::Result<i32> {
    let client = build_client(&args.authz)?;
    let found = client
        .lookup_subjects(&args.resource, &args.permission, &args.subject_type)
        .await
        .with_context(|| {
            format!(
                "looking up {} subjects with {} on {}",
                args.subject_type, args.permission, args.resource
            )
        })?;

    println!("{}", serde_json::to_string_pretty(&found)?);
    Ok(SUCCESS)
}

pub async fn expand(args: ExpandArgs) -> anyhow::Result<i32> {
    let client = build_client(&args.authz)?;
    let tree = client
        .expand_permission_tree(&args.resource, &args.permission)
        .await
        .with_context(|| format!("expanding {}#{}", args.resource, args.permission))?;

    let output = match args.format {
        ExpandFormat::Json if args.compact => serde_json::to_string(&tree)?,
        ExpandFormat::Json => serde_json::to_string_pretty(&tree)?,
        ExpandFormat::Dot => {
            let options = DotOptions {
                pretty: !args.compact,
                ..DotOptions::default()
            };
            render_dot(tree.as_slice(), &options)
        }
    };

    println!("{}", output);
    Ok(SUCCESS)
}
