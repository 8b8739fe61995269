use anyhow::Context;
use shipyard_core::{emit, load, EmitOptions};
use tracing::info;

use super::build_client;
use crate::cli::args::ConvertArgs;
use crate::exit_codes::SUCCESS;

/// Load → emit → optional permission check, in that order.
pub async fn run(args: ConvertArgs) -> anyhow::Result<i32> {
    let document = load(&args.path)?;

    let options = EmitOptions::default()
        .with_indent(args.indent)
        .with_ensure_ascii(!args.unicode);
    emit(&document, std::io::stdout().lock(), &options)?;

    let Some(query) = args.check else {
        return Ok(SUCCESS);
    };

    let client = build_client(&args.authz)?;
    client
        .require_permission(&query)
        .await
        .with_context(|| format!("permission check against {}", client.endpoint()))?;

    info!(query = %query, "permission granted");
    Ok(SUCCESS)
}
