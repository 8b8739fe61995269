use anyhow::Context;
use tracing::warn;

use super::build_client;
use crate::cli::args::CheckArgs;
use crate::exit_codes::{PERMISSION_DENIED, SUCCESS};

/// Print the permissionship; anything but HAS_PERMISSION exits non-zero.
pub async fn run(args: CheckArgs) -> anyhow::Result<i32> {
    let client = build_client(&args.authz)?;
    let permissionship = client
        .check_permission(&args.query)
        .await
        .with_context(|| format!("permission check against {}", client.endpoint()))?;

    println!("{}", permissionship);

    if permissionship.is_granted() {
        Ok(SUCCESS)
    } else {
        warn!(query = %args.query, permissionship = %permissionship, "permission not granted");
        eprintln!("permission denied: {} returned {}", args.query, permissionship);
        Ok(PERMISSION_DENIED)
    }
}
