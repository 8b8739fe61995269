use super::args::*;

pub mod check;
pub mod convert;
pub mod explore;

use anyhow::Context;
use shipyard_authz::AuthzClient;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Convert(args) => convert::run(args).await,
        Command::Check(args) => check::run(args).await,
        Command::Relationships(args) => explore::relationships(args).await,
        Command::LookupResources(args) => explore::lookup_resources(args).await,
        Command::LookupSubjects(args) => explore::lookup_subjects(args).await,
        Command::Expand(args) => explore::expand(args).await,
        Command::Export(args) => explore::export(args).await,
        Command::Schema(args) => explore::schema(args).await,
    }
}

pub(crate) fn build_client(authz: &AuthzArgs) -> anyhow::Result<AuthzClient> {
    let config = authz.to_config();
    tracing::debug!(config = ?config, "authorization client config");
    AuthzClient::new(config).context("failed to set up authorization client")
}
