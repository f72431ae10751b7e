use std::time::Duration;

use incluster_resolver::{AuthenticatedClient, HttpTransport, InClusterResolver};

use crate::{
    config::GetArgs,
    error::{CliError, CliResult},
};

/// Handle `incluster get`.
pub(crate) fn get_command(resolver: &InClusterResolver, args: &GetArgs) -> CliResult<()> {
    if !resolver.is_in_cluster() {
        return Err(CliError::NotInCluster);
    }

    let client = AuthenticatedClient::new()
        .with_timeout(Duration::from_secs(args.timeout))
        .with_interceptor(resolver.clone());

    let url = resolver.resolve_endpoint(&args.path);
    tracing::debug!(%url, "requesting");

    let response = client.get(&url).map_err(CliError::Request)?;

    if !response.status.is_success() {
        return Err(CliError::UnexpectedStatus {
            status: response.status.as_u16(),
            body: response.body,
        });
    }

    println!("{}", response.body);

    Ok(())
}
