use std::fmt;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::{client::HttpTransport, resolver::InClusterResolver};

const VERSION_PATH: &str = "/version";

/// Subset of the API server's `/version` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterVersionInfo {
    pub major: String,
    pub minor: String,
    pub git_version: String,
}

impl fmt::Display for ClusterVersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} ({})", self.major, self.minor, self.git_version)
    }
}

/// Asks the API server for its version.
///
/// Best effort, for diagnostics only: returns [`None`] outside a cluster and on any failure.
#[tracing::instrument(level = Level::TRACE, ret, skip_all)]
pub fn probe_version<T>(resolver: &InClusterResolver, transport: &T) -> Option<ClusterVersionInfo>
where
    T: HttpTransport + ?Sized,
{
    if !resolver.is_in_cluster() {
        return None;
    }

    let url = resolver.resolve_endpoint(VERSION_PATH);
    let response = transport
        .get(&url)
        .inspect_err(|error| tracing::warn!(%url, %error, "failed to probe cluster version"))
        .ok()?;

    if response.status != StatusCode::OK {
        tracing::debug!(%url, status = %response.status, "cluster version probe rejected");
        return None;
    }

    serde_json::from_str(&response.body)
        .inspect_err(|error| tracing::debug!(%url, %error, "unexpected cluster version response"))
        .ok()
}
