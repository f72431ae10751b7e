use std::path::Path;

use serde::Serialize;
use tracing::Level;

use crate::{config::ResolverConfig, env::EnvContext};

const NAME_FILE: &str = "name";
const NAMESPACE_FILE: &str = "namespace";
const HOSTNAME_ENV: &str = "HOSTNAME";

/// Name and namespace of the pod we run in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PodIdentity {
    pub name: String,
    pub namespace: String,
}

impl PodIdentity {
    pub fn resolve(config: &ResolverConfig, context: &EnvContext) -> Self {
        Self {
            name: pod_name(config, context),
            namespace: pod_namespace(config),
        }
    }
}

/// Any failure counts as a missing file.
fn read_optional(path: &Path) -> Option<String> {
    std::fs::read_to_string(path)
        .inspect_err(|error| tracing::trace!(?path, %error, "pod info file not readable"))
        .ok()
}

/// Pod name from the downward API, falling back to the hostname.
///
/// Kubernetes sets the hostname to the pod name unless the pod spec says otherwise, so the
/// fallback is right for most pods that don't mount pod info.
#[tracing::instrument(level = Level::TRACE, ret, skip(context))]
pub fn pod_name(config: &ResolverConfig, context: &EnvContext) -> String {
    if let Some(name) = read_optional(&config.podinfo_path(NAME_FILE)).filter(|name| !name.is_empty())
    {
        return name;
    }

    let hostname = config
        .hostname
        .clone()
        .filter(|hostname| !hostname.is_empty())
        .or_else(|| gethostname::gethostname().into_string().ok())
        .filter(|hostname| !hostname.is_empty())
        .or_else(|| context.get_non_empty(HOSTNAME_ENV))
        .unwrap_or_default();

    // only the first label of an eventual FQDN
    match hostname.split_once('.') {
        Some((name, _)) => name.to_string(),
        None => hostname,
    }
}

/// Pod namespace from the downward API, then from the service account mount (present whenever a
/// service account token is mounted), then empty.
#[tracing::instrument(level = Level::TRACE, ret)]
pub fn pod_namespace(config: &ResolverConfig) -> String {
    read_optional(&config.podinfo_path(NAMESPACE_FILE))
        .or_else(|| read_optional(&config.service_account_path(NAMESPACE_FILE)))
        .unwrap_or_default()
}
