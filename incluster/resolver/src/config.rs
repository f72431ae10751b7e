use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    env::EnvContext,
    error::{ResolverError, Result},
};

/// Where Kubernetes mounts the pod's service account secret.
///
/// <https://kubernetes.io/docs/tasks/run-application/access-api-from-pod/>
pub const DEFAULT_SERVICE_ACCOUNT_DIR: &str = "/var/run/secrets/kubernetes.io/serviceaccount";

/// Where the pod info is expected to be mounted. This is not available by default, the pod spec
/// has to mount it with the downward API.
///
/// <https://kubernetes.io/docs/concepts/workloads/pods/downward-api/>
pub const DEFAULT_PODINFO_DIR: &str = "/etc/podinfo";

/// Overrides [`ResolverConfig::service_account_dir`].
pub const SERVICE_ACCOUNT_DIR_ENV: &str = "INCLUSTER_SERVICE_ACCOUNT_DIR";

/// Overrides [`ResolverConfig::podinfo_dir`].
pub const PODINFO_DIR_ENV: &str = "INCLUSTER_PODINFO_DIR";

/// Filesystem layout used by [`InClusterResolver`](crate::InClusterResolver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Directory holding `token`, `ca.crt` and `namespace`.
    pub service_account_dir: PathBuf,

    /// Directory holding the downward API `name` and `namespace` files.
    pub podinfo_dir: PathBuf,

    /// Used instead of the system hostname when the pod name is not mounted.
    pub hostname: Option<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            service_account_dir: PathBuf::from(DEFAULT_SERVICE_ACCOUNT_DIR),
            podinfo_dir: PathBuf::from(DEFAULT_PODINFO_DIR),
            hostname: None,
        }
    }
}

impl ResolverConfig {
    /// Default layout with [`SERVICE_ACCOUNT_DIR_ENV`] and [`PODINFO_DIR_ENV`] applied.
    pub fn from_context(context: &EnvContext) -> Self {
        Self::default().with_env_overrides(context)
    }

    pub fn with_env_overrides(mut self, context: &EnvContext) -> Self {
        if let Some(dir) = context.get_non_empty(SERVICE_ACCOUNT_DIR_ENV) {
            self.service_account_dir = dir.into();
        }

        if let Some(dir) = context.get_non_empty(PODINFO_DIR_ENV) {
            self.podinfo_dir = dir.into();
        }

        self
    }

    /// Loads the config from a json or yaml file, picked by extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ResolverError::ConfigRead {
            path: path.to_owned(),
            source,
        })?;

        match path.extension().and_then(OsStr::to_str) {
            // No Extension? assume json
            Some("json") | None => Ok(serde_json::from_str::<Self>(&contents)?),
            Some("yaml" | "yml") => Ok(serde_yaml::from_str::<Self>(&contents)?),
            ext => Err(ResolverError::UnsupportedFormat(ext.map(String::from))),
        }
    }

    pub fn service_account_path(&self, file: &str) -> PathBuf {
        self.service_account_dir.join(file)
    }

    pub fn podinfo_path(&self, file: &str) -> PathBuf {
        self.podinfo_dir.join(file)
    }
}
