use std::path::PathBuf;

use crate::{
    config::ResolverConfig,
    credentials,
    endpoint::{self, ClusterEndpoint},
    env::EnvContext,
    error::Result,
    identity::{self, PodIdentity},
};

/// Resolves everything a process needs to talk to the API server of the cluster it runs in.
///
/// Holds no state besides its configuration: the environment and the mounted files are read again
/// on every call, so a rotated token or a changed environment is always picked up.
#[derive(Debug, Clone, Default)]
pub struct InClusterResolver {
    config: ResolverConfig,
    context: EnvContext,
}

impl InClusterResolver {
    pub fn new(config: ResolverConfig, context: EnvContext) -> Self {
        Self { config, context }
    }

    /// Process environment, with the directory overrides applied.
    pub fn from_env() -> Self {
        let context = EnvContext::default();
        let config = ResolverConfig::from_context(&context);

        Self::new(config, context)
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn context(&self) -> &EnvContext {
        &self.context
    }

    pub fn is_in_cluster(&self) -> bool {
        endpoint::is_in_cluster(&self.context)
    }

    pub fn endpoint(&self) -> ClusterEndpoint {
        ClusterEndpoint::from_context(&self.context)
    }

    /// See [`ClusterEndpoint::url`].
    pub fn resolve_endpoint(&self, resource_path: &str) -> String {
        self.endpoint().url(resource_path)
    }

    pub fn read_token(&self) -> Result<String> {
        credentials::read_token(&self.config.service_account_dir)
    }

    pub fn ca_certificate_path(&self) -> PathBuf {
        credentials::ca_certificate_path(&self.config.service_account_dir)
    }

    pub fn pod_name(&self) -> String {
        identity::pod_name(&self.config, &self.context)
    }

    pub fn pod_namespace(&self) -> String {
        identity::pod_namespace(&self.config)
    }

    pub fn pod_identity(&self) -> PodIdentity {
        PodIdentity::resolve(&self.config, &self.context)
    }
}
