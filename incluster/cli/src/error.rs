use incluster_resolver::error::ResolverError;
use miette::Diagnostic;
use thiserror::Error;

pub(crate) type CliResult<T, E = CliError> = core::result::Result<T, E>;

const NOT_IN_CLUSTER_HELP: &str = "KUBERNETES_SERVICE_HOST and KUBERNETES_SERVICE_PORT are set \
    by Kubernetes in every container. Make sure this runs inside a pod, or set both to point at a \
    test cluster.";

#[derive(Debug, Error, Diagnostic)]
pub(crate) enum CliError {
    #[error("Failed to load resolver config: {0}")]
    #[diagnostic(help("The config file must be json (.json or no extension) or yaml (.yaml, .yml)."))]
    ConfigFile(ResolverError),

    #[error("Not running inside a Kubernetes cluster")]
    #[diagnostic(help("{NOT_IN_CLUSTER_HELP}"))]
    NotInCluster,

    #[error("Request to the cluster API server failed: {0}")]
    #[diagnostic(help(
        "Check that the service account token and ca.crt are mounted, \
         or point --service-account-dir at them."
    ))]
    Request(ResolverError),

    #[error("Cluster API server answered with status {status}: {body}")]
    #[diagnostic(help(
        "A 401/403 usually means the service account lacks RBAC permissions for this path."
    ))]
    UnexpectedStatus { status: u16, body: String },

    #[error("Failed to serialize diagnostics report: {0}")]
    Serialize(#[from] serde_json::Error),
}
