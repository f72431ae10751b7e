use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};
use incluster_resolver::{EnvContext, InClusterResolver, ResolverConfig};

use crate::error::{CliError, CliResult};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about,
    long_about = r#"
Resolves the Kubernetes API server, service account credentials and pod identity of the pod this
runs in. Set RUST_LOG (e.g. RUST_LOG=incluster_resolver=trace) to see what is being read."#
)]
pub(super) struct Cli {
    #[command(flatten)]
    pub(super) resolver: ResolverArgs,

    #[command(subcommand)]
    pub(super) commands: Commands,
}

#[derive(Debug, Subcommand)]
pub(super) enum Commands {
    /// Exit with 0 when running inside a Kubernetes pod, 1 otherwise.
    Check,

    /// Print the URL of the cluster API server, optionally of a resource on it.
    Endpoint {
        /// Resource path, e.g. `/version`.
        path: Option<String>,
    },

    /// Print the cluster version and pod identity.
    Info(InfoArgs),

    /// GET a path from the cluster API server with the service account credentials.
    Get(GetArgs),
}

#[derive(Debug, Args)]
pub(super) struct InfoArgs {
    /// Print the report as json instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Timeout in seconds for the version request.
    #[arg(long, default_value_t = 5)]
    pub timeout: u64,
}

#[derive(Debug, Args)]
pub(super) struct GetArgs {
    /// Resource path, e.g. `/api/v1/namespaces/default/pods`.
    pub path: String,

    /// Timeout in seconds for the request.
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}

/// Where the resolver looks for mounted files.
///
/// Precedence, lowest first: defaults or `--config-file`, then `INCLUSTER_SERVICE_ACCOUNT_DIR` /
/// `INCLUSTER_PODINFO_DIR`, then the flags below.
#[derive(Debug, Default, Args)]
pub(super) struct ResolverArgs {
    /// Resolver config file, json or yaml.
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config_file: Option<PathBuf>,

    /// Directory where the service account secret is mounted.
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub service_account_dir: Option<PathBuf>,

    /// Directory where the downward API pod info is mounted.
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub podinfo_dir: Option<PathBuf>,

    /// Hostname to use when the pod name is not mounted.
    #[arg(long, global = true)]
    pub hostname: Option<String>,
}

impl ResolverArgs {
    pub(super) fn resolver(&self, context: EnvContext) -> CliResult<InClusterResolver> {
        let config = match &self.config_file {
            Some(path) => ResolverConfig::from_path(path).map_err(CliError::ConfigFile)?,
            None => ResolverConfig::default(),
        };

        let mut config = config.with_env_overrides(&context);

        if let Some(dir) = &self.service_account_dir {
            config.service_account_dir = dir.clone();
        }
        if let Some(dir) = &self.podinfo_dir {
            config.podinfo_dir = dir.clone();
        }
        if let Some(hostname) = &self.hostname {
            config.hostname = Some(hostname.clone());
        }

        Ok(InClusterResolver::new(config, context))
    }
}
