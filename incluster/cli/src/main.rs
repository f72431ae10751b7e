use clap::Parser;
use incluster_resolver::EnvContext;

mod config;
mod error;
mod info;
mod logging;
mod request;

use config::{Cli, Commands};
use error::CliResult;

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    logging::init_tracing_registry();

    let resolver = cli.resolver.resolver(EnvContext::default())?;

    let res: CliResult<()> = match cli.commands {
        Commands::Check => {
            if resolver.is_in_cluster() {
                println!("running in cluster, API server at {}", resolver.endpoint());
            } else {
                println!("not running in a cluster");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Endpoint { path } => {
            if !resolver.is_in_cluster() {
                tracing::warn!("not running in a cluster, the endpoint is incomplete");
            }
            println!("{}", resolver.resolve_endpoint(path.as_deref().unwrap_or_default()));
            Ok(())
        }
        Commands::Info(args) => info::info_command(&resolver, &args),
        Commands::Get(args) => request::get_command(&resolver, &args),
    };

    Ok(res?)
}
