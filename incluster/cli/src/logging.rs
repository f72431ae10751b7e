use tracing_subscriber::{prelude::*, EnvFilter};

/// Logs go to stderr so command output on stdout stays machine readable.
pub(crate) fn init_tracing_registry() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();
}
