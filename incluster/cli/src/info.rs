use std::time::Duration;

use incluster_resolver::{AuthenticatedClient, DiagnosticsReport, InClusterResolver};
use prettytable::{row, Table};

use crate::{config::InfoArgs, error::CliResult};

fn render_table(report: &DiagnosticsReport) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Field", "Value", "Debug"]);

    for (_, field) in report.fields() {
        table.add_row(row![field.label, field.value, field.debug]);
    }

    table
}

/// Handle `incluster info`.
pub(crate) fn info_command(resolver: &InClusterResolver, args: &InfoArgs) -> CliResult<()> {
    let client = AuthenticatedClient::new()
        .with_timeout(Duration::from_secs(args.timeout))
        .with_interceptor(resolver.clone());

    let Some(report) = DiagnosticsReport::collect(resolver, &client) else {
        if args.json {
            println!("null");
        } else {
            println!("Not running inside a Kubernetes cluster.");
        }
        return Ok(());
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_table(&report).printstd();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use incluster_resolver::{
        endpoint::{SERVICE_HOST_ENV, SERVICE_PORT_ENV},
        EnvContext, HttpResponse, HttpTransport, ResolverConfig,
    };

    use super::*;

    struct Forbidden;

    impl HttpTransport for Forbidden {
        fn get(&self, _: &str) -> incluster_resolver::error::Result<HttpResponse> {
            Ok(HttpResponse {
                status: 403u16.try_into().unwrap(),
                body: String::new(),
            })
        }
    }

    #[test]
    fn table_has_a_row_per_field() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("namespace"), "shop").unwrap();

        let resolver = InClusterResolver::new(
            ResolverConfig {
                service_account_dir: root.path().to_owned(),
                podinfo_dir: root.path().join("podinfo"),
                hostname: Some("web-1.cluster.local".to_string()),
            },
            EnvContext::default()
                .strict_env(true)
                .override_envs([(SERVICE_HOST_ENV, "10.0.0.1"), (SERVICE_PORT_ENV, "443")]),
        );
        let report = DiagnosticsReport::collect(&resolver, &Forbidden).unwrap();

        let rendered = render_table(&report).to_string();

        assert_eq!(render_table(&report).len(), 4);
        assert!(rendered.contains("Pod Name"));
        assert!(rendered.contains("web-1"));
        assert!(rendered.contains("shop"));
        assert!(rendered.contains("Unknown"));
    }
}
