use serde::Serialize;
use serde_json::Value;

use crate::{client::HttpTransport, resolver::InClusterResolver, version};

const UNKNOWN: &str = "Unknown";
const UNAVAILABLE: &str = "unavailable";

/// One entry of the report: a human readable `value` and a machine readable `debug` value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticField {
    pub label: &'static str,
    pub value: String,
    pub debug: Value,
}

/// What we know about the cluster and the pod, for support/debug screens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticsReport {
    pub kubernetes: DiagnosticField,
    pub pod_name: DiagnosticField,
    pub pod_namespace: DiagnosticField,
}

impl DiagnosticsReport {
    /// [`None`] when not running in a cluster. Never fails, anything that can't be resolved is
    /// reported as unknown.
    pub fn collect<T>(resolver: &InClusterResolver, transport: &T) -> Option<Self>
    where
        T: HttpTransport + ?Sized,
    {
        if !resolver.is_in_cluster() {
            return None;
        }

        let version = version::probe_version(resolver, transport);
        let kubernetes = DiagnosticField {
            label: "Kubernetes",
            value: version
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| UNKNOWN.to_string()),
            debug: serde_json::to_value(&version).unwrap_or_default(),
        };

        let pod_name = pod_name_field(resolver.pod_name());

        let namespace = resolver.pod_namespace();
        let pod_namespace = DiagnosticField {
            label: "Pod Namespace",
            debug: namespace.clone().into(),
            value: namespace,
        };

        Some(Self {
            kubernetes,
            pod_name,
            pod_namespace,
        })
    }

    pub fn fields(&self) -> [(&'static str, &DiagnosticField); 3] {
        [
            ("kubernetes", &self.kubernetes),
            ("pod_name", &self.pod_name),
            ("pod_namespace", &self.pod_namespace),
        ]
    }
}

fn pod_name_field(name: String) -> DiagnosticField {
    if name.is_empty() {
        DiagnosticField {
            label: "Pod Name",
            value: UNKNOWN.to_string(),
            debug: UNAVAILABLE.into(),
        }
    } else {
        DiagnosticField {
            label: "Pod Name",
            debug: name.clone().into(),
            value: name,
        }
    }
}
