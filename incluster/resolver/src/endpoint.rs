use std::fmt;

use crate::env::EnvContext;

pub const SERVICE_HOST_ENV: &str = "KUBERNETES_SERVICE_HOST";
pub const SERVICE_PORT_ENV: &str = "KUBERNETES_SERVICE_PORT";

const DEFAULT_HTTPS_PORT: &str = "443";

/// Whether the process runs inside a pod, i.e. both [`SERVICE_HOST_ENV`] and [`SERVICE_PORT_ENV`]
/// are set and non-empty.
pub fn is_in_cluster(context: &EnvContext) -> bool {
    context.get_non_empty(SERVICE_HOST_ENV).is_some()
        && context.get_non_empty(SERVICE_PORT_ENV).is_some()
}

/// Base address of the cluster API server, as injected by Kubernetes into every pod.
///
/// Always built from the current environment, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterEndpoint {
    host: String,
    port: Option<String>,
}

impl ClusterEndpoint {
    pub const SCHEME: &'static str = "https";

    pub fn new<H: Into<String>>(host: H, port: Option<String>) -> Self {
        Self {
            host: host.into(),
            port: port.filter(|port| !port.is_empty()),
        }
    }

    /// Reads [`SERVICE_HOST_ENV`] and [`SERVICE_PORT_ENV`]. Missing variables produce an empty
    /// host or no port, so the caller should check [`is_in_cluster`] first.
    pub fn from_context(context: &EnvContext) -> Self {
        Self::new(
            context.get_env(SERVICE_HOST_ENV).unwrap_or_default(),
            context.get_env(SERVICE_PORT_ENV).ok(),
        )
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<&str> {
        self.port.as_deref()
    }

    /// `https://{host}[:{port}]`, without a trailing slash.
    ///
    /// The port is left out when it is the default https port.
    pub fn base_url(&self) -> String {
        let mut url = format!("{}://", Self::SCHEME);

        // IPv6 service hosts have to be bracketed to form a valid authority.
        if self.host.contains(':') && !self.host.starts_with('[') {
            url.push('[');
            url.push_str(&self.host);
            url.push(']');
        } else {
            url.push_str(&self.host);
        }

        if let Some(port) = self.port().filter(|port| *port != DEFAULT_HTTPS_PORT) {
            url.push(':');
            url.push_str(port);
        }

        url
    }

    /// Address of `resource_path` on the API server. Leading slashes are stripped, so both
    /// `"/version"` and `"version"` resolve to the same URL.
    pub fn url(&self, resource_path: &str) -> String {
        let base = self.base_url();
        let resource_path = resource_path.trim_start_matches('/');

        if resource_path.is_empty() {
            base
        } else {
            format!("{base}/{resource_path}")
        }
    }

    /// Whether `url` points at this API server.
    ///
    /// `url` has to start with [`Self::base_url`] exactly, and whatever follows has to begin a
    /// path, query or fragment, so `https://10.0.0.1.evil.com` does not match `https://10.0.0.1`.
    /// When the port is the default one, `https://10.0.0.1:443/...` matches as well.
    pub fn matches(&self, url: &str) -> bool {
        let Some(mut rest) = url.strip_prefix(&self.base_url()) else {
            return false;
        };

        if !matches!(self.port(), Some(port) if port != DEFAULT_HTTPS_PORT) {
            rest = rest
                .strip_prefix(':')
                .and_then(|rest| rest.strip_prefix(DEFAULT_HTTPS_PORT))
                .unwrap_or(rest);
        }

        rest.is_empty() || rest.starts_with(['/', '?', '#'])
    }
}

impl fmt::Display for ClusterEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url())
    }
}
