#![warn(clippy::indexing_slicing)]

//! Kubernetes credentials for processes running inside a pod.
//!
//! [`InClusterResolver`] finds the API server from `KUBERNETES_SERVICE_HOST` and
//! `KUBERNETES_SERVICE_PORT`, and acts as a [`RequestInterceptor`] that adds the mounted service
//! account token and CA bundle to requests for that server. Compose it into an
//! [`AuthenticatedClient`]:
//!
//! ```no_run
//! use incluster_resolver::{AuthenticatedClient, HttpTransport, InClusterResolver};
//!
//! let resolver = InClusterResolver::from_env();
//! let client = AuthenticatedClient::new().with_interceptor(resolver.clone());
//!
//! let response = client.get(&resolver.resolve_endpoint("/api/v1/namespaces"))?;
//! # Ok::<(), incluster_resolver::error::ResolverError>(())
//! ```

pub mod authenticator;
pub mod client;
pub mod config;
pub mod credentials;
pub mod diagnostics;
pub mod endpoint;
pub mod env;
pub mod error;
pub mod identity;
mod resolver;
pub mod version;

pub use authenticator::{RequestArgs, RequestInterceptor};
pub use client::{AuthenticatedClient, HttpResponse, HttpTransport};
pub use config::ResolverConfig;
pub use diagnostics::DiagnosticsReport;
pub use endpoint::ClusterEndpoint;
pub use env::EnvContext;
pub use identity::PodIdentity;
pub use resolver::InClusterResolver;
pub use version::ClusterVersionInfo;
