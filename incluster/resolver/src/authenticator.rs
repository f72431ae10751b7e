use std::{collections::BTreeMap, fmt, path::PathBuf, time::Duration};

use tracing::Level;

use crate::{credentials::ServiceAccountCredential, error::Result, resolver::InClusterResolver};

pub const AUTHORIZATION_HEADER: &str = "authorization";

/// Arguments of an outbound request that interceptors may change before it is sent.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RequestArgs {
    pub headers: BTreeMap<String, String>,

    /// PEM bundle the transport should trust for this request.
    pub tls_certificate_authority: Option<PathBuf>,

    pub timeout: Option<Duration>,
}

impl fmt::Debug for RequestArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers = self
            .headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case(AUTHORIZATION_HEADER) {
                    (name, "<redacted>")
                } else {
                    (name, value.as_str())
                }
            })
            .collect::<BTreeMap<_, _>>();

        f.debug_struct("RequestArgs")
            .field("headers", &headers)
            .field("tls_certificate_authority", &self.tls_certificate_authority)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Pre-send hook of [`AuthenticatedClient`](crate::client::AuthenticatedClient).
///
/// Runs synchronously before the request is dispatched, and the request waits for it. An error
/// aborts the request.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, url: &str, args: RequestArgs) -> Result<RequestArgs>;
}

impl<F> RequestInterceptor for F
where
    F: Fn(&str, RequestArgs) -> Result<RequestArgs> + Send + Sync,
{
    fn intercept(&self, url: &str, args: RequestArgs) -> Result<RequestArgs> {
        self(url, args)
    }
}

impl InClusterResolver {
    /// Adds the service account bearer token and CA bundle to requests for the cluster API.
    ///
    /// Requests for anything else (or any request when not running in a cluster) are returned
    /// untouched, without reading any file. The token is read from disk on every call and a
    /// failure to read it is returned.
    #[tracing::instrument(level = Level::TRACE, skip(self, args))]
    pub fn authenticate(&self, url: &str, mut args: RequestArgs) -> Result<RequestArgs> {
        if !self.is_in_cluster() || !self.endpoint().matches(url) {
            return Ok(args);
        }

        let credential = ServiceAccountCredential::load(&self.config().service_account_dir)?;

        // Header names are case-insensitive, any spelling of `authorization` is replaced.
        args.headers
            .retain(|name, _| !name.eq_ignore_ascii_case(AUTHORIZATION_HEADER));
        args.headers
            .insert(AUTHORIZATION_HEADER.to_string(), credential.bearer());
        args.tls_certificate_authority = Some(credential.ca_cert_path);

        tracing::debug!("attached service account credentials");

        Ok(args)
    }
}

impl RequestInterceptor for InClusterResolver {
    fn intercept(&self, url: &str, args: RequestArgs) -> Result<RequestArgs> {
        self.authenticate(url, args)
    }
}
