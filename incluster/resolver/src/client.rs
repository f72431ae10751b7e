use std::{fmt, sync::Arc, time::Duration};

use reqwest::{
    blocking::Client,
    header::{HeaderMap, HeaderName, HeaderValue},
    Certificate, StatusCode,
};
use tracing::Level;

use crate::{
    authenticator::{RequestArgs, RequestInterceptor},
    error::{ResolverError, Result},
};

/// Status and body of a completed GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Anything that can perform a blocking GET. Lets the version probe run against a fake server.
pub trait HttpTransport {
    fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// Blocking HTTP client that passes every request through its [`RequestInterceptor`]s, in the
/// order they were added, before sending it.
#[derive(Clone, Default)]
pub struct AuthenticatedClient {
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
    timeout: Option<Duration>,
}

impl fmt::Debug for AuthenticatedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("interceptors", &self.interceptors.len())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AuthenticatedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interceptor<I: RequestInterceptor + 'static>(mut self, interceptor: I) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Runs the interceptor chain for `url` on fresh [`RequestArgs`].
    pub fn prepare(&self, url: &str) -> Result<RequestArgs> {
        let args = RequestArgs {
            timeout: self.timeout,
            ..Default::default()
        };

        self.interceptors
            .iter()
            .try_fold(args, |args, interceptor| interceptor.intercept(url, args))
    }

    /// The CA bundle is loaded from disk on every request, matching how the token is handled.
    fn build_client(args: &RequestArgs) -> Result<Client> {
        let mut builder = Client::builder();

        if let Some(path) = &args.tls_certificate_authority {
            let pem = std::fs::read(path).map_err(|source| ResolverError::CaCertificateRead {
                path: path.clone(),
                source,
            })?;
            let certificate =
                Certificate::from_pem(&pem).map_err(|source| ResolverError::CaCertificate {
                    path: path.clone(),
                    source,
                })?;

            builder = builder.add_root_certificate(certificate);
        }

        if let Some(timeout) = args.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(builder.build()?)
    }

    fn headers(args: &RequestArgs) -> Result<HeaderMap> {
        args.headers
            .iter()
            .map(|(name, value)| {
                let header_name = HeaderName::from_bytes(name.as_bytes())
                    .map_err(|_| ResolverError::InvalidHeader(name.clone()))?;
                let header_value = HeaderValue::from_str(value)
                    .map_err(|_| ResolverError::InvalidHeader(name.clone()))?;

                Ok((header_name, header_value))
            })
            .collect()
    }
}

impl HttpTransport for AuthenticatedClient {
    #[tracing::instrument(level = Level::TRACE, skip(self), err(level = Level::DEBUG))]
    fn get(&self, url: &str) -> Result<HttpResponse> {
        let args = self.prepare(url)?;
        let client = Self::build_client(&args)?;

        let response = client.get(url).headers(Self::headers(&args)?).send()?;
        let status = response.status();
        let body = response.text()?;

        tracing::trace!(%status, "request finished");

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::BTreeMap,
        io::{BufRead, BufReader, Write},
        net::TcpListener,
        thread::{self, JoinHandle},
    };

    use super::*;
    use crate::{
        config::ResolverConfig,
        endpoint::{SERVICE_HOST_ENV, SERVICE_PORT_ENV},
        env::EnvContext,
        resolver::InClusterResolver,
    };

    const CLUSTER_CA: &str = include_str!("../testdata/ca.crt");

    fn add_header(name: &'static str, value: &'static str) -> impl RequestInterceptor {
        move |_: &str, mut args: RequestArgs| -> Result<RequestArgs> {
            args.headers.insert(name.to_string(), value.to_string());
            Ok(args)
        }
    }

    #[test]
    fn interceptors_run_in_order() {
        let client = AuthenticatedClient::new()
            .with_timeout(Duration::from_secs(3))
            .with_interceptor(add_header("x-order", "first"))
            .with_interceptor(add_header("x-order", "second"))
            .with_interceptor(add_header("accept", "application/json"));

        let args = client.prepare("https://10.0.0.1/version").unwrap();

        assert_eq!(
            args.headers,
            BTreeMap::from([
                ("accept".to_string(), "application/json".to_string()),
                ("x-order".to_string(), "second".to_string()),
            ])
        );
        assert_eq!(args.timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn interceptor_error_stops_the_chain() {
        let client = AuthenticatedClient::new()
            .with_interceptor(|_: &str, _: RequestArgs| -> Result<RequestArgs> {
                Err(ResolverError::InvalidHeader("broken".to_string()))
            })
            .with_interceptor(add_header("x-after", "never"));

        assert!(matches!(
            client.prepare("https://10.0.0.1"),
            Err(ResolverError::InvalidHeader(name)) if name == "broken"
        ));
    }

    #[test]
    fn invalid_header_value_is_rejected() {
        let mut args = RequestArgs::default();
        args.headers
            .insert("authorization".to_string(), "Bearer a\nb".to_string());

        assert!(matches!(
            AuthenticatedClient::headers(&args),
            Err(ResolverError::InvalidHeader(name)) if name == "authorization"
        ));
    }

    #[test]
    fn ca_bundle_is_trusted() {
        let dir = tempfile::tempdir().unwrap();
        let ca = dir.path().join("ca.crt");
        std::fs::write(&ca, CLUSTER_CA).unwrap();

        let args = RequestArgs {
            tls_certificate_authority: Some(ca),
            timeout: Some(Duration::from_secs(1)),
            ..Default::default()
        };

        assert!(AuthenticatedClient::build_client(&args).is_ok());
    }

    /// Accepts one connection, answers `200 ok` and hands back the raw request head.
    fn serve_once() -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/version", listener.local_addr().unwrap());

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut head = String::new();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                head.push_str(&line);
            }

            let mut stream = stream;
            stream
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok")
                .unwrap();

            head
        });

        (url, server)
    }

    #[test]
    fn get_sends_intercepted_headers() {
        let dir = tempfile::tempdir().unwrap();
        let ca = dir.path().join("ca.crt");
        std::fs::write(&ca, CLUSTER_CA).unwrap();

        let (url, server) = serve_once();
        let client = AuthenticatedClient::new()
            .with_timeout(Duration::from_secs(10))
            .with_interceptor(move |_: &str, mut args: RequestArgs| -> Result<RequestArgs> {
                args.headers
                    .insert("authorization".to_string(), "Bearer t0ken".to_string());
                args.tls_certificate_authority = Some(ca.clone());
                Ok(args)
            });

        let response = client.get(&url).unwrap();
        let head = server.join().unwrap().to_ascii_lowercase();

        assert_eq!(
            response,
            HttpResponse {
                status: StatusCode::OK,
                body: "ok".to_string(),
            }
        );
        assert!(head.starts_with("get /version http/1.1\r\n"));
        assert_eq!(head.matches("authorization:").count(), 1);
        assert!(head.contains("authorization: bearer t0ken\r\n"));
    }

    #[test]
    fn resolver_replaces_caller_authorization() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("token"), "t0ken").unwrap();
        let resolver = InClusterResolver::new(
            ResolverConfig {
                service_account_dir: dir.path().to_owned(),
                ..Default::default()
            },
            EnvContext::default()
                .strict_env(true)
                .override_envs([(SERVICE_HOST_ENV, "10.0.0.1"), (SERVICE_PORT_ENV, "443")]),
        );
        let client = AuthenticatedClient::new()
            .with_interceptor(add_header("Authorization", "Basic dXNlcjpwYXNz"))
            .with_interceptor(resolver);

        let args = client.prepare("https://10.0.0.1/version").unwrap();
        let headers = AuthenticatedClient::headers(&args).unwrap();

        assert_eq!(
            headers.get_all("authorization").iter().collect::<Vec<_>>(),
            vec!["Bearer t0ken"]
        );
    }

    #[test]
    fn missing_ca_bundle_is_reported() {
        let args = RequestArgs {
            tls_certificate_authority: Some("/definitely/not/mounted/ca.crt".into()),
            ..Default::default()
        };

        assert!(matches!(
            AuthenticatedClient::build_client(&args),
            Err(ResolverError::CaCertificateRead { .. })
        ));
    }
}
