use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = ResolverError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ResolverError {
    /// Fails the request, it is never sent without a token.
    #[error("failed to read service account token from `{}`: {source}", .path.display())]
    TokenRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read CA certificate from `{}`: {source}", .path.display())]
    CaCertificateRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid CA certificate `{}`: {source}", .path.display())]
    CaCertificate {
        path: PathBuf,
        source: reqwest::Error,
    },

    #[error("invalid header `{0}` for outbound request")]
    InvalidHeader(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to read config file `{}`: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("incluster-config: `{0}`!")]
    SerdeJson(#[from] serde_json::Error),

    #[error("incluster-config: `{0}`!")]
    SerdeYaml(#[from] serde_yaml::Error),

    #[error("incluster-config: unsupported configuration file format {0:?}!")]
    UnsupportedFormat(Option<String>),
}
