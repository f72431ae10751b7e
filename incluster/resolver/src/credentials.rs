use std::{
    fmt,
    path::{Path, PathBuf},
};

use tracing::Level;

use crate::error::{ResolverError, Result};

const TOKEN_FILE: &str = "token";
const CA_CERT_FILE: &str = "ca.crt";

/// Reads the bearer token from `{service_account_dir}/token`.
///
/// The content is returned as is. Mounted tokens are rotated by the kubelet, so this is read again
/// for every request instead of being kept around.
#[tracing::instrument(level = Level::TRACE, err(level = Level::DEBUG))]
pub fn read_token(service_account_dir: &Path) -> Result<String> {
    let path = service_account_dir.join(TOKEN_FILE);

    std::fs::read_to_string(&path).map_err(|source| ResolverError::TokenRead { path, source })
}

/// Path of the cluster CA bundle. Only the path is handed out, the HTTP transport loads and
/// verifies it.
pub fn ca_certificate_path(service_account_dir: &Path) -> PathBuf {
    service_account_dir.join(CA_CERT_FILE)
}

/// Service account material for one request.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceAccountCredential {
    pub token: String,
    pub ca_cert_path: PathBuf,
}

impl ServiceAccountCredential {
    pub fn load(service_account_dir: &Path) -> Result<Self> {
        Ok(Self {
            token: read_token(service_account_dir)?,
            ca_cert_path: ca_certificate_path(service_account_dir),
        })
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for ServiceAccountCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountCredential")
            .field("token", &"<redacted>")
            .field("ca_cert_path", &self.ca_cert_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_read_raw() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("token"), "abc.def\n").unwrap();

        let credential = ServiceAccountCredential::load(dir.path()).unwrap();

        assert_eq!(credential.token, "abc.def\n");
        assert_eq!(credential.ca_cert_path, dir.path().join("ca.crt"));
        assert_eq!(credential.bearer(), "Bearer abc.def\n");
    }

    #[test]
    fn token_is_read_every_time() {
        let dir = tempfile::tempdir().unwrap();
        let token = dir.path().join("token");

        std::fs::write(&token, "first").unwrap();
        assert_eq!(read_token(dir.path()).unwrap(), "first");

        std::fs::write(&token, "rotated").unwrap();
        assert_eq!(read_token(dir.path()).unwrap(), "rotated");
    }

    #[test]
    fn missing_token_is_an_error() {
        let dir = tempfile::tempdir().unwrap();

        let error = read_token(dir.path()).unwrap_err();

        assert!(
            matches!(&error, ResolverError::TokenRead { path, .. } if path == &dir.path().join("token"))
        );
    }

    #[test]
    fn ca_path_does_not_require_the_file() {
        assert_eq!(
            ca_certificate_path(Path::new("/nowhere")),
            Path::new("/nowhere/ca.crt")
        );
    }

    #[test]
    fn debug_hides_token() {
        let credential = ServiceAccountCredential {
            token: "secret".to_string(),
            ca_cert_path: PathBuf::from("/sa/ca.crt"),
        };

        assert!(!format!("{credential:?}").contains("secret"));
    }
}
