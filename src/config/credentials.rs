//! Looker API credentials
//!
//! Credentials come from a `looker.ini`-style file:
//!
//! ```ini
//! [main]
//! base_url=https://looker.example.com:19999
//! client_id=abc123
//! client_secret=s3cr3t
//! ```
//!
//! Only `client_id` and `client_secret` are required. `base_url` is used to
//! derive the target instance when none is given on the command line.

use super::secret::{secret_string, SecretString};
use crate::domain::errors::SyncError;
use crate::domain::ids::InstanceHost;
use crate::domain::result::Result;
use config::{Config, File, FileFormat};
use secrecy::ExposeSecret;
use std::path::Path;

const SECTION: &str = "main";

/// Client credentials for the export binary
#[derive(Debug, Clone)]
pub struct LookerCredentials {
    /// API3 client id
    pub client_id: String,

    /// API3 client secret
    pub client_secret: SecretString,

    /// Instance base URL, if the file carries one
    pub base_url: Option<String>,
}

impl LookerCredentials {
    /// Builds credentials directly, mostly useful in tests
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: secret_string(client_secret.into()),
            base_url: None,
        }
    }

    /// Resolves the target instance: the explicit value wins, then `base_url`
    ///
    /// # Errors
    ///
    /// Returns a configuration error when neither is usable.
    pub fn resolve_instance(&self, explicit: Option<&str>) -> Result<InstanceHost> {
        if let Some(host) = explicit {
            return InstanceHost::new(host).map_err(SyncError::Configuration);
        }

        match &self.base_url {
            Some(url) => InstanceHost::from_base_url(url).map_err(SyncError::Configuration),
            None => Err(SyncError::Configuration(format!(
                "No target instance given and the credentials file has no {SECTION}.base_url"
            ))),
        }
    }
}

/// Loads credentials from an INI file
///
/// # Errors
///
/// Returns a credentials error if the file is missing or unreadable, or if
/// `main.client_id` / `main.client_secret` are absent or blank.
pub fn load_credentials(path: impl AsRef<Path>) -> Result<LookerCredentials> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SyncError::Credentials(format!(
            "Credentials file not found: {}",
            path.display()
        )));
    }

    let settings = Config::builder()
        .add_source(File::from(path).format(FileFormat::Ini))
        .build()?;

    let client_id = required_key(&settings, "client_id", path)?;
    let client_secret = secret_string(required_key(&settings, "client_secret", path)?);
    let base_url = settings
        .get_string(&format!("{SECTION}.base_url"))
        .ok()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

    if client_secret.expose_secret().is_empty() {
        return Err(SyncError::Credentials(format!(
            "{SECTION}.client_secret is empty in {}",
            path.display()
        )));
    }

    tracing::debug!(
        path = %path.display(),
        has_base_url = base_url.is_some(),
        "Loaded credentials"
    );

    Ok(LookerCredentials {
        client_id,
        client_secret,
        base_url,
    })
}

fn required_key(settings: &Config, key: &str, path: &Path) -> Result<String> {
    let value = settings
        .get_string(&format!("{SECTION}.{key}"))
        .map_err(|e| {
            SyncError::Credentials(format!(
                "Missing {SECTION}.{key} in {}: {e}",
                path.display()
            ))
        })?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(SyncError::Credentials(format!(
            "{SECTION}.{key} is empty in {}",
            path.display()
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn ini_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_credentials() {
        let file = ini_file(
            "[main]\nbase_url=https://looker.example.com:19999\nclient_id=abc\nclient_secret=xyz\n",
        );
        let creds = load_credentials(file.path()).unwrap();
        assert_eq!(creds.client_id, "abc");
        assert_eq!(creds.client_secret.expose_secret(), "xyz");
        assert_eq!(
            creds.base_url.as_deref(),
            Some("https://looker.example.com:19999")
        );
    }

    #[test]
    fn test_load_credentials_missing_secret() {
        let file = ini_file("[main]\nclient_id=abc\n");
        let err = load_credentials(file.path()).unwrap_err();
        assert!(matches!(err, SyncError::Credentials(_)));
        assert!(err.to_string().contains("client_secret"));
    }

    #[test]
    fn test_load_credentials_missing_file() {
        assert!(load_credentials("no-such-looker.ini").is_err());
    }

    #[test]
    fn test_resolve_instance() {
        let mut creds = LookerCredentials::new("id", "secret");
        assert!(creds.resolve_instance(None).is_err());
        assert_eq!(
            creds.resolve_instance(Some("10.1.2.3")).unwrap().as_str(),
            "10.1.2.3"
        );

        creds.base_url = Some("https://looker.example.com:19999".to_string());
        assert_eq!(
            creds.resolve_instance(None).unwrap().as_str(),
            "looker.example.com"
        );
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let creds = LookerCredentials::new("id", "top-secret");
        assert!(!format!("{creds:?}").contains("top-secret"));
    }
}
