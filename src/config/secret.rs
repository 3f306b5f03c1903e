//! Secure credential handling using the secrecy crate
//!
//! The client secret read from the credentials file lives in a
//! [`SecretString`]: zeroed on drop, redacted in `Debug`, and only readable
//! through an explicit `expose_secret()` at the point where the export
//! invocation is built.
//!
//! # Example
//!
//! ```rust
//! use gzr_sync::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let secret = secret_string("s3cr3t".to_string());
//! assert_eq!(secret.expose_secret().as_ref(), "s3cr3t");
//! assert!(!format!("{secret:?}").contains("s3cr3t"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret};
use zeroize::Zeroize;

/// Newtype wrapper for String that implements the required traits for Secret
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// Secret string: zeroized on drop, redacted in Debug, explicit access only
pub type SecretString = Secret<SecretValue>;

/// Wraps a String into a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}
