//! One gzr export invocation
//!
//! The invocation is kept as a program plus an argument vector and handed to
//! the OS without a shell, so department names reach gzr unmodified.
//! [`ExportInvocation::render`] produces the escaped, copy-pasteable form used
//! in diagnostics and in the failure ledger.

use crate::config::SecretString;
use crate::domain::ids::{ContentId, InstanceHost};
use crate::domain::record::ContentType;
use secrecy::ExposeSecret;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

const REDACTED: &str = "***";

/// A fully specified `gzr <type> cat <id> ...` call
#[derive(Clone)]
pub struct ExportInvocation {
    binary: String,
    content_type: ContentType,
    id: ContentId,
    host: InstanceHost,
    client_id: String,
    client_secret: SecretString,
    verify_tls: bool,
    dest_dir: PathBuf,
}

impl ExportInvocation {
    /// Creates an invocation
    ///
    /// `verify_tls = false` adds `--no-ssl`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        binary: impl Into<String>,
        content_type: ContentType,
        id: ContentId,
        host: InstanceHost,
        client_id: impl Into<String>,
        client_secret: SecretString,
        verify_tls: bool,
        dest_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            binary: binary.into(),
            content_type,
            id,
            host,
            client_id: client_id.into(),
            client_secret,
            verify_tls,
            dest_dir: dest_dir.into(),
        }
    }

    /// Program to execute
    pub fn program(&self) -> &str {
        &self.binary
    }

    /// Content type being exported
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Content id being exported
    pub fn id(&self) -> ContentId {
        self.id
    }

    /// Directory gzr writes into
    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }

    /// Argument vector, program excluded
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = self
            .leading_args(self.client_secret.expose_secret().as_ref())
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(OsString::from("--dir"));
        args.push(self.dir_arg());
        args
    }

    /// Shell-escaped rendering of the full command line
    ///
    /// With `redact_secret` the client secret is written as `***`.
    ///
    /// # Examples
    ///
    /// ```
    /// use gzr_sync::adapters::gzr::ExportInvocation;
    /// use gzr_sync::config::secret_string;
    /// use gzr_sync::domain::{ContentId, ContentType, InstanceHost};
    ///
    /// let invocation = ExportInvocation::new(
    ///     "gzr",
    ///     ContentType::Look,
    ///     ContentId::new(42),
    ///     InstanceHost::new("looker.local").unwrap(),
    ///     "id",
    ///     secret_string("secret".to_string()),
    ///     false,
    ///     "Dept_Folders/R&D Dept/look",
    /// );
    /// assert_eq!(
    ///     invocation.render(true),
    ///     "gzr look cat 42 --host looker.local --client-id id --client-secret *** --no-ssl --dir Dept_Folders/R\\&D\\ Dept/look/"
    /// );
    /// ```
    pub fn render(&self, redact_secret: bool) -> String {
        let secret = if redact_secret {
            REDACTED
        } else {
            self.client_secret.expose_secret().as_ref()
        };

        let mut parts = vec![shell_escape(&self.binary)];
        parts.extend(
            self.leading_args(secret)
                .iter()
                .map(|arg| if *arg == REDACTED { arg.clone() } else { shell_escape(arg) }),
        );
        parts.push("--dir".to_string());
        parts.push(shell_escape(&self.dir_arg().to_string_lossy()));
        parts.join(" ")
    }

    fn leading_args(&self, secret: &str) -> Vec<String> {
        let mut args = vec![
            self.content_type.command_word().to_string(),
            "cat".to_string(),
            self.id.to_string(),
            "--host".to_string(),
            self.host.to_string(),
            "--client-id".to_string(),
            self.client_id.clone(),
            "--client-secret".to_string(),
            secret.to_string(),
        ];
        if !self.verify_tls {
            args.push("--no-ssl".to_string());
        }
        args
    }

    // gzr treats --dir as a directory; keep the trailing separator explicit
    fn dir_arg(&self) -> OsString {
        let mut dir = self.dest_dir.clone().into_os_string();
        if !dir.to_string_lossy().ends_with('/') {
            dir.push("/");
        }
        dir
    }
}

impl fmt::Debug for ExportInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportInvocation")
            .field("command", &self.render(true))
            .finish()
    }
}

/// Backslash-escapes every character a POSIX shell could interpret
///
/// Letters, digits and `_ . / : = @ , + % -` pass through unchanged.
pub fn shell_escape(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_string();
    }

    let mut escaped = String::with_capacity(arg.len());
    for c in arg.chars() {
        let plain = c.is_ascii_alphanumeric()
            || matches!(c, '_' | '.' | '/' | ':' | '=' | '@' | ',' | '+' | '%' | '-');
        if !plain {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn invocation(dest: &str, verify_tls: bool) -> ExportInvocation {
        ExportInvocation::new(
            "gzr",
            ContentType::Dashboard,
            ContentId::new(7),
            InstanceHost::new("10.0.0.5").unwrap(),
            "client",
            secret_string("hunter2".to_string()),
            verify_tls,
            dest,
        )
    }

    #[test]
    fn test_args_vector() {
        let args = invocation("Dept_Folders/R&D Dept/dashboard", false).args();
        let args: Vec<String> = args
            .into_iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        assert_eq!(
            args,
            vec![
                "dashboard",
                "cat",
                "7",
                "--host",
                "10.0.0.5",
                "--client-id",
                "client",
                "--client-secret",
                "hunter2",
                "--no-ssl",
                "--dir",
                "Dept_Folders/R&D Dept/dashboard/",
            ]
        );
    }

    #[test]
    fn test_verify_tls_drops_no_ssl() {
        let args = invocation("out/dashboard", true).args();
        assert!(!args.iter().any(|a| a == "--no-ssl"));
    }

    #[test]
    fn test_render_escapes_path() {
        let rendered = invocation("Dept_Folders/R&D Dept/dashboard", false).render(false);
        assert!(rendered.ends_with("--dir Dept_Folders/R\\&D\\ Dept/dashboard/"));
        assert!(rendered.contains("--client-secret hunter2"));
        assert!(rendered.starts_with("gzr dashboard cat 7 --host 10.0.0.5"));
    }

    #[test]
    fn test_render_redacts_secret() {
        let rendered = invocation("out", false).render(true);
        assert!(rendered.contains("--client-secret ***"));
        assert!(!rendered.contains("hunter2"));
        assert!(!format!("{:?}", invocation("out", false)).contains("hunter2"));
    }

    #[test]
    fn test_shell_escape() {
        assert_eq!(shell_escape("R&D Dept"), "R\\&D\\ Dept");
        assert_eq!(shell_escape("O'Neil (EU) [x]"), "O\\'Neil\\ \\(EU\\)\\ \\[x\\]");
        assert_eq!(shell_escape("plain-name_1.0"), "plain-name_1.0");
        assert_eq!(shell_escape(""), "''");
    }
}
