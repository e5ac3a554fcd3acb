//! Access credentials for the storage service.

#[cfg(feature = "config")]
use clap::Args;
use minio::s3::creds::StaticProvider;
use serde::{Deserialize, Serialize};

/// Access key, secret key and optional session token.
///
/// The same credentials authenticate both S3 requests and admin API calls.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct MinossCredentials {
    /// Access key (user name).
    #[cfg_attr(feature = "config", arg(long = "access-key", env = "MINOSS_ACCESS_KEY"))]
    pub access_key: String,

    /// Secret key. Never serialized.
    #[cfg_attr(
        feature = "config",
        arg(long = "secret-key", env = "MINOSS_SECRET_KEY", hide_env_values = true)
    )]
    #[serde(skip_serializing, default)]
    pub secret_key: String,

    /// Session token of temporary (STS) credentials.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "session-token",
            env = "MINOSS_SESSION_TOKEN",
            hide_env_values = true
        )
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

impl MinossCredentials {
    /// Creates static credentials.
    ///
    /// ```rust
    /// use minoss::MinossCredentials;
    ///
    /// let credentials = MinossCredentials::new("minioadmin", "minioadmin");
    /// assert!(credentials.session_token().is_none());
    /// ```
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            session_token: None,
        }
    }

    /// Creates temporary credentials carrying a session token.
    pub fn with_session_token(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            session_token: Some(session_token.into()),
        }
    }

    #[inline]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    #[inline]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    #[inline]
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    /// Returns the access key with everything past the first four
    /// characters hidden.
    pub fn access_key_masked(&self) -> String {
        match self.access_key.char_indices().nth(4) {
            Some((idx, _)) => format!("{}***", &self.access_key[..idx]),
            None => "*".repeat(self.access_key.chars().count()),
        }
    }
}

impl std::fmt::Debug for MinossCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinossCredentials")
            .field("access_key", &self.access_key_masked())
            .field("secret_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl From<&MinossCredentials> for StaticProvider {
    fn from(credentials: &MinossCredentials) -> Self {
        StaticProvider::new(
            &credentials.access_key,
            &credentials.secret_key,
            credentials.session_token.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_with_session_token() {
        let creds = MinossCredentials::with_session_token("access", "secret", "token");
        assert_eq!(creds.access_key(), "access");
        assert_eq!(creds.secret_key(), "secret");
        assert_eq!(creds.session_token(), Some("token"));
    }

    #[test]
    fn test_access_key_masking() {
        assert_eq!(
            MinossCredentials::new("AKIATEST12345", "s").access_key_masked(),
            "AKIA***"
        );
        assert_eq!(MinossCredentials::new("ABCD", "s").access_key_masked(), "****");
        assert_eq!(MinossCredentials::new("", "s").access_key_masked(), "");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let creds = MinossCredentials::with_session_token("AKIATEST12345", "topsecret", "tok3n");
        let debug = format!("{creds:?}");

        assert!(debug.contains("AKIA***"));
        assert!(!debug.contains("topsecret"));
        assert!(!debug.contains("tok3n"));
        assert!(!debug.contains("TEST12345"));
    }

    #[test]
    fn test_secret_key_not_serialized() {
        let creds = MinossCredentials::new("access", "topsecret");
        let json = serde_json::to_string(&creds).unwrap();

        assert!(json.contains("access"));
        assert!(!json.contains("topsecret"));
        assert!(!json.contains("session_token"));
    }
}
