//! Signing credentials and credential lookup.
//!
//! [`Credentials`] is what the client signs with. [`CredentialProvider`] is the
//! verification side: it resolves a secret key from an access key ID, and is
//! used by [`verify_sigv4`](crate::sigv4::verify_sigv4).

use std::collections::HashMap;
use std::fmt;

use crate::error::AuthError;

/// Environment variable holding the access key ID.
pub const ACCESS_KEY_ID_ENV: &str = "AWS_ACCESS_KEY_ID";
/// Environment variable holding the secret access key.
pub const SECRET_ACCESS_KEY_ENV: &str = "AWS_SECRET_ACCESS_KEY";
/// Environment variable holding an optional session token.
pub const SESSION_TOKEN_ENV: &str = "AWS_SESSION_TOKEN";

/// An access key pair, optionally with a session token for temporary
/// credentials.
///
/// `Debug` output never includes the secret key or the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// The access key ID.
    pub access_key_id: String,
    /// The secret access key.
    pub secret_access_key: String,
    /// Session token, sent as `x-amz-security-token` when present.
    pub session_token: Option<String>,
}

impl Credentials {
    /// Create long-term credentials.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Attach a session token.
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Load credentials from `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and
    /// the optional `AWS_SESSION_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingCredentials`] if either key variable is
    /// unset or empty.
    pub fn from_env() -> Result<Self, AuthError> {
        let access_key_id = non_empty_env(ACCESS_KEY_ID_ENV)
            .ok_or(AuthError::MissingCredentials(ACCESS_KEY_ID_ENV))?;
        let secret_access_key = non_empty_env(SECRET_ACCESS_KEY_ENV)
            .ok_or(AuthError::MissingCredentials(SECRET_ACCESS_KEY_ENV))?;
        Ok(Self {
            access_key_id,
            secret_access_key,
            session_token: non_empty_env(SESSION_TOKEN_ENV),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "** redacted **"),
            )
            .finish()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Trait for looking up secret access keys by access key ID.
pub trait CredentialProvider: Send + Sync {
    /// Retrieve the secret access key for the given access key ID.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AccessKeyNotFound`] if the access key ID is not recognized.
    fn get_secret_key(&self, access_key_id: &str) -> Result<String, AuthError>;
}

/// An in-memory credential provider backed by a `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialProvider {
    credentials: HashMap<String, String>,
}

impl StaticCredentialProvider {
    /// Create a new `StaticCredentialProvider` from (access_key_id, secret_key) pairs.
    pub fn new(credentials: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            credentials: credentials.into_iter().collect(),
        }
    }
}

impl From<&Credentials> for StaticCredentialProvider {
    fn from(credentials: &Credentials) -> Self {
        Self::new([(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
        )])
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn get_secret_key(&self, access_key_id: &str) -> Result<String, AuthError> {
        self.credentials
            .get(access_key_id)
            .cloned()
            .ok_or_else(|| AuthError::AccessKeyNotFound(access_key_id.to_owned()))
    }
}
