//! # Client Configuration
//!
//! [`DropboxConfig`] is read once when a client is constructed. It can be
//! assembled with [`DropboxConfig::builder`] or deserialized from a host
//! configuration file; missing optional fields take their defaults.
//!
//! ```
//! use provider_dropbox::DropboxConfig;
//!
//! let config = DropboxConfig::builder()
//!     .app_key("key")
//!     .app_secret("secret")
//!     .root("dropbox")
//!     .build()
//!     .unwrap();
//! assert_eq!(config.root, "dropbox");
//! ```

use core_auth::{Credentials, TokenPair};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::{DropboxError, Result};

/// Storage namespace used when none is configured
pub const DEFAULT_ROOT: &str = "sandbox";

/// Host for metadata and file-operation calls
pub const DEFAULT_API_HOST: &str = "api.dropbox.com";

/// Host for file bodies and thumbnails
pub const DEFAULT_CONTENT_HOST: &str = "api-content.dropbox.com";

/// Host serving the browser authorization page
pub const DEFAULT_WEB_HOST: &str = "www.dropbox.com";

fn default_root() -> String {
    DEFAULT_ROOT.to_string()
}

fn default_api_host() -> String {
    DEFAULT_API_HOST.to_string()
}

fn default_content_host() -> String {
    DEFAULT_CONTENT_HOST.to_string()
}

fn default_web_host() -> String {
    DEFAULT_WEB_HOST.to_string()
}

/// Dropbox client configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropboxConfig {
    /// Application (consumer) key
    pub app_key: String,

    /// Application (consumer) secret
    pub app_secret: String,

    /// User access token, once authorized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_token: Option<String>,

    /// User access token secret
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_token_secret: Option<String>,

    /// Storage namespace ("sandbox" or "dropbox")
    #[serde(default = "default_root")]
    pub root: String,

    #[serde(default = "default_api_host")]
    pub api_host: String,

    #[serde(default = "default_content_host")]
    pub content_host: String,

    #[serde(default = "default_web_host")]
    pub web_host: String,

    /// Per-request timeout handed to the transport
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl DropboxConfig {
    pub fn builder() -> DropboxConfigBuilder {
        DropboxConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.app_key.is_empty() {
            return Err(DropboxError::Config("app_key is required".to_string()));
        }

        if self.app_secret.is_empty() {
            return Err(DropboxError::Config("app_secret is required".to_string()));
        }

        if self.root.is_empty() || self.root.contains('/') {
            return Err(DropboxError::Config(format!(
                "root must be a single path segment, got '{}'",
                self.root
            )));
        }

        for (name, host) in [
            ("api_host", &self.api_host),
            ("content_host", &self.content_host),
            ("web_host", &self.web_host),
        ] {
            if host.is_empty() || host.contains("://") || host.contains('/') {
                return Err(DropboxError::Config(format!(
                    "{} must be a bare hostname, got '{}'",
                    name, host
                )));
            }
        }

        if self.oauth_token.is_some() != self.oauth_token_secret.is_some() {
            return Err(DropboxError::Config(
                "oauth_token and oauth_token_secret must be set together".to_string(),
            ));
        }

        if self.timeout_secs == Some(0) {
            return Err(DropboxError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Same configuration, authorized with the given access token.
    pub fn with_token(mut self, token: &TokenPair) -> Self {
        self.oauth_token = Some(token.oauth_token.clone());
        self.oauth_token_secret = Some(token.oauth_token_secret.clone());
        self
    }

    pub fn credentials(&self) -> Credentials {
        let credentials = Credentials::new(self.app_key.clone(), self.app_secret.clone());
        match (&self.oauth_token, &self.oauth_token_secret) {
            (Some(token), Some(secret)) => credentials.with_token(token.clone(), secret.clone()),
            _ => credentials,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl fmt::Debug for DropboxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropboxConfig")
            .field("app_key", &self.app_key)
            .field("app_secret", &"[REDACTED]")
            .field("oauth_token", &self.oauth_token.as_ref().map(|_| "[REDACTED]"))
            .field(
                "oauth_token_secret",
                &self.oauth_token_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("root", &self.root)
            .field("api_host", &self.api_host)
            .field("content_host", &self.content_host)
            .field("web_host", &self.web_host)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Builder for [`DropboxConfig`]
#[derive(Default)]
pub struct DropboxConfigBuilder {
    app_key: Option<String>,
    app_secret: Option<String>,
    token: Option<(String, String)>,
    root: Option<String>,
    api_host: Option<String>,
    content_host: Option<String>,
    web_host: Option<String>,
    timeout_secs: Option<u64>,
}

impl DropboxConfigBuilder {
    pub fn app_key(mut self, key: impl Into<String>) -> Self {
        self.app_key = Some(key.into());
        self
    }

    pub fn app_secret(mut self, secret: impl Into<String>) -> Self {
        self.app_secret = Some(secret.into());
        self
    }

    pub fn token(mut self, token: impl Into<String>, secret: impl Into<String>) -> Self {
        self.token = Some((token.into(), secret.into()));
        self
    }

    /// Sets the storage namespace. Default: `sandbox`
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = Some(host.into());
        self
    }

    pub fn content_host(mut self, host: impl Into<String>) -> Self {
        self.content_host = Some(host.into());
        self
    }

    pub fn web_host(mut self, host: impl Into<String>) -> Self {
        self.web_host = Some(host.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn build(self) -> Result<DropboxConfig> {
        let app_key = self.app_key.ok_or_else(|| {
            DropboxError::Config("app_key is required. Use .app_key() to set it.".to_string())
        })?;

        let app_secret = self.app_secret.ok_or_else(|| {
            DropboxError::Config(
                "app_secret is required. Use .app_secret() to set it.".to_string(),
            )
        })?;

        let (oauth_token, oauth_token_secret) = match self.token {
            Some((token, secret)) => (Some(token), Some(secret)),
            None => (None, None),
        };

        let config = DropboxConfig {
            app_key,
            app_secret,
            oauth_token,
            oauth_token_secret,
            root: self.root.unwrap_or_else(default_root),
            api_host: self.api_host.unwrap_or_else(default_api_host),
            content_host: self.content_host.unwrap_or_else(default_content_host),
            web_host: self.web_host.unwrap_or_else(default_web_host),
            timeout_secs: self.timeout_secs,
        };

        config.validate()?;

        Ok(config)
    }
}
