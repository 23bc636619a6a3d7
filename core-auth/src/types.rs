use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// OAuth 1.0 credential set.
///
/// The consumer pair identifies the application; the token pair identifies
/// the user once the authorization flow has completed. Both secrets are
/// redacted from `Debug` output.
///
/// # Examples
///
/// ```
/// use core_auth::Credentials;
///
/// let app = Credentials::new("app-key", "app-secret");
/// let user = app.clone().with_token("token", "token-secret");
/// assert!(!app.has_token());
/// assert!(user.has_token());
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_secret: Option<String>,
}

impl Credentials {
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            token: None,
            token_secret: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>, token_secret: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self.token_secret = Some(token_secret.into());
        self
    }

    /// Whether a non-empty user token is configured.
    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("token_secret", &self.token_secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Token pair returned by the request-token and access-token endpoints.
///
/// Any additional fields in the form-encoded response (e.g. `uid`) are kept
/// in `extra`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub oauth_token: String,
    pub oauth_token_secret: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl TokenPair {
    pub fn new(oauth_token: impl Into<String>, oauth_token_secret: impl Into<String>) -> Self {
        Self {
            oauth_token: oauth_token.into(),
            oauth_token_secret: oauth_token_secret.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Build a token pair from decoded form fields.
    ///
    /// Returns `None` when either token field is missing.
    pub fn from_fields(mut fields: BTreeMap<String, String>) -> Option<Self> {
        let oauth_token = fields.remove("oauth_token")?;
        let oauth_token_secret = fields.remove("oauth_token_secret")?;
        Some(Self {
            oauth_token,
            oauth_token_secret,
            extra: fields,
        })
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("oauth_token", &"[REDACTED]")
            .field("oauth_token_secret", &"[REDACTED]")
            .field("extra", &self.extra)
            .finish()
    }
}

/// Unauthorized request token plus the URL the user must visit to approve it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    pub token: TokenPair,
    pub authorize_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::new("key", "very-secret").with_token("tok", "tok-secret");
        let rendered = format!("{:?}", creds);

        assert!(rendered.contains("key"));
        assert!(!rendered.contains("very-secret"));
        assert!(!rendered.contains("tok-secret"));
    }

    #[test]
    fn test_has_token_ignores_empty() {
        let creds = Credentials::new("key", "secret").with_token("", "");
        assert!(!creds.has_token());
    }

    #[test]
    fn test_token_pair_from_fields_keeps_extras() {
        let mut fields = BTreeMap::new();
        fields.insert("oauth_token".to_string(), "t".to_string());
        fields.insert("oauth_token_secret".to_string(), "s".to_string());
        fields.insert("uid".to_string(), "42".to_string());

        let pair = TokenPair::from_fields(fields).unwrap();
        assert_eq!(pair.oauth_token, "t");
        assert_eq!(pair.oauth_token_secret, "s");
        assert_eq!(pair.extra.get("uid"), Some(&"42".to_string()));
    }

    #[test]
    fn test_token_pair_from_fields_requires_both() {
        let mut fields = BTreeMap::new();
        fields.insert("oauth_token".to_string(), "t".to_string());
        assert!(TokenPair::from_fields(fields).is_none());
    }
}
