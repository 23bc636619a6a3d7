//! Request signing for the OAuth 1.0 PLAINTEXT scheme.
//!
//! Signing is a parameter merge: the credential values travel as request
//! parameters, nothing is hashed. The result is a flat [`Params`] map that
//! the caller serializes into a query string or a form body.
//!
//! Merge order (later write wins):
//!
//! 1. OAuth fields injected by the [`Signer`]
//! 2. Caller-supplied optional arguments
//! 3. Endpoint-fixed fields, set by the endpoint after `sign` returns

use bridge_traits::time::{Clock, SystemClock};
use serde::Serialize;
use std::collections::btree_map::{self, BTreeMap};
use std::sync::Arc;
use url::form_urlencoded;
use uuid::Uuid;

use crate::types::Credentials;

pub const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
pub const OAUTH_SIGNATURE_METHOD: &str = "oauth_signature_method";
pub const OAUTH_SIGNATURE: &str = "oauth_signature";
pub const OAUTH_TIMESTAMP: &str = "oauth_timestamp";
pub const OAUTH_NONCE: &str = "oauth_nonce";
pub const OAUTH_VERSION: &str = "oauth_version";
pub const OAUTH_TOKEN: &str = "oauth_token";

/// Ordered string-keyed call parameters.
///
/// Values are stored as strings; numbers and booleans are rendered with
/// `to_string` on insertion.
///
/// # Examples
///
/// ```
/// use core_auth::Params;
///
/// let params = Params::new().with("file_limit", 100).with("list", true);
/// assert_eq!(params.get("file_limit"), Some("100"));
/// assert_eq!(params.to_form(), "file_limit=100&list=true");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value, returning the one it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> Option<String> {
        self.0.insert(key.into(), value.to_string())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Merge `other` into `self`; keys in `other` win.
    pub fn merge(&mut self, other: &Params) {
        for (key, value) in other.iter() {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// `application/x-www-form-urlencoded` rendering, also used for query strings.
    pub fn to_form(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Produces signed parameter maps for one credential set.
///
/// Never fails: a missing credential simply leaves its parameter out.
#[derive(Clone)]
pub struct Signer {
    credentials: Credentials,
    clock: Arc<dyn Clock>,
}

impl Signer {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_clock(credentials, Arc::new(SystemClock))
    }

    pub fn with_clock(credentials: Credentials, clock: Arc<dyn Clock>) -> Self {
        Self { credentials, clock }
    }

    /// Build the OAuth parameters and merge `args` over them.
    pub fn sign(&self, args: Option<&Params>) -> Params {
        let creds = &self.credentials;
        let mut params = Params::new();

        if !creds.consumer_key.is_empty() {
            params.insert(OAUTH_CONSUMER_KEY, &creds.consumer_key);
        }

        let token_secret = creds.token_secret.as_deref().unwrap_or("");
        if !creds.consumer_secret.is_empty() || !token_secret.is_empty() {
            params.insert(OAUTH_SIGNATURE_METHOD, "PLAINTEXT");
            params.insert(
                OAUTH_SIGNATURE,
                format!("{}&{}", creds.consumer_secret, token_secret),
            );
        }

        params.insert(OAUTH_TIMESTAMP, self.clock.unix_timestamp());
        params.insert(OAUTH_NONCE, Uuid::new_v4().simple());
        params.insert(OAUTH_VERSION, "1.0");

        if let Some(token) = creds.token.as_deref().filter(|t| !t.is_empty()) {
            params.insert(OAUTH_TOKEN, token);
        }

        if let Some(args) = args {
            params.merge(args);
        }

        params
    }
}
