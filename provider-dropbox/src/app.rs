//! Application handle: token acquisition and client construction.

use bridge_traits::http::HttpClient;
use bridge_traits::time::{Clock, SystemClock};
use core_auth::{OAuthEndpoints, OAuthFlow, RequestToken, TokenPair};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::config::DropboxConfig;
use crate::connector::DropboxClient;
use crate::error::{DropboxError, Result};

/// One registered Dropbox application.
///
/// Holds the app credentials and host settings, runs the OAuth token flow
/// and hands out a [`DropboxClient`] per authorized user.
pub struct DropboxApp {
    config: DropboxConfig,
    http_client: Arc<dyn HttpClient>,
    clock: Arc<dyn Clock>,
}

impl DropboxApp {
    pub fn new(config: DropboxConfig, http_client: Arc<dyn HttpClient>) -> Result<Self> {
        Self::with_clock(config, http_client, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: DropboxConfig,
        http_client: Arc<dyn HttpClient>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            http_client,
            clock,
        })
    }

    pub fn config(&self) -> &DropboxConfig {
        &self.config
    }

    pub fn oauth_endpoints(&self) -> OAuthEndpoints {
        OAuthEndpoints {
            request_token_url: format!("https://{}/1/oauth/request_token", self.config.api_host),
            access_token_url: format!("https://{}/1/oauth/access_token", self.config.api_host),
            authorize_url: format!("https://{}/1/oauth/authorize", self.config.web_host),
        }
    }

    fn oauth_flow(&self) -> OAuthFlow {
        OAuthFlow::with_clock(
            self.oauth_endpoints(),
            self.config.credentials(),
            self.http_client.clone(),
            self.clock.clone(),
        )
    }

    /// Obtain a request token and the page where the user approves it.
    #[instrument(skip(self))]
    pub async fn request_token(&self) -> Result<RequestToken> {
        Ok(self.oauth_flow().request_token().await?)
    }

    /// Authorization page for `request_token`, optionally redirecting to
    /// `callback` once approved.
    pub fn authorize_url(&self, request_token: &TokenPair, callback: Option<&str>) -> Result<String> {
        Ok(self
            .oauth_flow()
            .authorize_url(&request_token.oauth_token, callback)?)
    }

    /// Trade an approved request token for an access token.
    #[instrument(skip(self, request_token))]
    pub async fn access_token(&self, request_token: &TokenPair) -> Result<TokenPair> {
        Ok(self.oauth_flow().access_token(request_token).await?)
    }

    /// Client acting for the user identified by `token`.
    pub fn client(&self, token: &TokenPair) -> Result<DropboxClient> {
        info!(root = %self.config.root, "Creating Dropbox client");
        DropboxClient::with_clock(
            self.config.clone().with_token(token),
            self.http_client.clone(),
            self.clock.clone(),
        )
    }

    /// Client using the access token already present in the configuration.
    pub fn client_from_config(&self) -> Result<DropboxClient> {
        if self.config.oauth_token.is_none() {
            return Err(DropboxError::Config(
                "no access token configured; run the token flow first".to_string(),
            ));
        }

        DropboxClient::with_clock(
            self.config.clone(),
            self.http_client.clone(),
            self.clock.clone(),
        )
    }
}
