//! OAuth 1.0 Authorization Flow
//!
//! Three-legged flow used by the storage API:
//!
//! 1. [`OAuthFlow::request_token`] obtains an unauthorized request token and
//!    the URL the user must visit to approve it.
//! 2. The user approves the application in a browser.
//! 3. [`OAuthFlow::access_token`] trades the approved request token for a
//!    long-lived access token pair.
//!
//! Both token endpoints take a signed form body and answer with a
//! form-encoded body. Token values are never logged.
//!
//! # Example
//!
//! ```no_run
//! use core_auth::oauth::{OAuthEndpoints, OAuthFlow};
//! use core_auth::Credentials;
//! use std::sync::Arc;
//!
//! # async fn example() -> core_auth::Result<()> {
//! # use bridge_traits::http::HttpClient;
//! # let http_client: Arc<dyn HttpClient> = todo!();
//! let endpoints = OAuthEndpoints {
//!     request_token_url: "https://api.dropbox.com/1/oauth/request_token".to_string(),
//!     access_token_url: "https://api.dropbox.com/1/oauth/access_token".to_string(),
//!     authorize_url: "https://www.dropbox.com/1/oauth/authorize".to_string(),
//! };
//! let flow = OAuthFlow::new(endpoints, Credentials::new("key", "secret"), http_client);
//! let request = flow.request_token().await?;
//! println!("Visit: {}", request.authorize_url);
//! // ...after approval
//! let access = flow.access_token(&request.token).await?;
//! # Ok(())
//! # }
//! ```

use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bridge_traits::time::{Clock, SystemClock};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use url::Url;

use crate::error::{AuthError, Result};
use crate::signer::{Signer, OAUTH_TOKEN};
use crate::types::{Credentials, RequestToken, TokenPair};

/// Token endpoint locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthEndpoints {
    /// Request-token endpoint (POST)
    pub request_token_url: String,
    /// Access-token endpoint (POST)
    pub access_token_url: String,
    /// Browser authorization page
    pub authorize_url: String,
}

/// OAuth 1.0 flow manager for one application (consumer) credential set.
pub struct OAuthFlow {
    endpoints: OAuthEndpoints,
    consumer: Credentials,
    clock: Arc<dyn Clock>,
    http_client: Arc<dyn HttpClient>,
}

impl OAuthFlow {
    /// Create a flow for the given application credentials.
    ///
    /// Any user token on `consumer` is ignored; the flow signs each step with
    /// the token appropriate for that step.
    pub fn new(
        endpoints: OAuthEndpoints,
        consumer: Credentials,
        http_client: Arc<dyn HttpClient>,
    ) -> Self {
        Self::with_clock(endpoints, consumer, http_client, Arc::new(SystemClock))
    }

    pub fn with_clock(
        endpoints: OAuthEndpoints,
        consumer: Credentials,
        http_client: Arc<dyn HttpClient>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let consumer = Credentials::new(consumer.consumer_key, consumer.consumer_secret);
        Self {
            endpoints,
            consumer,
            clock,
            http_client,
        }
    }

    /// Build the browser authorization URL for a request token.
    pub fn authorize_url(&self, request_token: &str, callback: Option<&str>) -> Result<String> {
        let mut url = Url::parse(&self.endpoints.authorize_url)
            .map_err(|e| AuthError::InvalidUrl(format!("{}: {}", self.endpoints.authorize_url, e)))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair(OAUTH_TOKEN, request_token);
            if let Some(callback) = callback {
                query.append_pair("oauth_callback", callback);
            }
        }

        Ok(url.to_string())
    }

    /// Step 1: obtain an unauthorized request token.
    #[instrument(skip(self))]
    pub async fn request_token(&self) -> Result<RequestToken> {
        let signer = Signer::with_clock(self.consumer.clone(), self.clock.clone());
        let response = self
            .post_form(&self.endpoints.request_token_url, signer.sign(None).to_form())
            .await?;

        let token = Self::parse_token_response(response)?;
        let authorize_url = self.authorize_url(&token.oauth_token, None)?;

        info!("Obtained request token");

        Ok(RequestToken {
            token,
            authorize_url,
        })
    }

    /// Step 3: exchange an approved request token for an access token.
    #[instrument(skip(self, request_token))]
    pub async fn access_token(&self, request_token: &TokenPair) -> Result<TokenPair> {
        let credentials = self.consumer.clone().with_token(
            request_token.oauth_token.clone(),
            request_token.oauth_token_secret.clone(),
        );
        let signer = Signer::with_clock(credentials, self.clock.clone());
        let response = self
            .post_form(&self.endpoints.access_token_url, signer.sign(None).to_form())
            .await?;

        let token = Self::parse_token_response(response)?;

        info!("Exchanged request token for access token");

        Ok(token)
    }

    async fn post_form(&self, url: &str, body: String) -> Result<HttpResponse> {
        let request = HttpRequest::new(HttpMethod::Post, url).form(body);

        self.http_client
            .execute(request)
            .await
            .map_err(|e| AuthError::NetworkError(e.to_string()))
    }

    fn parse_token_response(response: HttpResponse) -> Result<TokenPair> {
        if !response.is_success() {
            let status = response.status;
            let body = response
                .text()
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            warn!(status, error = %body, "Token request failed");

            return Err(AuthError::TokenRequestFailed { status, body });
        }

        let fields: BTreeMap<String, String> = serde_urlencoded::from_bytes(&response.body)
            .map_err(|e| AuthError::InvalidTokenResponse(e.to_string()))?;

        TokenPair::from_fields(fields).ok_or_else(|| {
            AuthError::InvalidTokenResponse(
                "missing oauth_token or oauth_token_secret".to_string(),
            )
        })
    }
}
