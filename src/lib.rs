//! Dropbox API v1 client.
//!
//! This crate re-exports the workspace crates so host applications can
//! depend on `dbox` alone. The `desktop` feature (on by default) adds the
//! `reqwest` transport and [`desktop_app`].
//!
//! ```ignore
//! use dbox::{desktop_app, DropboxConfig, WalkOptions};
//!
//! let config = DropboxConfig::builder()
//!     .app_key("key")
//!     .app_secret("secret")
//!     .token("token", "token-secret")
//!     .build()?;
//! let client = desktop_app(config)?.client_from_config()?;
//! let listing = client.readdir("/", &WalkOptions::default()).await;
//! ```

pub use bridge_traits::{
    BridgeError, Clock, HttpClient, HttpMethod, HttpRequest, HttpResponse, HttpStream, SystemClock,
};
pub use core_auth::{AuthError, Credentials, OAuthEndpoints, OAuthFlow, Signer};
pub use core_runtime::logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
pub use provider_dropbox::{
    CopySource, DirItem, Download, DropboxApp, DropboxClient, DropboxConfig, DropboxError,
    Entry, IntoParts, Listing, Params, Reply, RequestToken, Result, StreamDownload, TokenPair,
    WalkOptions,
};

#[cfg(feature = "desktop")]
pub use bridge_desktop::ReqwestHttpClient;

/// [`DropboxApp`] backed by the `reqwest` transport.
///
/// The configured `timeout_secs` also becomes the client-wide timeout.
#[cfg(feature = "desktop")]
pub fn desktop_app(config: DropboxConfig) -> Result<DropboxApp> {
    let http_client = match config.timeout() {
        Some(timeout) => ReqwestHttpClient::with_timeout(timeout)?,
        None => ReqwestHttpClient::new()?,
    };
    DropboxApp::new(config, std::sync::Arc::new(http_client))
}
