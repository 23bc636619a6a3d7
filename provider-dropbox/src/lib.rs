//! # Dropbox Provider
//!
//! Client for the Dropbox Core API v1.
//!
//! ## Overview
//!
//! This module provides:
//! - OAuth 1.0 token acquisition through [`DropboxApp`]
//! - One async method per API endpoint on [`DropboxClient`]
//! - Recursive directory listing with request pacing ([`DropboxClient::readdir`])
//!
//! Every call is signed with the PLAINTEXT scheme and answered with the raw
//! status plus a JSON body. HTTP error statuses are returned, not raised;
//! only transport failures surface as `Err`.
//!
//! ## Example
//!
//! ```ignore
//! use provider_dropbox::{DropboxApp, DropboxConfig, WalkOptions};
//!
//! let config = DropboxConfig::builder()
//!     .app_key("key")
//!     .app_secret("secret")
//!     .build()?;
//! let app = DropboxApp::new(config, http_client)?;
//!
//! let request = app.request_token().await?;
//! println!("Approve at {}", request.authorize_url);
//! let access = app.access_token(&request.token).await?;
//!
//! let client = app.client(&access)?;
//! let listing = client.readdir("/", &WalkOptions::default()).await;
//! ```

pub mod app;
pub mod config;
pub mod connector;
pub mod error;
pub mod types;
pub mod url;
mod walker;

pub use app::DropboxApp;
pub use config::{DropboxConfig, DropboxConfigBuilder};
pub use connector::DropboxClient;
pub use error::{DropboxError, Result};
pub use types::{
    CopySource, DirItem, Download, Entry, IntoParts, Listing, Reply, StreamDownload, WalkOptions,
};

pub use core_auth::{Params, RequestToken, TokenPair};
