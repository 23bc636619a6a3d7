//! # Authentication Module
//!
//! OAuth 1.0 request signing and token acquisition.
//!
//! ## Overview
//!
//! - [`Credentials`] hold the consumer pair and the optional user token pair.
//! - [`Signer`] merges credentials and caller arguments into a flat
//!   [`Params`] map ready for form encoding.
//! - [`OAuthFlow`] runs the request-token / authorize / access-token dance.

pub mod error;
pub mod oauth;
pub mod signer;
pub mod types;

pub use error::{AuthError, Result};
pub use oauth::{OAuthEndpoints, OAuthFlow};
pub use signer::{Params, Signer};
pub use types::{Credentials, RequestToken, TokenPair};
