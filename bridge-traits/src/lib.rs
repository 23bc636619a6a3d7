//! # Host Bridge Traits
//!
//! Capabilities the API crates need from the host but do not implement
//! themselves.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP transport
//! - [`Clock`](time::Clock) - Time source for deterministic request signing
//!
//! ## Implementations
//!
//! | Capability | Crate | Type |
//! |------------|-------|------|
//! | `HttpClient` | `bridge-desktop` | `ReqwestHttpClient` |
//! | `Clock` | `bridge-traits` | `SystemClock` |
//!
//! ## Error Handling
//!
//! Transport failures are reported as [`BridgeError`](error::BridgeError).
//! HTTP status codes are never errors at this layer.
//!
//! ## Examples
//!
//! ### Implementing HttpClient
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse, HttpStream};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         // Implementation
//!         todo!()
//!     }
//!
//!     async fn download_stream(&self, request: HttpRequest) -> Result<HttpStream> {
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod http;
pub mod time;

pub use error::BridgeError;

pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, HttpStream};
pub use time::{Clock, SystemClock};
