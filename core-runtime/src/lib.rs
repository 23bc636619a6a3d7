//! # Core Runtime Module
//!
//! Runtime infrastructure shared by the API crates:
//! - Logging and tracing initialization
//! - Redaction helpers for credentials in log output

pub mod error;
pub mod logging;

pub use error::{Error, Result};
