//! Error types for the Dropbox provider

use thiserror::Error;

/// Dropbox provider errors
///
/// HTTP error statuses are not represented here: a 4xx/5xx answer is a
/// successful exchange and is returned as a `Reply` carrying the status.
#[derive(Error, Debug)]
pub enum DropboxError {
    /// The request never produced an HTTP response
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// OAuth token flow failed
    #[error(transparent)]
    Auth(#[from] core_auth::AuthError),
}

/// Result type for Dropbox operations
pub type Result<T> = std::result::Result<T, DropboxError>;

impl From<bridge_traits::error::BridgeError> for DropboxError {
    fn from(error: bridge_traits::error::BridgeError) -> Self {
        DropboxError::NetworkError(error.to_string())
    }
}

impl From<DropboxError> for bridge_traits::error::BridgeError {
    fn from(error: DropboxError) -> Self {
        match error {
            DropboxError::NetworkError(msg) => {
                bridge_traits::error::BridgeError::OperationFailed(format!(
                    "Network error: {}",
                    msg
                ))
            }
            DropboxError::Config(msg) => bridge_traits::error::BridgeError::NotAvailable(
                format!("Dropbox client misconfigured: {}", msg),
            ),
            DropboxError::Auth(e) => {
                bridge_traits::error::BridgeError::OperationFailed(e.to_string())
            }
        }
    }
}
