use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token endpoint returned {status}: {body}")]
    TokenRequestFailed { status: u16, body: String },

    #[error("Malformed token response: {0}")]
    InvalidTokenResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
