//! Typed failures for MediFlow API calls.

use thiserror::Error;

/// Errors from the REST client.
///
/// One attempt per call, no retry: whatever went wrong is returned as-is to
/// the view layer, which decides between the inline error field and a
/// transient notification.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A TCP/TLS connection to the service could not be established.
    #[error("Could not connect to the API at {0}")]
    Connection(String),

    /// The server answered with a non-success status. The response body is
    /// kept so server-side rejections stay distinguishable from transport
    /// failures in the logs.
    #[error("API request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    /// The response arrived but was not the JSON shape we expected.
    #[error("Failed to decode API response: {0}")]
    Decode(String),

    /// Any other transport-level failure.
    #[error("API transport error: {0}")]
    Transport(String),
}

impl ApiError {
    /// Map a reqwest failure onto the variant the view layer cares about.
    pub(crate) fn from_reqwest(err: reqwest::Error, base_url: &str) -> Self {
        if err.is_connect() {
            ApiError::Connection(base_url.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}
