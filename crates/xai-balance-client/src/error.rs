//! Client error types.

/// Errors that can occur when fetching billing data.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network or connection failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a status other than 200.
    #[error("HTTP error: {0}")]
    HttpStatus(u16),

    /// Server answered 200 with an empty body.
    #[error("no data in response")]
    NoBody,

    /// Body did not match the invoice preview shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl FetchError {
    /// HTTP status code, if the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus(status) => Some(*status),
            _ => None,
        }
    }
}
