use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A non-success status from an upstream provider.
    #[error("{0}")]
    Status(String),

    /// An error message relayed from the proxy's `{ error }` body.
    #[error("{0}")]
    Upstream(String),

    /// The provider answered, but not with the shape we expect.
    #[error("Unexpected payload from {0}")]
    UnexpectedPayload(&'static str),

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}
