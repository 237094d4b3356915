use thiserror::Error;

// * Unified error type for the article fetch layer.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {0} fetching page")]
    Status(u16),

    #[error("empty response body")]
    EmptyResponse,

    #[error("invalid header value")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}
