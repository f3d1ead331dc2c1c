use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid repository identifier {0:?}: expected exactly one '/' between org and repo")]
    IdentifierFormat(String),

    #[error("Invalid server URL {url:?}: {reason}")]
    InvalidServerUrl { url: String, reason: String },

    #[error("Request to CI server failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("CI server returned HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Malformed response from CI server: {0}")]
    MalformedResponse(String),
}

pub type Result<T> = std::result::Result<T, FetchError>;
