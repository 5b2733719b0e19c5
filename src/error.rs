//! Error taxonomy for route sequencing.

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    /// Matrix dimensions disagree with the point list, or a cell is negative or non-finite.
    #[error("malformed matrix: {0}")]
    MalformedMatrix(String),
    /// The matrix provider was asked for more points than one request may carry.
    #[error("too many points for one matrix request: {requested} > {max}")]
    TooManyPoints { requested: usize, max: usize },
    #[error("matrix provider error: {0}")]
    MatrixProvider(#[from] ProviderError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("route sequencing cancelled")]
    Cancelled,
}

/// Underlying cause of a failed matrix request.
#[derive(Debug, ThisError)]
pub enum ProviderError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("provider responded with code {code}: {message}")]
    Rejected { code: String, message: String },
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn malformed_matrix(message: impl Into<String>) -> Self {
        Self::MalformedMatrix(message.into())
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

impl ProviderError {
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload(message.into())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::MatrixProvider(ProviderError::Transport(err))
    }
}
