use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid response from {backend}: {details}")]
    BackendResponse { backend: String, details: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("report request failed: {0}")]
    Request(String),
}

pub type Result<T, E = ReportError> = std::result::Result<T, E>;
