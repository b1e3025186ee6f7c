/// Failure reported by an external completion or transcription provider.
///
/// Never retried inside this crate; callers decide what to do with it.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Provider response did not contain {0}")]
    EmptyResponse(&'static str),

    #[error("{0}")]
    Other(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;
