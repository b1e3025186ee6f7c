use crate::llm::ProviderError;

/// Invalid chunker configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChunkingError {
    #[error("max_chars must be greater than zero (got {0})")]
    InvalidMaxChars(usize),
}

/// Failure of a whole summarization request. No partial results survive it.
#[derive(Debug, thiserror::Error)]
pub enum SummarizationError {
    #[error("Chunking error: {0}")]
    Chunking(#[from] ChunkingError),

    #[error("Failed to summarize chunk {index}: {source}")]
    Segment {
        index: usize,
        #[source]
        source: ProviderError,
    },

    #[error("Failed to aggregate partial summaries: {0}")]
    Aggregation(#[source] ProviderError),
}

impl SummarizationError {
    /// The provider failure behind this error, if any.
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            Self::Chunking(_) => None,
            Self::Segment { source, .. } => Some(source),
            Self::Aggregation(source) => Some(source),
        }
    }
}
