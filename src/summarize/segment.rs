//! Per-chunk summarization
//!
//! Chunks are independent, so calls are dispatched concurrently. Results are
//! collected in chunk order regardless of completion order, and the first
//! failure aborts the whole batch.

use futures::stream::{self, StreamExt, TryStreamExt};

use crate::llm::prompts::{build_chunk_prompt, SUMMARY_SYSTEM_PROMPT};
use crate::llm::{CompletionOptions, CompletionProvider, ProviderResult};
use crate::summarize::error::SummarizationError;

pub struct SegmentSummarizer<'a> {
    provider: &'a dyn CompletionProvider,
    options: CompletionOptions,
    concurrency: usize,
}

impl<'a> SegmentSummarizer<'a> {
    /// `concurrency` bounds in-flight calls; 0 means no bound.
    pub fn new(
        provider: &'a dyn CompletionProvider,
        options: CompletionOptions,
        concurrency: usize,
    ) -> Self {
        Self {
            provider,
            options,
            concurrency,
        }
    }

    /// Summarize one chunk, returning the provider's text verbatim.
    pub async fn summarize_chunk(&self, chunk: &str) -> ProviderResult<String> {
        self.provider
            .complete(SUMMARY_SYSTEM_PROMPT, &build_chunk_prompt(chunk), &self.options)
            .await
    }

    /// Summarize every chunk, returning partial summaries in chunk order.
    pub async fn summarize_all(&self, chunks: &[String]) -> Result<Vec<String>, SummarizationError> {
        let limit = match self.concurrency {
            0 => chunks.len().max(1),
            n => n,
        };

        stream::iter(chunks.iter().enumerate())
            .map(|(index, chunk)| async move {
                tracing::debug!(index, chars = chunk.chars().count(), "Summarizing chunk");
                self.summarize_chunk(chunk)
                    .await
                    .map_err(|source| SummarizationError::Segment { index, source })
            })
            .buffered(limit)
            .try_collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ProviderError, ScriptedProvider};

    fn chunks(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn one_call_per_chunk_in_order() {
        let provider = ScriptedProvider::new(|call| {
            let chunk = call.user.rsplit("\n\n").next().unwrap_or_default();
            Ok(format!("summary of {chunk}"))
        });
        let summarizer =
            SegmentSummarizer::new(&provider, CompletionOptions::new("chunk-model"), 0);

        let partials = summarizer
            .summarize_all(&chunks(&["first", "second", "third"]))
            .await
            .unwrap();

        assert_eq!(
            partials,
            vec!["summary of first", "summary of second", "summary of third"]
        );
        assert_eq!(provider.call_count(), 3);
        assert!(provider
            .calls()
            .iter()
            .all(|c| c.system == SUMMARY_SYSTEM_PROMPT && c.options.model == "chunk-model"));
    }

    #[tokio::test]
    async fn bounded_concurrency_preserves_order() {
        let provider = ScriptedProvider::new(|call| Ok(call.user.len().to_string()));
        let summarizer = SegmentSummarizer::new(&provider, CompletionOptions::new("m"), 2);
        let input = chunks(&["a", "bb", "ccc", "dddd", "eeeee"]);

        let partials = summarizer.summarize_all(&input).await.unwrap();

        let expected: Vec<String> = input
            .iter()
            .map(|c| build_chunk_prompt(c).len().to_string())
            .collect();
        assert_eq!(partials, expected);
    }

    #[tokio::test]
    async fn failure_reports_chunk_index() {
        let provider = ScriptedProvider::new(|call| {
            if call.user.ends_with("second") {
                Err(ProviderError::Other("rate limited".into()))
            } else {
                Ok("fine".into())
            }
        });
        let summarizer = SegmentSummarizer::new(&provider, CompletionOptions::new("m"), 1);

        let err = summarizer
            .summarize_all(&chunks(&["first", "second", "third"]))
            .await
            .unwrap_err();

        match err {
            SummarizationError::Segment { index, source } => {
                assert_eq!(index, 1);
                assert_eq!(source.to_string(), "rate limited");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn no_chunks_means_no_calls() {
        let provider = ScriptedProvider::replying("unused");
        let summarizer = SegmentSummarizer::new(&provider, CompletionOptions::new("m"), 0);

        assert!(summarizer.summarize_all(&[]).await.unwrap().is_empty());
        assert_eq!(provider.call_count(), 0);
    }
}
