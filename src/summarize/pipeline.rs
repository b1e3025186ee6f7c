//! Summarization pipeline orchestration

use crate::config::Settings;
use crate::llm::{CompletionOptions, CompletionProvider};
use crate::summarize::aggregator::Aggregator;
use crate::summarize::chunker::{Chunker, SplitMode, DEFAULT_MAX_CHARS};
use crate::summarize::error::SummarizationError;
use crate::summarize::parser::{parse, FinalSummary, ResponseFormat};
use crate::summarize::segment::SegmentSummarizer;

pub const DEFAULT_CHUNK_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_FINAL_MODEL: &str = "gpt-4";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Tunables for one summarization request.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryConfig {
    pub max_chars: usize,
    pub split_mode: SplitMode,
    pub response_format: ResponseFormat,
    /// Maximum in-flight chunk calls (0 = unbounded)
    pub concurrency: usize,
    pub chunk_options: CompletionOptions,
    pub final_options: CompletionOptions,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            split_mode: SplitMode::Delimiter,
            response_format: ResponseFormat::Markers,
            concurrency: 0,
            chunk_options: CompletionOptions::new(DEFAULT_CHUNK_MODEL)
                .with_temperature(DEFAULT_TEMPERATURE),
            final_options: CompletionOptions::new(DEFAULT_FINAL_MODEL)
                .with_temperature(DEFAULT_TEMPERATURE),
        }
    }
}

impl SummaryConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        let summary = &settings.summary;
        let options = |model: &str| {
            let mut options = CompletionOptions::new(model).with_temperature(summary.temperature);
            options.max_tokens = summary.max_tokens;
            options
        };

        Self {
            max_chars: summary.max_chars,
            split_mode: summary.split_mode,
            response_format: summary.response_format,
            concurrency: summary.concurrency,
            chunk_options: options(summary.chunk_model.as_str()),
            final_options: options(summary.final_model.as_str()),
        }
    }
}

/// Chunk → summarize each chunk → aggregate → parse.
pub struct SummaryPipeline<'a> {
    provider: &'a dyn CompletionProvider,
    config: SummaryConfig,
}

impl<'a> SummaryPipeline<'a> {
    pub fn new(provider: &'a dyn CompletionProvider, config: SummaryConfig) -> Self {
        Self { provider, config }
    }

    /// Summarize a transcript into key points and next steps.
    ///
    /// Any provider failure aborts the request; the aggregation call is only
    /// made after every chunk has been summarized.
    pub async fn summarize(&self, transcript: &str) -> Result<FinalSummary, SummarizationError> {
        let chunker = Chunker::new(self.config.max_chars, self.config.split_mode)?;
        let chunks = chunker.chunk(transcript);

        if chunks.is_empty() {
            tracing::info!("Empty transcript, nothing to summarize");
            return Ok(FinalSummary::default());
        }

        tracing::info!(
            transcript_chars = transcript.chars().count(),
            chunks = chunks.len(),
            "Summarizing transcript"
        );

        let summarizer = SegmentSummarizer::new(
            self.provider,
            self.config.chunk_options.clone(),
            self.config.concurrency,
        );
        let partials = summarizer.summarize_all(&chunks).await?;

        let aggregator = Aggregator::new(
            self.provider,
            self.config.final_options.clone(),
            self.config.response_format,
        );
        let raw = aggregator
            .aggregate(&partials)
            .await
            .map_err(SummarizationError::Aggregation)?;

        let summary = parse(&raw, self.config.response_format);
        if summary.next_steps.is_empty() {
            tracing::debug!("Summary has no next steps section");
        }

        tracing::info!(chunks = chunks.len(), "Summary completed");
        Ok(summary)
    }
}

/// Summarize with the default configuration.
pub async fn summarize(
    provider: &dyn CompletionProvider,
    transcript: &str,
) -> Result<FinalSummary, SummarizationError> {
    SummaryPipeline::new(provider, SummaryConfig::default())
        .summarize(transcript)
        .await
}
