//! Summarization module for recap
//!
//! Long-transcript summarization: chunk, summarize each chunk, aggregate the
//! partial summaries, and parse the result into key points and next steps.

mod aggregator;
mod chunker;
mod error;
mod parser;
mod pipeline;
mod segment;
mod title;

pub use aggregator::{Aggregator, PARTIAL_SEPARATOR};
pub use chunker::{chunk, Chunker, SplitMode, DEFAULT_MAX_CHARS, SENTENCE_DELIMITER};
pub use error::{ChunkingError, SummarizationError};
pub use parser::{
    parse, parse_sections, parse_structured, FinalSummary, ResponseFormat, KEY_POINTS_MARKER,
    NEXT_STEPS_MARKER,
};
pub use pipeline::{
    summarize, SummaryConfig, SummaryPipeline, DEFAULT_CHUNK_MODEL, DEFAULT_FINAL_MODEL,
    DEFAULT_TEMPERATURE,
};
pub use segment::SegmentSummarizer;
pub use title::{
    generate_title, title_options, DEFAULT_TITLE, DEFAULT_TITLE_MAX_TOKENS, DEFAULT_TITLE_MODEL,
};
