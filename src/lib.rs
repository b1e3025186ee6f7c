//! recap - A lightweight CLI tool for meeting transcription and AI-powered meeting notes
//!
//! Long transcripts are split into bounded chunks, each chunk is summarized
//! on its own, and the partial summaries are folded into a final
//! "Key Points / Next Steps" result.

pub mod cli;
pub mod config;
pub mod llm;
pub mod storage;
pub mod summarize;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "recap";
