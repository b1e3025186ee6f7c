//! LLM module for recap
//!
//! Completion and transcription providers backed by an OpenAI-compatible API.

mod client;
mod error;
mod openai;
pub mod prompts;
mod scripted;

pub use client::{
    build_completion_provider, build_transcription_provider, AudioUpload, CompletionOptions,
    CompletionProvider, TranscriptionProvider,
};
pub use error::{ProviderError, ProviderResult};
pub use openai::OpenAiClient;
pub use scripted::{RecordedCall, ScriptedProvider, ScriptedTranscriber};
