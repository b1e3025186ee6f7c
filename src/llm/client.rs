use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;

use crate::config::Settings;
use crate::llm::error::ProviderResult;
use crate::llm::openai::OpenAiClient;

/// Per-call generation options.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// Ask the provider for a JSON object instead of free text.
    pub json_output: bool,
}

impl CompletionOptions {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens: None,
            temperature: None,
            json_output: false,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_json_output(mut self, json_output: bool) -> Self {
        self.json_output = json_output;
        self
    }
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        options: &CompletionOptions,
    ) -> ProviderResult<String>;
}

/// An audio file ready to be uploaded for transcription.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl AudioUpload {
    /// Read an audio file, rejecting empty files and files above `max_bytes`.
    pub fn read(path: &Path, max_bytes: u64) -> Result<Self> {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("Failed to read audio file: {}", path.display()))?;

        if metadata.len() == 0 {
            anyhow::bail!("Audio file is empty: {}", path.display());
        }
        if metadata.len() > max_bytes {
            anyhow::bail!(
                "Audio file is {} bytes, above the {} byte upload limit",
                metadata.len(),
                max_bytes
            );
        }

        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read audio file: {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());

        Ok(Self { file_name, bytes })
    }
}

#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    async fn transcribe(&self, audio: &AudioUpload) -> ProviderResult<String>;
}

/// Build a completion provider from runtime settings.
pub fn build_completion_provider(settings: &Settings) -> Result<Box<dyn CompletionProvider>> {
    match settings.llm.provider.to_lowercase().as_str() {
        "openai" => Ok(Box::new(OpenAiClient::from_settings(settings)?)),
        other => anyhow::bail!(
            "Unsupported llm.provider '{}'. Supported providers: openai",
            other
        ),
    }
}

/// Build a transcription provider from runtime settings.
pub fn build_transcription_provider(
    settings: &Settings,
) -> Result<Box<dyn TranscriptionProvider>> {
    match settings.llm.provider.to_lowercase().as_str() {
        "openai" => Ok(Box::new(OpenAiClient::from_settings(settings)?)),
        other => anyhow::bail!(
            "Unsupported llm.provider '{}'. Supported providers: openai",
            other
        ),
    }
}
