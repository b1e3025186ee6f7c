//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::APP_NAME;
use crate::summarize::{
    ResponseFormat, SplitMode, DEFAULT_CHUNK_MODEL, DEFAULT_FINAL_MODEL, DEFAULT_MAX_CHARS,
    DEFAULT_TEMPERATURE, DEFAULT_TITLE_MAX_TOKENS, DEFAULT_TITLE_MODEL,
};

/// Environment variables checked (in order) when no API key is configured.
pub const API_KEY_ENV_VARS: [&str; 2] = ["RECAP_OPENAI_API_KEY", "OPENAI_API_KEY"];

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// LLM provider settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// Transcript summarization settings
    #[serde(default)]
    pub summary: SummarySettings,

    /// Title generation settings
    #[serde(default)]
    pub title: TitleSettings,

    /// Audio transcription settings
    #[serde(default)]
    pub transcription: TranscriptionSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Data directory for the meeting database and audio files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// LLM provider (openai)
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    /// API key
    #[serde(default)]
    pub api_key: String,

    /// API endpoint (empty = provider default)
    #[serde(default)]
    pub endpoint: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarySettings {
    /// Maximum characters per transcript chunk
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Sentence splitting (delimiter, sentence)
    #[serde(default)]
    pub split_mode: SplitMode,

    /// Final summary format requested from the model (markers, json)
    #[serde(default)]
    pub response_format: ResponseFormat,

    /// Maximum concurrent chunk requests (0 = unbounded)
    #[serde(default)]
    pub concurrency: usize,

    /// Model used for per-chunk summaries
    #[serde(default = "default_chunk_model")]
    pub chunk_model: String,

    /// Model used for the combined summary
    #[serde(default = "default_final_model")]
    pub final_model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Token limit per completion (unset = provider default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleSettings {
    #[serde(default = "default_title_model")]
    pub model: String,

    #[serde(default = "default_title_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionSettings {
    /// Speech-to-text model
    #[serde(default = "default_transcription_model")]
    pub model: String,

    /// Largest audio file accepted for upload, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

// Default value functions

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", APP_NAME, APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.local/share/recap"))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_llm_provider() -> String {
    "openai".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}

fn default_chunk_model() -> String {
    DEFAULT_CHUNK_MODEL.to_string()
}

fn default_final_model() -> String {
    DEFAULT_FINAL_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_title_model() -> String {
    DEFAULT_TITLE_MODEL.to_string()
}

fn default_title_max_tokens() -> u32 {
    DEFAULT_TITLE_MAX_TOKENS
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

fn default_max_upload_bytes() -> u64 {
    25 * 1024 * 1024
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            api_key: String::new(),
            endpoint: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            split_mode: SplitMode::default(),
            response_format: ResponseFormat::default(),
            concurrency: 0,
            chunk_model: default_chunk_model(),
            final_model: default_final_model(),
            temperature: default_temperature(),
            max_tokens: None,
        }
    }
}

impl Default for TitleSettings {
    fn default() -> Self {
        Self {
            model: default_title_model(),
            max_tokens: default_title_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            model: default_transcription_model(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!("No config file found, using defaults");
            let mut settings = Self::default();
            settings.apply_env_overrides();
            return Ok(settings);
        }

        Self::load_from(&config_path)
    }

    /// Load settings from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if !self.llm.api_key.trim().is_empty() {
            return;
        }

        let key = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|key| !key.trim().is_empty());
        if let Some(key) = key {
            self.llm.api_key = key;
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", APP_NAME, APP_NAME)
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &Path) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the database path
    pub fn database_path(&self) -> PathBuf {
        self.general.data_dir.join("recap.db")
    }

    /// Get the directory holding copies of processed audio files
    pub fn audio_dir(&self) -> PathBuf {
        self.general.data_dir.join("audio")
    }

    /// Ensure all required directories exist
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.general.data_dir)?;
        std::fs::create_dir_all(self.audio_dir())?;
        Ok(())
    }
}
