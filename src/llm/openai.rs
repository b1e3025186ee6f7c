use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::llm::client::{AudioUpload, CompletionOptions, CompletionProvider, TranscriptionProvider};
use crate::llm::error::{ProviderError, ProviderResult};

const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";

pub struct OpenAiClient {
    http: Client,
    api_key: String,
    endpoint: String,
    transcription_model: String,
}

impl OpenAiClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.llm.api_key.trim().to_string();
        if api_key.is_empty() {
            anyhow::bail!(
                "OpenAI API key is missing. Set llm.api_key in config or RECAP_OPENAI_API_KEY."
            );
        }

        let endpoint = if settings.llm.endpoint.trim().is_empty() {
            DEFAULT_OPENAI_ENDPOINT.to_string()
        } else {
            settings
                .llm
                .endpoint
                .trim()
                .trim_end_matches('/')
                .to_string()
        };

        Ok(Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(settings.llm.timeout_secs))
                .build()
                .context("Failed to build OpenAI HTTP client")?,
            api_key,
            endpoint,
            transcription_model: settings.transcription.model.clone(),
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }

    fn transcription_url(&self) -> String {
        format!("{}/audio/transcriptions", self.endpoint)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        options: &CompletionOptions,
    ) -> ProviderResult<String> {
        let body = build_chat_request(system, user, options);

        let response = self
            .http
            .post(self.chat_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let payload: ChatCompletionResponse = check_status(response).await?.json().await?;
        let text = first_completion_text(&payload).ok_or(ProviderError::EmptyResponse(
            "completion text",
        ))?;

        tracing::debug!(model = %options.model, chars = text.len(), "Completion received");
        Ok(text)
    }
}

#[async_trait]
impl TranscriptionProvider for OpenAiClient {
    async fn transcribe(&self, audio: &AudioUpload) -> ProviderResult<String> {
        let mime = mime_guess::from_path(&audio.file_name).first_or_octet_stream();
        let part = Part::bytes(audio.bytes.clone())
            .file_name(audio.file_name.clone())
            .mime_str(mime.as_ref())?;
        let form = Form::new()
            .text("model", self.transcription_model.clone())
            .part("file", part);

        let response = self
            .http
            .post(self.transcription_url())
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let payload: TranscriptionResponse = check_status(response).await?.json().await?;
        let text = payload.text.trim().to_string();
        if text.is_empty() {
            return Err(ProviderError::EmptyResponse("transcription text"));
        }

        tracing::info!(
            file_size = audio.bytes.len(),
            chars = text.len(),
            "Transcription completed"
        );
        Ok(text)
    }
}

async fn check_status(response: Response) -> ProviderResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::error!(%status, %body, "OpenAI API error");
    Err(ProviderError::Api {
        status: status.as_u16(),
        body,
    })
}

fn build_chat_request<'a>(
    system: &'a str,
    user: &'a str,
    options: &'a CompletionOptions,
) -> ChatCompletionRequest<'a> {
    ChatCompletionRequest {
        model: &options.model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: system,
            },
            ChatMessage {
                role: "user",
                content: user,
            },
        ],
        max_tokens: options.max_tokens,
        temperature: options.temperature,
        response_format: options
            .json_output
            .then_some(ResponseFormatSpec { kind: "json_object" }),
    }
}

/// First non-blank choice, returned verbatim.
fn first_completion_text(payload: &ChatCompletionResponse) -> Option<String> {
    payload
        .choices
        .iter()
        .filter_map(|c| c.message.content.as_deref())
        .find(|t| !t.trim().is_empty())
        .map(str::to_string)
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormatSpec>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormatSpec {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}
