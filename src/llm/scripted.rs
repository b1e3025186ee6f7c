//! In-memory providers for tests and offline runs.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::llm::client::{AudioUpload, CompletionOptions, CompletionProvider, TranscriptionProvider};
use crate::llm::error::ProviderResult;

/// One recorded `complete` call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: String,
    pub user: String,
    pub options: CompletionOptions,
}

type Responder = dyn Fn(&RecordedCall) -> ProviderResult<String> + Send + Sync;

/// Completion provider that answers from a closure and records every call.
pub struct ScriptedProvider {
    responder: Box<Responder>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedProvider {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&RecordedCall) -> ProviderResult<String> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Provider that always answers with the same text.
    pub fn replying(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move |_| Ok(text.clone()))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        options: &CompletionOptions,
    ) -> ProviderResult<String> {
        let call = RecordedCall {
            system: system.to_string(),
            user: user.to_string(),
            options: options.clone(),
        };
        let reply = (self.responder)(&call);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        reply
    }
}

type TranscriptResponder = dyn Fn(&AudioUpload) -> ProviderResult<String> + Send + Sync;

/// Transcription provider that answers from a closure and records the
/// uploaded file names.
pub struct ScriptedTranscriber {
    responder: Box<TranscriptResponder>,
    uploads: Mutex<Vec<String>>,
}

impl ScriptedTranscriber {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&AudioUpload) -> ProviderResult<String> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move |_| Ok(text.clone()))
    }

    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().map(|u| u.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TranscriptionProvider for ScriptedTranscriber {
    async fn transcribe(&self, audio: &AudioUpload) -> ProviderResult<String> {
        let reply = (self.responder)(audio);
        if let Ok(mut uploads) = self.uploads.lock() {
            uploads.push(audio.file_name.clone());
        }
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ProviderError;

    #[tokio::test]
    async fn records_calls_and_replies() {
        let provider = ScriptedProvider::replying("ok");
        let options = CompletionOptions::new("test-model");

        let reply = provider.complete("sys", "hello", &options).await.unwrap();

        assert_eq!(reply, "ok");
        assert_eq!(provider.call_count(), 1);
        let calls = provider.calls();
        assert_eq!(calls[0].user, "hello");
        assert_eq!(calls[0].options.model, "test-model");
    }

    #[tokio::test]
    async fn failures_are_recorded_too() {
        let provider = ScriptedProvider::new(|_| Err(ProviderError::Other("quota".into())));

        let err = provider
            .complete("sys", "hello", &CompletionOptions::new("m"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "quota");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn transcriber_records_uploads() {
        let transcriber = ScriptedTranscriber::replying("hello team");
        let audio = AudioUpload {
            file_name: "standup.m4a".to_string(),
            bytes: vec![1, 2, 3],
        };

        let text = transcriber.transcribe(&audio).await.unwrap();

        assert_eq!(text, "hello team");
        assert_eq!(transcriber.uploads(), vec!["standup.m4a".to_string()]);
    }
}
