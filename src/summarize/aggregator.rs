use crate::llm::prompts::{build_final_json_prompt, build_final_prompt, SUMMARY_SYSTEM_PROMPT};
use crate::llm::{CompletionOptions, CompletionProvider, ProviderResult};
use crate::summarize::parser::ResponseFormat;

/// Separator placed between partial summaries.
pub const PARTIAL_SEPARATOR: &str = "\n\n";

/// Folds partial summaries into one two-section summary with a single call.
pub struct Aggregator<'a> {
    provider: &'a dyn CompletionProvider,
    options: CompletionOptions,
    format: ResponseFormat,
}

impl<'a> Aggregator<'a> {
    pub fn new(
        provider: &'a dyn CompletionProvider,
        options: CompletionOptions,
        format: ResponseFormat,
    ) -> Self {
        let options = options.with_json_output(format == ResponseFormat::Json);
        Self {
            provider,
            options,
            format,
        }
    }

    /// Returns the provider's raw text. No partials means no call and an
    /// empty string.
    pub async fn aggregate(&self, partials: &[String]) -> ProviderResult<String> {
        if partials.is_empty() {
            return Ok(String::new());
        }

        let combined = partials.join(PARTIAL_SEPARATOR);
        let prompt = match self.format {
            ResponseFormat::Markers => build_final_prompt(&combined),
            ResponseFormat::Json => build_final_json_prompt(&combined),
        };

        tracing::debug!(partials = partials.len(), "Aggregating partial summaries");
        self.provider
            .complete(SUMMARY_SYSTEM_PROMPT, &prompt, &self.options)
            .await
    }
}
