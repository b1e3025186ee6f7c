use crate::config::Settings;
use crate::llm::prompts::{build_title_prompt, TITLE_SYSTEM_PROMPT};
use crate::llm::{CompletionOptions, CompletionProvider, ProviderResult};

pub const DEFAULT_TITLE: &str = "Untitled Meeting";
pub const DEFAULT_TITLE_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TITLE_MAX_TOKENS: u32 = 20;

/// Title generation options from settings.
pub fn title_options(settings: &Settings) -> CompletionOptions {
    CompletionOptions::new(settings.title.model.as_str())
        .with_max_tokens(settings.title.max_tokens)
        .with_temperature(settings.title.temperature)
}

/// Generate a short meeting title. A blank transcript gets the default
/// title without a provider call.
pub async fn generate_title(
    provider: &dyn CompletionProvider,
    transcript: &str,
    options: &CompletionOptions,
) -> ProviderResult<String> {
    if transcript.trim().is_empty() {
        return Ok(DEFAULT_TITLE.to_string());
    }

    let reply = provider
        .complete(TITLE_SYSTEM_PROMPT, &build_title_prompt(transcript), options)
        .await?;

    Ok(clean_title(&reply))
}

fn clean_title(reply: &str) -> String {
    let title = reply
        .trim()
        .trim_matches(|c| matches!(c, '"' | '\'' | '\u{201C}' | '\u{201D}'))
        .trim();

    if title.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedProvider;

    fn options() -> CompletionOptions {
        CompletionOptions::new(DEFAULT_TITLE_MODEL).with_max_tokens(DEFAULT_TITLE_MAX_TOKENS)
    }

    #[test]
    fn blank_transcript_gets_default_title() {
        let provider = ScriptedProvider::replying("unused");

        let title = tokio_test::block_on(generate_title(&provider, "  \n", &options())).unwrap();

        assert_eq!(title, DEFAULT_TITLE);
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn reply_is_trimmed_and_unquoted() {
        let provider = ScriptedProvider::replying("  \"Q3 Roadmap Review\"\n");

        let title =
            tokio_test::block_on(generate_title(&provider, "We reviewed Q3.", &options())).unwrap();

        assert_eq!(title, "Q3 Roadmap Review");
        let calls = provider.calls();
        assert_eq!(calls[0].system, TITLE_SYSTEM_PROMPT);
        assert_eq!(calls[0].options.max_tokens, Some(DEFAULT_TITLE_MAX_TOKENS));
        assert!(calls[0].user.contains("We reviewed Q3."));
    }

    #[test]
    fn blank_reply_falls_back_to_default() {
        assert_eq!(clean_title(" \"\" "), DEFAULT_TITLE);
    }

    #[test]
    fn options_come_from_settings() {
        let mut settings = Settings::default();
        settings.title.model = "gpt-4o-mini".to_string();

        let options = title_options(&settings);

        assert_eq!(options.model, "gpt-4o-mini");
        assert_eq!(options.max_tokens, Some(DEFAULT_TITLE_MAX_TOKENS));
        assert_eq!(options.temperature, Some(0.7));
    }
}
