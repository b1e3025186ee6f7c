use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use recap::llm::{
    CompletionOptions, CompletionProvider, ProviderError, ProviderResult, ScriptedProvider,
};
use recap::summarize::{
    summarize, SummarizationError, SummaryConfig, SummaryPipeline, DEFAULT_CHUNK_MODEL,
    DEFAULT_FINAL_MODEL,
};

/// Sixty 98-char sentences joined by ". ", which packs into 25/25/10 at 2500 chars.
fn long_transcript() -> String {
    (0..60)
        .map(|i| format!("{:a<98}", format!("Topic {i:02} was discussed")))
        .collect::<Vec<_>>()
        .join(". ")
}

fn chunk_reply(user: &str) -> Result<String, ProviderError> {
    if user.contains("Topic 00") {
        Ok("P1".to_string())
    } else if user.contains("Topic 25") {
        Ok("P2".to_string())
    } else if user.contains("Topic 50") {
        Ok("P3".to_string())
    } else {
        Err(ProviderError::Other(format!("unexpected chunk: {user}")))
    }
}

#[tokio::test]
async fn long_transcript_is_chunked_summarized_and_aggregated() {
    let provider = ScriptedProvider::new(|call| {
        if call.options.model == DEFAULT_FINAL_MODEL {
            Ok("Key Points:\n- Shipped the release\nNext Steps:\n- Plan the retro".to_string())
        } else {
            chunk_reply(&call.user)
        }
    });

    let transcript = long_transcript();
    assert_eq!(transcript.chars().count(), 60 * 98 + 59 * 2);

    let summary = summarize(&provider, &transcript).await.unwrap();
    assert_eq!(summary.key_points, "- Shipped the release");
    assert_eq!(summary.next_steps, "- Plan the retro");

    let calls = provider.calls();
    let chunk_calls = calls
        .iter()
        .filter(|call| call.options.model == DEFAULT_CHUNK_MODEL)
        .count();
    let final_calls: Vec<_> = calls
        .iter()
        .filter(|call| call.options.model == DEFAULT_FINAL_MODEL)
        .collect();

    assert_eq!(chunk_calls, 3);
    assert_eq!(final_calls.len(), 1);
    assert!(final_calls[0].user.contains("P1\n\nP2\n\nP3"));
}

#[tokio::test]
async fn failing_chunk_aborts_before_aggregation() {
    let provider = ScriptedProvider::new(|call| {
        if call.options.model == DEFAULT_FINAL_MODEL {
            return Ok("Key Points:\nnever\nNext Steps:\nnever".to_string());
        }
        if call.user.contains("Topic 30") {
            return Err(ProviderError::Api {
                status: 500,
                body: "upstream exploded".to_string(),
            });
        }
        chunk_reply(&call.user)
    });

    let err = summarize(&provider, &long_transcript()).await.unwrap_err();

    match err {
        SummarizationError::Segment { index, ref source } => {
            assert_eq!(index, 1);
            assert!(matches!(source, ProviderError::Api { status: 500, .. }));
        }
        other => panic!("expected segment error, got {other:?}"),
    }
    assert!(provider
        .calls()
        .iter()
        .all(|call| call.options.model != DEFAULT_FINAL_MODEL));
}

#[tokio::test]
async fn bounded_concurrency_keeps_chunk_order() {
    let provider = ScriptedProvider::new(|call| {
        if call.options.model == DEFAULT_FINAL_MODEL {
            Ok(format!("Key Points:\n{}\nNext Steps:\nnone", call.user.len()))
        } else {
            chunk_reply(&call.user)
        }
    });
    let config = SummaryConfig {
        concurrency: 1,
        ..SummaryConfig::default()
    };

    let summary = SummaryPipeline::new(&provider, config)
        .summarize(&long_transcript())
        .await
        .unwrap();

    assert_eq!(summary.next_steps, "none");
    let last = provider.calls().pop().unwrap();
    assert!(last.user.ends_with("P1\n\nP2\n\nP3"));
}

#[tokio::test]
async fn blank_transcript_makes_no_calls() {
    let provider = ScriptedProvider::replying("unused");

    let summary = summarize(&provider, "").await.unwrap();

    assert!(summary.is_empty());
    assert_eq!(provider.call_count(), 0);
}

/// Answers chunk calls after a delay that shrinks with chunk position, so
/// later chunks finish first. Tracks how many calls overlap.
#[derive(Default)]
struct SlowFirstProvider {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

#[async_trait]
impl CompletionProvider for SlowFirstProvider {
    async fn complete(
        &self,
        _system: &str,
        user: &str,
        options: &CompletionOptions,
    ) -> ProviderResult<String> {
        if options.model == DEFAULT_FINAL_MODEL {
            let combined = user.rsplit("Transcript:\n").next().unwrap_or_default();
            return Ok(format!("Key Points:\n{combined}"));
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let (delay_ms, reply) = if user.contains("Topic 00") {
            (60, chunk_reply(user))
        } else if user.contains("Topic 25") {
            (40, chunk_reply(user))
        } else {
            (20, chunk_reply(user))
        };
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        reply
    }
}

#[tokio::test]
async fn partials_keep_chunk_order_when_later_chunks_finish_first() {
    let provider = SlowFirstProvider::default();

    let summary = summarize(&provider, &long_transcript()).await.unwrap();

    assert_eq!(summary.key_points, "P1\n\nP2\n\nP3");
    assert_eq!(summary.next_steps, "");
    assert!(
        provider.max_in_flight.load(Ordering::SeqCst) > 1,
        "chunk calls should overlap"
    );
}

#[tokio::test]
async fn concurrency_limit_bounds_in_flight_calls() {
    let provider = SlowFirstProvider::default();
    let config = SummaryConfig {
        concurrency: 2,
        ..SummaryConfig::default()
    };

    let summary = SummaryPipeline::new(&provider, config)
        .summarize(&long_transcript())
        .await
        .unwrap();

    assert_eq!(summary.key_points, "P1\n\nP2\n\nP3");
    assert_eq!(provider.max_in_flight.load(Ordering::SeqCst), 2);
}
