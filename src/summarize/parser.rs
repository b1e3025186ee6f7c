//! Section parsing for the aggregated summary
//!
//! The default contract is textual: the final completion labels its parts
//! `Key Points:` and `Next Steps:`. A missing `Next Steps:` marker is not an
//! error; `next_steps` is simply empty.

use serde::{Deserialize, Serialize};

pub const KEY_POINTS_MARKER: &str = "Key Points:";
pub const NEXT_STEPS_MARKER: &str = "Next Steps:";

/// The structured result of a summarization request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalSummary {
    pub key_points: String,
    #[serde(default)]
    pub next_steps: String,
}

impl FinalSummary {
    pub fn is_empty(&self) -> bool {
        self.key_points.is_empty() && self.next_steps.is_empty()
    }
}

/// Shape requested from the final completion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Free text with `Key Points:` / `Next Steps:` labels.
    #[default]
    Markers,
    /// A JSON object with `keyPoints` / `nextSteps`, falling back to markers.
    Json,
}

/// Parse raw aggregator output according to `format`.
pub fn parse(raw: &str, format: ResponseFormat) -> FinalSummary {
    match format {
        ResponseFormat::Markers => parse_sections(raw),
        ResponseFormat::Json => parse_structured(raw).unwrap_or_else(|| {
            tracing::warn!("Summary was not valid JSON, falling back to section markers");
            parse_sections(raw)
        }),
    }
}

/// Split free text on the literal `Next Steps:` marker.
pub fn parse_sections(raw: &str) -> FinalSummary {
    let (before, after) = match raw.split_once(NEXT_STEPS_MARKER) {
        Some((before, after)) => (before, after.trim()),
        None => (raw, ""),
    };

    let before = before.trim_start();
    let key_points = before.strip_prefix(KEY_POINTS_MARKER).unwrap_or(before);

    FinalSummary {
        key_points: key_points.trim().to_string(),
        next_steps: after.to_string(),
    }
}

/// Parse a JSON object response, tolerating a surrounding Markdown fence.
pub fn parse_structured(raw: &str) -> Option<FinalSummary> {
    let body = strip_code_fence(raw.trim());
    let parsed: FinalSummary = serde_json::from_str(body).ok()?;

    Some(FinalSummary {
        key_points: parsed.key_points.trim().to_string(),
        next_steps: parsed.next_steps.trim().to_string(),
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json") up to the first newline.
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_key_points_and_next_steps() {
        let parsed = parse_sections("Key Points:\nA\nB\n\nNext Steps:\nC");
        assert_eq!(
            parsed,
            FinalSummary {
                key_points: "A\nB".to_string(),
                next_steps: "C".to_string(),
            }
        );
    }

    #[test]
    fn missing_next_steps_yields_empty_string() {
        let parsed = parse_sections("Key Points:\nOnly this");
        assert_eq!(parsed.key_points, "Only this");
        assert_eq!(parsed.next_steps, "");
    }

    #[test]
    fn key_points_marker_is_optional() {
        let parsed = parse_sections("  We shipped v2.\nNext Steps:\n- Write docs  ");
        assert_eq!(parsed.key_points, "We shipped v2.");
        assert_eq!(parsed.next_steps, "- Write docs");
    }

    #[test]
    fn key_points_marker_only_stripped_at_start() {
        let parsed = parse_sections("Summary of Key Points: none");
        assert_eq!(parsed.key_points, "Summary of Key Points: none");
    }

    #[test]
    fn everything_after_first_next_steps_marker_is_kept() {
        let parsed = parse_sections("Key Points: A\nNext Steps: B\nNext Steps: C");
        assert_eq!(parsed.key_points, "A");
        assert_eq!(parsed.next_steps, "B\nNext Steps: C");
    }

    #[test]
    fn empty_input_parses_to_empty_summary() {
        assert!(parse_sections("").is_empty());
        assert!(parse_sections("   \n").is_empty());
    }

    #[test]
    fn structured_response_is_parsed() {
        let raw = r#"{"keyPoints": " Budget approved ", "nextSteps": "Send invoice"}"#;
        let parsed = parse_structured(raw).unwrap();
        assert_eq!(parsed.key_points, "Budget approved");
        assert_eq!(parsed.next_steps, "Send invoice");
    }

    #[test]
    fn structured_response_tolerates_code_fence_and_missing_next_steps() {
        let raw = "```json\n{\"keyPoints\": \"Hiring paused\"}\n```";
        let parsed = parse_structured(raw).unwrap();
        assert_eq!(parsed.key_points, "Hiring paused");
        assert_eq!(parsed.next_steps, "");
    }

    #[test]
    fn json_format_falls_back_to_markers() {
        let parsed = parse("Key Points:\nA\n\nNext Steps:\nB", ResponseFormat::Json);
        assert_eq!(parsed.key_points, "A");
        assert_eq!(parsed.next_steps, "B");
    }

    #[test]
    fn marker_format_does_not_interpret_json() {
        let raw = r#"{"keyPoints": "A"}"#;
        assert_eq!(parse(raw, ResponseFormat::Markers).key_points, raw);
    }

    #[test]
    fn final_summary_serializes_camel_case() {
        let summary = FinalSummary {
            key_points: "A".to_string(),
            next_steps: String::new(),
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert_eq!(json, r#"{"keyPoints":"A","nextSteps":""}"#);
    }
}
