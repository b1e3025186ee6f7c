//! Prompt text sent to the completion provider.

/// System prompt shared by the chunk and final summary calls.
pub const SUMMARY_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that summarizes meeting transcripts.";

/// System prompt for title generation.
pub const TITLE_SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes meeting transcripts into short, concise titles (less than 10 words).";

/// Prompt for summarizing one transcript chunk.
pub fn build_chunk_prompt(chunk: &str) -> String {
    format!(
        "Summarize the following meeting transcript section, focusing on key points and next steps:\n\n{chunk}"
    )
}

/// Prompt asking for the final two-section summary as labeled plain text.
pub fn build_final_prompt(combined: &str) -> String {
    format!(
        "Summarize the following meeting transcript into two parts:\n\
1. Key Points: List the main points discussed\n\
2. Next Steps: List any action items or next steps mentioned\n\
\n\
Start the first part with the exact label \"Key Points:\" and the second part with the exact label \"Next Steps:\".\n\
If no next steps are mentioned, omit that section. Focus only on actionable and insightful content.\n\
\n\
Transcript:\n\
{combined}"
    )
}

/// Prompt asking for the final two-section summary as a JSON object.
pub fn build_final_json_prompt(combined: &str) -> String {
    format!(
        "Summarize the following meeting transcript into two parts:\n\
1. keyPoints: the main points discussed\n\
2. nextSteps: any action items or next steps mentioned\n\
\n\
Respond with a single JSON object of the form {{\"keyPoints\": \"...\", \"nextSteps\": \"...\"}}.\n\
If no next steps are mentioned, set \"nextSteps\" to an empty string. Focus only on actionable and insightful content.\n\
\n\
Transcript:\n\
{combined}"
    )
}

/// Prompt for a short meeting title.
pub fn build_title_prompt(transcript: &str) -> String {
    format!(
        "Generate a title for the following meeting transcript, less than 10 words: \"{transcript}\""
    )
}
