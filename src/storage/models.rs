//! Data models for storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::summarize::FinalSummary;

/// Processing state of a meeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingState {
    /// Transcription or summarization in progress
    Processing,
    /// Transcript and notes are available
    Ready,
    /// Processing failed; see `error_message`
    Failed,
}

impl MeetingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for MeetingState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(Self::Processing),
            "ready" => Ok(Self::Ready),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown meeting state: {other}")),
        }
    }
}

/// A recorded meeting and its notes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    /// Unique identifier (UUID)
    pub id: String,

    /// User-provided or generated title
    pub title: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,

    /// Path to the source audio file
    pub audio_path: Option<String>,

    /// Full transcript text
    pub transcript: Option<String>,

    pub key_points: Option<String>,

    pub next_steps: Option<String>,

    /// Current state
    pub state: MeetingState,

    /// Last processing error, if any
    pub error_message: Option<String>,
}

impl Meeting {
    /// Create a new meeting with the given title
    pub fn new(title: String) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            created_at: now,
            updated_at: now,
            audio_path: None,
            transcript: None,
            key_points: None,
            next_steps: None,
            state: MeetingState::Processing,
            error_message: None,
        }
    }

    /// Short ID for display
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }

    /// Stored notes as a summary, if the meeting has been summarized
    pub fn summary(&self) -> Option<FinalSummary> {
        self.key_points.as_ref().map(|key_points| FinalSummary {
            key_points: key_points.clone(),
            next_steps: self.next_steps.clone().unwrap_or_default(),
        })
    }

    pub fn set_summary(&mut self, summary: &FinalSummary) {
        self.key_points = Some(summary.key_points.clone());
        self.next_steps = Some(summary.next_steps.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_round_trips_through_str() {
        for state in [MeetingState::Processing, MeetingState::Ready, MeetingState::Failed] {
            assert_eq!(state.as_str().parse::<MeetingState>(), Ok(state));
        }
        assert!("recording".parse::<MeetingState>().is_err());
    }

    #[test]
    fn new_meeting_is_processing_without_notes() {
        let meeting = Meeting::new("Standup".to_string());
        assert_eq!(meeting.state, MeetingState::Processing);
        assert_eq!(meeting.short_id().len(), 8);
        assert!(meeting.summary().is_none());
    }

    #[test]
    fn summary_accessors_round_trip() {
        let mut meeting = Meeting::new("Planning".to_string());
        let summary = FinalSummary {
            key_points: "Scope agreed".to_string(),
            next_steps: String::new(),
        };

        meeting.set_summary(&summary);

        assert_eq!(meeting.summary(), Some(summary));
    }
}
