//! Repository pattern wrapper for database operations
//!
//! Provides the meeting processing workflow on top of [`Database`].

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Settings;
use crate::storage::{Database, Meeting, MeetingState};
use crate::summarize::FinalSummary;

/// Repository for managing meetings and their notes
pub struct Repository {
    db: Database,
}

impl Repository {
    /// Create a new repository
    pub fn new(settings: &Settings) -> Result<Self> {
        let db = Database::open(settings)?;
        Ok(Self { db })
    }

    pub fn from_database(db: Database) -> Self {
        Self { db }
    }

    /// Create a new meeting in the processing state
    pub fn create_meeting(&self, title: String, audio_path: Option<String>) -> Result<Meeting> {
        let mut meeting = Meeting::new(title);
        meeting.audio_path = audio_path;
        self.db.insert_meeting(&meeting)?;
        Ok(meeting)
    }

    /// Point a meeting at its stored audio file
    pub fn attach_audio(&self, id: &str, audio_path: &str) -> Result<Meeting> {
        let mut meeting = self.require(id)?;
        meeting.audio_path = Some(audio_path.to_string());
        self.db.update_meeting(&meeting)?;
        Ok(meeting)
    }

    /// Store the transcript for a meeting
    pub fn record_transcript(&self, id: &str, transcript: &str) -> Result<Meeting> {
        let mut meeting = self.require(id)?;
        meeting.transcript = Some(transcript.to_string());
        self.db.update_meeting(&meeting)?;
        Ok(meeting)
    }

    /// Store summary notes for a meeting
    pub fn record_summary(&self, id: &str, summary: &FinalSummary) -> Result<Meeting> {
        let mut meeting = self.require(id)?;
        meeting.set_summary(summary);
        self.db.update_meeting(&meeting)?;
        Ok(meeting)
    }

    /// Rename a meeting
    pub fn rename(&self, id: &str, title: &str) -> Result<Meeting> {
        let mut meeting = self.require(id)?;
        meeting.title = title.to_string();
        self.db.update_meeting(&meeting)?;
        Ok(meeting)
    }

    /// Mark processing as finished
    pub fn mark_ready(&self, id: &str) -> Result<()> {
        self.db.update_meeting_state(id, MeetingState::Ready, None)
    }

    /// Mark processing as failed, keeping the error for display
    pub fn mark_failed(&self, id: &str, error: &str) -> Result<()> {
        self.db
            .update_meeting_state(id, MeetingState::Failed, Some(error))
    }

    /// Get a meeting by ID
    pub fn get(&self, id: &str) -> Result<Option<Meeting>> {
        self.db.get_meeting(id)
    }

    /// Find meeting by ID prefix
    pub fn find(&self, prefix: &str) -> Result<Option<Meeting>> {
        self.db.find_meeting_by_prefix(prefix)
    }

    /// List recent meetings
    pub fn list_recent(&self, limit: usize) -> Result<Vec<Meeting>> {
        self.db.list_meetings(limit)
    }

    /// Search meetings by title or transcript
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<Meeting>> {
        self.db.search_meetings(query, limit)
    }

    /// Delete a meeting and its audio file
    pub fn delete(&self, id: &str) -> Result<()> {
        let meeting = self.require(id)?;

        if let Some(audio_path) = meeting.audio_path.as_deref() {
            let path = Path::new(audio_path);
            if path.exists() {
                std::fs::remove_file(path)
                    .with_context(|| format!("Failed to remove audio file: {}", path.display()))?;
            }
        }

        self.db.delete_meeting(&meeting.id)
    }

    fn require(&self, id: &str) -> Result<Meeting> {
        self.db
            .get_meeting(id)?
            .with_context(|| format!("Meeting not found: {}", id))
    }
}
