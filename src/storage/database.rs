//! SQLite database management

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::config::Settings;
use crate::storage::models::{Meeting, MeetingState};

/// Database wrapper for recap
pub struct Database {
    conn: Connection,
}

const CURRENT_SCHEMA_VERSION: i64 = 1;

const MEETING_COLUMNS: &str = "id, title, created_at, updated_at, audio_path, transcript, key_points, next_steps, state, error_message";

impl Database {
    /// Open or create the database
    pub fn open(settings: &Settings) -> Result<Self> {
        let db_path = settings.database_path();

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Self::open_path(&db_path)
    }

    /// Open database at a specific path (useful for testing)
    pub fn open_path(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize database schema
    fn initialize(&self) -> Result<()> {
        let current_version = self.schema_version()?;
        if current_version > CURRENT_SCHEMA_VERSION {
            anyhow::bail!(
                "Database schema version {} is newer than supported version {}",
                current_version,
                CURRENT_SCHEMA_VERSION
            );
        }

        if current_version < 1 {
            self.migrate_to_v1()?;
            self.set_schema_version(1)?;
        }

        Ok(())
    }

    /// Current schema version tracked in PRAGMA user_version.
    pub fn schema_version(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))?)
    }

    fn set_schema_version(&self, version: i64) -> Result<()> {
        self.conn
            .execute_batch(&format!("PRAGMA user_version = {};", version))?;
        Ok(())
    }

    fn migrate_to_v1(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS meetings (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                audio_path TEXT,
                transcript TEXT,
                key_points TEXT,
                next_steps TEXT,
                state TEXT NOT NULL DEFAULT 'processing',
                error_message TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_meetings_created_at
                ON meetings(created_at DESC);
            CREATE INDEX IF NOT EXISTS idx_meetings_state
                ON meetings(state);
            "#,
        )?;

        Ok(())
    }

    /// Insert a new meeting
    pub fn insert_meeting(&self, meeting: &Meeting) -> Result<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO meetings ({MEETING_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            ),
            params![
                meeting.id,
                meeting.title,
                meeting.created_at.timestamp(),
                meeting.updated_at.timestamp(),
                meeting.audio_path,
                meeting.transcript,
                meeting.key_points,
                meeting.next_steps,
                meeting.state.as_str(),
                meeting.error_message,
            ],
        )?;

        Ok(())
    }

    /// Update a meeting, refreshing `updated_at`
    pub fn update_meeting(&self, meeting: &Meeting) -> Result<()> {
        self.conn.execute(
            r#"
            UPDATE meetings
            SET title = ?2, updated_at = ?3, audio_path = ?4, transcript = ?5,
                key_points = ?6, next_steps = ?7, state = ?8, error_message = ?9
            WHERE id = ?1
            "#,
            params![
                meeting.id,
                meeting.title,
                Utc::now().timestamp(),
                meeting.audio_path,
                meeting.transcript,
                meeting.key_points,
                meeting.next_steps,
                meeting.state.as_str(),
                meeting.error_message,
            ],
        )?;

        Ok(())
    }

    /// Get a meeting by ID
    pub fn get_meeting(&self, id: &str) -> Result<Option<Meeting>> {
        let meeting = self
            .conn
            .query_row(
                &format!("SELECT {MEETING_COLUMNS} FROM meetings WHERE id = ?1"),
                params![id],
                Self::row_to_meeting,
            )
            .optional()?;

        Ok(meeting)
    }

    /// Find a meeting by ID prefix
    pub fn find_meeting_by_prefix(&self, prefix: &str) -> Result<Option<Meeting>> {
        if prefix.is_empty() {
            return Ok(None);
        }
        let pattern = format!("{}%", escape_like(prefix));

        let meeting = self
            .conn
            .query_row(
                &format!(
                    "SELECT {MEETING_COLUMNS} FROM meetings WHERE id LIKE ?1 ESCAPE '\\' ORDER BY created_at DESC LIMIT 1"
                ),
                params![pattern],
                Self::row_to_meeting,
            )
            .optional()?;

        Ok(meeting)
    }

    /// List meetings, newest first
    pub fn list_meetings(&self, limit: usize) -> Result<Vec<Meeting>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {MEETING_COLUMNS} FROM meetings ORDER BY created_at DESC, rowid DESC LIMIT ?1"
        ))?;

        let meetings = stmt
            .query_map(params![limit as i64], Self::row_to_meeting)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(meetings)
    }

    /// Search meetings by title or transcript text
    pub fn search_meetings(&self, query: &str, limit: usize) -> Result<Vec<Meeting>> {
        let pattern = format!("%{}%", escape_like(query));

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {MEETING_COLUMNS}
             FROM meetings
             WHERE title LIKE ?1 ESCAPE '\\' OR transcript LIKE ?1 ESCAPE '\\'
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?2"
        ))?;

        let meetings = stmt
            .query_map(params![pattern, limit as i64], Self::row_to_meeting)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(meetings)
    }

    /// Update meeting state and error message
    pub fn update_meeting_state(
        &self,
        id: &str,
        state: MeetingState,
        error_message: Option<&str>,
    ) -> Result<()> {
        self.conn.execute(
            "UPDATE meetings SET state = ?2, error_message = ?3, updated_at = ?4 WHERE id = ?1",
            params![id, state.as_str(), error_message, Utc::now().timestamp()],
        )?;
        Ok(())
    }

    /// Delete a meeting
    pub fn delete_meeting(&self, id: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM meetings WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn row_to_meeting(row: &rusqlite::Row) -> rusqlite::Result<Meeting> {
        let created_timestamp: i64 = row.get(2)?;
        let updated_timestamp: i64 = row.get(3)?;
        let state_str: String = row.get(8)?;

        Ok(Meeting {
            id: row.get(0)?,
            title: row.get(1)?,
            created_at: timestamp_to_datetime(created_timestamp),
            updated_at: timestamp_to_datetime(updated_timestamp),
            audio_path: row.get(4)?,
            transcript: row.get(5)?,
            key_points: row.get(6)?,
            next_steps: row.get(7)?,
            state: state_str.parse().unwrap_or(MeetingState::Failed),
            error_message: row.get(9)?,
        })
    }

    /// Get database statistics
    pub fn get_stats(&self) -> Result<DatabaseStats> {
        let (total, ready, failed): (i64, i64, i64) = self.conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(state = 'ready'), 0),
                    COALESCE(SUM(state = 'failed'), 0)
             FROM meetings",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        Ok(DatabaseStats {
            total_meetings: total as usize,
            ready_meetings: ready as usize,
            failed_meetings: failed as usize,
        })
    }
}

/// Escape `LIKE` wildcards so user input matches literally (with `ESCAPE '\'`).
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn timestamp_to_datetime(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DatabaseStats {
    pub total_meetings: usize,
    pub ready_meetings: usize,
    pub failed_meetings: usize,
}
