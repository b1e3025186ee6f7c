//! Storage module for recap
//!
//! Keeps meetings, transcripts, and notes in a local SQLite database.

mod database;
mod models;
mod repository;

pub use database::{Database, DatabaseStats};
pub use models::{Meeting, MeetingState};
pub use repository::Repository;
