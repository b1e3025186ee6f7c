//! CLI argument definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// recap - Meeting transcription and AI-powered meeting notes
#[derive(Parser, Debug)]
#[command(name = "recap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a transcript into key points and next steps
    Summarize {
        /// Transcript file ("-" or omitted reads stdin)
        input: Option<PathBuf>,

        /// Summarize a stored meeting's transcript and save the notes
        #[arg(short, long, conflicts_with = "input")]
        meeting: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a short title for a transcript
    Title {
        /// Transcript file ("-" or omitted reads stdin)
        input: Option<PathBuf>,
    },

    /// Transcribe an audio file and print the text
    Transcribe {
        /// Audio file to transcribe
        audio: PathBuf,
    },

    /// Transcribe, summarize, and store a meeting recording
    Process {
        /// Audio file of the meeting
        audio: PathBuf,

        /// Meeting title (generated from the transcript when omitted)
        #[arg(short, long)]
        title: Option<String>,
    },

    /// List stored meetings
    List {
        /// Maximum number of meetings to show
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Search term to filter by title or transcript
        #[arg(short, long)]
        search: Option<String>,
    },

    /// View a meeting's notes and transcript
    View {
        /// Meeting ID or partial ID
        id: String,
    },

    /// Rename a meeting
    Rename {
        /// Meeting ID or partial ID
        id: String,

        /// New title
        title: String,
    },

    /// Delete a meeting and its audio file
    Delete {
        /// Meeting ID or partial ID
        id: String,
    },

    /// Export a meeting to a file
    Export {
        /// Meeting ID or partial ID
        id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Txt)]
        format: ExportFormat,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Txt,
    Json,
    Md,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
