//! CLI command implementations

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, ConfigCommand, ExportFormat};
use crate::config::Settings;
use crate::llm::{
    build_completion_provider, build_transcription_provider, AudioUpload, CompletionProvider,
    TranscriptionProvider,
};
use crate::storage::{Meeting, Repository};
use crate::summarize::{
    generate_title, title_options, FinalSummary, SummaryConfig, SummaryPipeline,
};

/// Title used until a real one is known
const PLACEHOLDER_TITLE: &str = "New Meeting";

/// Summarize a transcript file, stdin, or a stored meeting
pub async fn summarize_transcript(
    settings: &Settings,
    input: Option<PathBuf>,
    meeting: Option<String>,
    json: bool,
) -> Result<()> {
    let stored = match meeting.as_deref() {
        Some(id) => {
            let repo = Repository::new(settings)?;
            let meeting = repo.find(id)?.context("Meeting not found")?;
            Some((repo, meeting))
        }
        None => None,
    };

    let transcript = match &stored {
        Some((_, meeting)) => meeting.transcript.clone().with_context(|| {
            format!("No transcript available for meeting {}", meeting.short_id())
        })?,
        None => read_transcript(input.as_deref())?,
    };
    if transcript.trim().is_empty() {
        anyhow::bail!("No transcript provided");
    }

    let provider = build_completion_provider(settings)?;
    let summary = SummaryPipeline::new(provider.as_ref(), SummaryConfig::from_settings(settings))
        .summarize(&transcript)
        .await
        .context("Failed to summarize transcript")?;

    if let Some((repo, meeting)) = &stored {
        repo.record_summary(&meeting.id, &summary)?;
        eprintln!("Summary saved for {}", meeting.short_id());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", format_summary(&summary));
    }

    Ok(())
}

/// Generate a title for a transcript
pub async fn title_transcript(settings: &Settings, input: Option<PathBuf>) -> Result<()> {
    let transcript = read_transcript(input.as_deref())?;
    if transcript.trim().is_empty() {
        anyhow::bail!("No transcript provided");
    }

    let provider = build_completion_provider(settings)?;
    let title = generate_title(provider.as_ref(), &transcript, &title_options(settings))
        .await
        .context("Failed to generate title")?;

    println!("{}", title);
    Ok(())
}

/// Transcribe an audio file and print the text
pub async fn transcribe_audio(settings: &Settings, audio: &Path) -> Result<()> {
    let upload = AudioUpload::read(audio, settings.transcription.max_upload_bytes)?;
    let provider = build_transcription_provider(settings)?;

    let text = provider
        .transcribe(&upload)
        .await
        .context("Failed to transcribe audio")?;

    println!("{}", text);
    Ok(())
}

/// Transcribe, summarize, title, and store a meeting recording
pub async fn process_recording(
    settings: &Settings,
    audio: &Path,
    title: Option<String>,
) -> Result<()> {
    let upload = AudioUpload::read(audio, settings.transcription.max_upload_bytes)?;
    let transcriber = build_transcription_provider(settings)?;
    let completer = build_completion_provider(settings)?;

    settings.ensure_dirs()?;
    let repo = Repository::new(settings)?;

    let meeting = record_meeting(
        settings,
        &repo,
        &upload,
        transcriber.as_ref(),
        completer.as_ref(),
        title,
    )
    .await?;

    println!("Meeting ready: {} ({})", meeting.title, meeting.short_id());
    println!();
    if let Some(summary) = meeting.summary() {
        print!("{}", format_summary(&summary));
    }
    Ok(())
}

/// Create the meeting row and run every processing step against it. Any
/// failure after the row exists leaves the meeting marked failed.
async fn record_meeting(
    settings: &Settings,
    repo: &Repository,
    upload: &AudioUpload,
    transcriber: &dyn TranscriptionProvider,
    completer: &dyn CompletionProvider,
    title: Option<String>,
) -> Result<Meeting> {
    let generate = title.is_none();
    let meeting =
        repo.create_meeting(title.unwrap_or_else(|| PLACEHOLDER_TITLE.to_string()), None)?;

    println!("Processing meeting {}...", meeting.short_id());

    let result = run_processing(
        settings,
        repo,
        &meeting,
        upload,
        transcriber,
        completer,
        generate,
    )
    .await;

    result.map_err(|err| {
        let message = format!("{:#}", err);
        tracing::error!(id = %meeting.id, error = %message, "Meeting processing failed");
        if let Err(mark_err) = repo.mark_failed(&meeting.id, &message) {
            tracing::error!(
                id = %meeting.id,
                error = %format!("{:#}", mark_err),
                "Failed to mark meeting as failed"
            );
        }
        err.context(format!("Failed to process meeting {}", meeting.short_id()))
    })
}

async fn run_processing(
    settings: &Settings,
    repo: &Repository,
    meeting: &Meeting,
    upload: &AudioUpload,
    transcriber: &dyn TranscriptionProvider,
    completer: &dyn CompletionProvider,
    generate: bool,
) -> Result<Meeting> {
    let id = meeting.id.as_str();

    let stored_audio = settings
        .audio_dir()
        .join(format!("{}-{}", meeting.short_id(), upload.file_name));
    std::fs::write(&stored_audio, &upload.bytes)
        .with_context(|| format!("Failed to store audio: {}", stored_audio.display()))?;
    repo.attach_audio(id, &stored_audio.display().to_string())?;

    let transcript = transcriber
        .transcribe(upload)
        .await
        .context("Failed to transcribe audio")?;
    repo.record_transcript(id, &transcript)?;

    let summary = SummaryPipeline::new(completer, SummaryConfig::from_settings(settings))
        .summarize(&transcript)
        .await
        .context("Failed to summarize transcript")?;
    repo.record_summary(id, &summary)?;

    if generate {
        let title = generate_title(completer, &transcript, &title_options(settings))
            .await
            .context("Failed to generate title")?;
        repo.rename(id, &title)?;
    }

    repo.mark_ready(id)?;
    repo.get(id)?.context("Meeting not found")
}

/// List stored meetings
pub fn list_meetings(settings: &Settings, limit: usize, search: Option<String>) -> Result<()> {
    let repo = Repository::new(settings)?;

    let meetings = match search {
        Some(query) => repo.search(&query, limit)?,
        None => repo.list_recent(limit)?,
    };

    if meetings.is_empty() {
        println!("No meetings found");
        return Ok(());
    }

    println!("{:<10} {:<30} {:<12} {:<10}", "ID", "Title", "Date", "State");
    println!("{}", "-".repeat(65));

    for meeting in meetings {
        println!(
            "{:<10} {:<30} {:<12} {:<10}",
            meeting.short_id(),
            truncate(&meeting.title, 28),
            meeting.created_at.format("%Y-%m-%d"),
            meeting.state.as_str()
        );
    }

    Ok(())
}

/// View a meeting's notes and transcript
pub fn view_meeting(settings: &Settings, id: &str) -> Result<()> {
    let repo = Repository::new(settings)?;
    let meeting = repo.find(id)?.context("Meeting not found")?;

    println!("Title: {}", meeting.title);
    println!("Date: {}", meeting.created_at.format("%Y-%m-%d %H:%M"));
    println!("State: {}", meeting.state.as_str());
    if let Some(error) = meeting.error_message.as_deref() {
        println!("Error: {}", error);
    }
    println!();

    match meeting.summary() {
        Some(summary) => print!("{}", format_summary(&summary)),
        None => println!("(No summary available yet)"),
    }
    println!();

    match meeting.transcript.as_deref() {
        Some(transcript) => {
            println!("Transcript:");
            println!("{}", transcript);
        }
        None => println!("(No transcript available yet)"),
    }

    Ok(())
}

/// Rename a meeting
pub fn rename_meeting(settings: &Settings, id: &str, title: &str) -> Result<()> {
    let title = title.trim();
    if title.is_empty() {
        anyhow::bail!("Title must not be empty");
    }

    let repo = Repository::new(settings)?;
    let meeting = repo.find(id)?.context("Meeting not found")?;
    let meeting = repo.rename(&meeting.id, title)?;

    println!("Renamed {} to: {}", meeting.short_id(), meeting.title);
    Ok(())
}

/// Delete a meeting
pub fn delete_meeting(settings: &Settings, id: &str) -> Result<()> {
    let repo = Repository::new(settings)?;
    let meeting = repo.find(id)?.context("Meeting not found")?;

    repo.delete(&meeting.id)?;

    println!("Deleted: {} ({})", meeting.title, meeting.short_id());
    Ok(())
}

/// Export a meeting to a file
pub fn export_meeting(
    settings: &Settings,
    id: &str,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let repo = Repository::new(settings)?;
    let meeting = repo.find(id)?.context("Meeting not found")?;

    let content = match format {
        ExportFormat::Txt => export_as_txt(&meeting),
        ExportFormat::Json => serde_json::to_string_pretty(&meeting)? + "\n",
        ExportFormat::Md => export_as_markdown(&meeting),
    };

    if let Some(path) = output {
        std::fs::write(&path, content)?;
        println!("Exported to: {}", path.display());
    } else {
        print!("{}", content);
    }

    Ok(())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let mut shown = settings.clone();
            if !shown.llm.api_key.is_empty() {
                shown.llm.api_key = "<redacted>".to_string();
            }
            let toml = toml::to_string_pretty(&shown)?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

/// Print completion script for the requested shell to stdout.
pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let command_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, command_name, &mut std::io::stdout());
}

// Helper functions

fn read_transcript(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript: {}", path.display())),
        _ => {
            let mut transcript = String::new();
            std::io::stdin()
                .read_to_string(&mut transcript)
                .context("Failed to read transcript from stdin")?;
            Ok(transcript)
        }
    }
}

fn format_summary(summary: &FinalSummary) -> String {
    let mut output = format!("Key Points:\n{}\n", summary.key_points);
    if !summary.next_steps.is_empty() {
        output.push_str(&format!("\nNext Steps:\n{}\n", summary.next_steps));
    }
    output
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn export_as_txt(meeting: &Meeting) -> String {
    let mut output = String::new();
    output.push_str(&format!("Title: {}\n", meeting.title));
    output.push_str(&format!(
        "Date: {}\n",
        meeting.created_at.format("%Y-%m-%d %H:%M")
    ));
    output.push_str("\n---\n\n");

    if let Some(summary) = meeting.summary() {
        output.push_str(&format_summary(&summary));
        output.push_str("\n---\n\n");
    }

    if let Some(transcript) = meeting.transcript.as_deref() {
        output.push_str(transcript);
        output.push('\n');
    }

    output
}

fn export_as_markdown(meeting: &Meeting) -> String {
    let mut output = format!(
        "# {}\n\n_{}_\n",
        meeting.title,
        meeting.created_at.format("%Y-%m-%d %H:%M")
    );

    if let Some(summary) = meeting.summary() {
        output.push_str(&format!("\n## Key Points\n\n{}\n", summary.key_points));
        if !summary.next_steps.is_empty() {
            output.push_str(&format!("\n## Next Steps\n\n{}\n", summary.next_steps));
        }
    }

    if let Some(transcript) = meeting.transcript.as_deref() {
        output.push_str(&format!("\n## Transcript\n\n{}\n", transcript));
    }

    output
}
