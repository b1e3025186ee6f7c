//! recap - Meeting transcription and AI-powered meeting notes
//!
//! Entry point for the recap CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use recap::cli::commands;
use recap::cli::{Cli, Commands};
use recap::config::Settings;
use recap::VERSION;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Completions { shell } => {
            commands::print_completions(shell);
        }
        command => {
            // Load configuration only for runtime commands.
            let settings = Settings::load()?;

            let default_level = if cli.verbose {
                "debug"
            } else {
                settings.general.log_level.as_str()
            };
            init_logging(default_level);
            tracing::debug!(
                version = VERSION,
                data_dir = %settings.general.data_dir.display(),
                "Settings loaded"
            );

            match command {
                Commands::Summarize {
                    input,
                    meeting,
                    json,
                } => {
                    commands::summarize_transcript(&settings, input, meeting, json).await?;
                }
                Commands::Title { input } => {
                    commands::title_transcript(&settings, input).await?;
                }
                Commands::Transcribe { audio } => {
                    commands::transcribe_audio(&settings, &audio).await?;
                }
                Commands::Process { audio, title } => {
                    commands::process_recording(&settings, &audio, title).await?;
                }
                Commands::List { limit, search } => {
                    commands::list_meetings(&settings, limit, search)?;
                }
                Commands::View { id } => {
                    commands::view_meeting(&settings, &id)?;
                }
                Commands::Rename { id, title } => {
                    commands::rename_meeting(&settings, &id, &title)?;
                }
                Commands::Delete { id } => {
                    commands::delete_meeting(&settings, &id)?;
                }
                Commands::Export { id, format, output } => {
                    commands::export_meeting(&settings, &id, format, output)?;
                }
                Commands::Config(config_cmd) => {
                    commands::config_command(&settings, config_cmd)?;
                }
                Commands::Completions { .. } => unreachable!(),
            }
        }
    }

    Ok(())
}

/// Initialize logging. `RUST_LOG` wins over the configured level.
fn init_logging(default_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
