//! gptman - manage OpenAI assistants as local Markdown prompt files.
//!
//! Main entry point for the gptman CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

mod commands;
mod shell;

use commands::assistant;

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// gptman - manage OpenAI assistants as local Markdown prompt files
#[derive(Parser)]
#[command(name = "gptman")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings profile to use (default: the [gptman] section)
    #[arg(long, global = true, env = "GPTMAN_PROFILE")]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage assistants
    Assistant(assistant::AssistantArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = init_tracing(cli.verbose);

    let ctx = commands::Context {
        profile: cli.profile,
    };

    match cli.command {
        Commands::Assistant(args) => assistant::run(args, &ctx).await,
    }
}

/// Console logging on stderr plus a daily JSON log file.
///
/// The file layer is skipped when the log directory cannot be created.
fn init_tracing(verbose: bool) -> Option<WorkerGuard> {
    use tracing_subscriber::prelude::*;

    let filter = if verbose {
        "gptman=debug,gptman_client=debug,gptman_config=debug,gptman_prompt=debug,info"
    } else {
        "gptman=warn,gptman_client=warn,gptman_config=warn,gptman_prompt=warn,warn"
    };

    let file_appender = gptman_config::config_dir()
        .map(|dir| dir.join("logs"))
        .and_then(|log_dir| {
            RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("gptman.log")
                .build(&log_dir)
                .ok()
        });
    let (file_layer, guard) = match file_appender {
        Some(appender) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "gptman=trace,gptman_client=trace,gptman_config=trace,gptman_prompt=trace,info",
                ));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(file_layer)
        .init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_shell_by_id() {
        let args = ["gptman", "-v", "assistant", "shell", "--id", "asst_1"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.verbose);
        let Commands::Assistant(args) = cli.command;
        match args.command {
            assistant::AssistantCommand::Shell(target) => {
                assert_eq!(target.id.as_deref(), Some("asst_1"));
                assert!(target.path.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_target_requires_exactly_one() {
        let neither = ["gptman", "assistant", "describe"];
        assert!(Cli::try_parse_from(neither).is_err());
        let both = ["gptman", "assistant", "describe", "a.md", "--id", "a1"];
        assert!(Cli::try_parse_from(both).is_err());
    }

    #[test]
    fn test_profile_flag_is_global() {
        let args = ["gptman", "assistant", "list", "--profile", "work", "-l"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.profile.as_deref(), Some("work"));
    }
}
