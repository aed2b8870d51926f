//! Forgemirror CLI - mirror a GitHub account onto a self-hosted forge.

mod commands;
mod config;
mod progress;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::Term;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "forgemirror")]
#[command(version)]
#[command(about = "Mirror GitHub repositories onto a self-hosted Gitea or Forgejo instance")]
#[command(
    long_about = "Forgemirror lists every repository owned by a GitHub account and recreates \
each one on a Gitea-compatible instance, either as a continuously-syncing \
pull mirror or as a one-time clone. With force-sync enabled it also deletes \
destination mirrors whose source repository has disappeared."
)]
#[command(after_long_help = r#"EXAMPLES
    Mirror all repositories of an account:
        $ forgemirror run --account alice --gitea-host https://git.example.com

    One-time clones instead of syncing mirrors:
        $ forgemirror run --account alice --strategy clone

    Also prune destination mirrors that no longer exist upstream:
        $ forgemirror run --account alice --force-sync

    Generate shell completions:
        $ forgemirror completions bash > ~/.local/share/bash-completion/completions/forgemirror

CONFIGURATION
    Forgemirror reads configuration from:
      1. CLI flags
      2. Environment variables (FORGEMIRROR_* prefix, also via a .env file)
      3. ~/.config/forgemirror/config.toml (or $XDG_CONFIG_HOME equivalent)
      4. ./forgemirror.toml
    Missing required settings are prompted for on a terminal.

ENVIRONMENT VARIABLES
    FORGEMIRROR_ACCOUNT        GitHub account whose repositories are mirrored
    FORGEMIRROR_GITHUB_TOKEN   GitHub personal access token (optional; needed
                               for private repositories)
    FORGEMIRROR_GITEA_HOST     Base URL of the destination instance
    FORGEMIRROR_GITEA_OWNER    Destination owner (defaults to the account)
    FORGEMIRROR_GITEA_TOKEN    Destination personal access token
    FORGEMIRROR_STRATEGY       "mirror" (default) or "clone"
    FORGEMIRROR_FORCE_SYNC     "yes"/"y" to prune stale destination mirrors
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mirror the configured account's repositories
    Run {
        #[command(flatten)]
        args: RunArgs,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Generate man page(s)
    Man {
        /// Output directory for man pages (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Options for a mirror run, each falling back to the configuration.
#[derive(Debug, Clone, Default, clap::Args)]
struct RunArgs {
    /// GitHub account whose repositories are mirrored
    #[arg(short, long)]
    account: Option<String>,

    /// Base URL of the destination instance (e.g. https://git.example.com)
    #[arg(short = 'H', long)]
    gitea_host: Option<String>,

    /// Destination owner (user or organization); defaults to the account
    #[arg(short = 'o', long)]
    gitea_owner: Option<String>,

    /// "mirror" for syncing mirrors, "clone" for one-time copies
    #[arg(short, long)]
    strategy: Option<String>,

    /// Delete destination mirrors whose source repository is gone
    #[arg(short, long)]
    force_sync: bool,

    /// Fail on missing settings instead of prompting
    #[arg(short, long)]
    non_interactive: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Graceful shutdown handler (Ctrl+C).
    shutdown::setup_shutdown_handler();

    // Structured logging for non-TTY runs; the interactive reporter owns
    // terminal output otherwise.
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("forgemirror=info,forgemirror_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    let config = config::Config::load();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { args } => {
            commands::mirror::handle_run(args, &config).await?;
        }
        Commands::Completions { shell } => {
            commands::meta::handle_completions(shell)?;
        }
        Commands::Man { output } => {
            commands::meta::handle_man(output)?;
        }
    }

    Ok(())
}
