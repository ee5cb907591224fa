use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use letrasgo::config::Config;

mod cli;

#[derive(Parser)]
#[command(name = "letrasgo")]
#[command(about = "LetrasGo - build words from syllables and sentences from words")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.letrasgo/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the game server (default)
    Serve,

    /// Load puzzle content into the database
    Seed {
        /// JSON file with puzzle entries (defaults to the built-in sample set)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Write a commented config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Play in the terminal against a running server
    Play {
        /// Server base URL
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        server: String,

        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,

        /// Create the account instead of signing in
        #[arg(long)]
        register: bool,

        /// No terminal bell
        #[arg(long)]
        mute: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    match cli.command {
        Some(Commands::Init { force }) => {
            cli::init::init_command(cli.config, force).await?;
        }
        Some(Commands::Seed { file }) => {
            let config = Config::load(cli.config.as_deref())?;
            cli::seed::seed_command(&config, file.as_deref()).await?;
        }
        Some(Commands::Play {
            server,
            username,
            password,
            register,
            mute,
        }) => {
            let config = Config::load(cli.config.as_deref())?;
            cli::play::play_command(cli::play::PlayOptions {
                server,
                username,
                password,
                register,
                muted: mute,
                points_per_puzzle: config.game.points_per_puzzle,
            })
            .await?;
        }
        Some(Commands::Serve) | None => {
            let config = Config::load(cli.config.as_deref())?;
            cli::serve::serve_command(config).await?;
        }
    }

    Ok(())
}
