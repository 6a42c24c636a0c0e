use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::chat::Exchange;
use crate::core::AppConfig;

pub mod chat;
pub mod perms;
pub mod voice;

#[derive(Subcommand)]
enum Command {
    /// Chat by typing questions, `exit` to quit
    Chat {},
    /// Chat using audio files dropped at the staging path
    Voice {
        /// Where the recorder drops audio files
        #[arg(long)]
        staging_path: Option<String>,

        /// How often to check for a new audio file
        #[arg(long)]
        poll_interval_ms: Option<u64>,
    },
    /// Print the permission bits of a file
    Perms { path: PathBuf },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub(crate) fn print_exchange(exchange: &Exchange) {
    println!("Answer: {}", exchange.reply);
    println!("total token: {}", exchange.usage.total_tokens);
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    init_tracing();

    let mut config = AppConfig::default();
    tracing::debug!("Loaded config {:?}", config);

    // Handle each sub command
    match args.command {
        Some(Command::Chat {}) | None => {
            chat::run(&config).await?;
        }
        Some(Command::Voice {
            staging_path,
            poll_interval_ms,
        }) => {
            if let Some(staging_path) = staging_path {
                config.staging_path = staging_path;
            }
            if let Some(poll_interval_ms) = poll_interval_ms {
                config.poll_interval_ms = poll_interval_ms;
            }
            voice::run(&config).await?;
        }
        Some(Command::Perms { path }) => {
            perms::run(&path)?;
        }
    }

    Ok(())
}
