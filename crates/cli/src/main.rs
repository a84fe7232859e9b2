//! `syra` binary.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "syra", version, about = "Syra - a conversational assistant with tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug logging, plus tool results after each reply
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "SYRA_LOG_JSON")]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create ~/.syra/config.toml with default settings
    Onboard,

    /// Talk to the assistant, interactively or with one message
    Agent {
        /// Answer this message and exit
        #[arg(short, long)]
        message: Option<String>,

        /// Print each turn as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Show the capabilities the assistant can call
    Tools,
}

impl Commands {
    async fn run(self, verbose: bool) -> anyhow::Result<()> {
        match self {
            Self::Onboard => commands::onboard::run(),
            Self::Agent { message, json } => commands::agent::run(message, json, verbose).await,
            Self::Tools => commands::tools::run(),
        }
    }
}

/// `RUST_LOG` wins over `--verbose`. Output goes to stderr, replies to stdout.
fn init_tracing(verbose: bool, json: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.with_target(false).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);
    cli.command.run(cli.verbose).await
}
