//! Velaa CLI - warehouse registration and sign-in from the terminal.

mod commands;
mod config;
mod error;
mod terminal;

use crate::commands::Commands;
use crate::config::Config;
use crate::error::AppResult;
use crate::terminal::TerminalSink;
use anyhow::Context;
use clap::Parser;
use registration_flow::{RegistrationFlow, SessionStore};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use velaa_client::VelaaClient;

/// Register a Velaa warehouse account, sign in, or recover a password.
///
/// Progress is kept between invocations, so each step is its own command.
#[derive(Parser, Debug)]
#[command(name = "velaa", version, about)]
struct Cli {
    /// Answer from the built-in demo backend instead of the server
    #[arg(long, global = true)]
    demo: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("Command failed: {:?}", e);
            terminal::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let mut config = Config::load().context("Failed to load configuration")?;
    if cli.demo {
        config.api.demo_mode = true;
    }

    init_logging(&config.log.level);
    debug!("Configuration: {:?}", config);

    let client = VelaaClient::new(&config.api.client_config())?
        .with_presentation(Arc::new(TerminalSink::new()));
    info!(
        "Using {} ({:?} mode)",
        config.api.base_url,
        client.mode()
    );

    let store = if cli.command.needs_session() {
        SessionStore::file(&config.session.path)
    } else {
        SessionStore::memory()
    };
    let mut flow = RegistrationFlow::open(client, store).await?;

    commands::execute(cli.command, &mut flow).await
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
