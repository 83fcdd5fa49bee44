mod cli;
mod command;
mod config;
mod input;
mod repl;
mod terminal;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

use fleet_client::{FleetApi, FleetClient, FleetDispatcher};
use fleet_scheduler::TaskScheduler;

use crate::cli::CliArgs;
use crate::config::CliConfig;
use crate::input::StdinInput;
use crate::repl::Repl;
use crate::terminal::Terminal;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    dotenvy::dotenv().ok();
    let args = CliArgs::parse();

    // Load config
    let config = CliConfig::load(args.config.as_deref())
        .context("failed to load configuration")?;
    let base_url = config.resolve_base_url(args.base_url.as_deref());
    let timeout = args
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.request_timeout());

    let mut terminal = Terminal::stdout();
    terminal.print_banner(&base_url)?;

    let client = FleetClient::new(&base_url, timeout).context("invalid fleet service url")?;
    let api: Arc<dyn FleetApi> = Arc::new(client);

    let session = match api.start_session().await {
        Ok(session) => session,
        Err(e) => {
            terminal.print_error("Failed to initialize system")?;
            return Err(e).context("could not start a fleet session");
        }
    };
    terminal.print_session(&session)?;

    // The first Ctrl-C stops the command loop; a second one exits at once.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        info!("Received interrupt, shutting down");
        let _ = shutdown_tx.send(true);
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received second interrupt, exiting");
            std::process::exit(130);
        }
    });

    let scheduler = Arc::new(TaskScheduler::new());
    let dispatcher = FleetDispatcher::new(api, session);
    let mut repl = Repl::new(dispatcher, scheduler, terminal)
        .with_default_priority(config.default_priority)
        .with_drain_on_exit(config.drain_on_exit);
    repl.terminal_mut().print_menu()?;

    let mut input = StdinInput::spawn();
    let reason = repl.run(&mut input, shutdown_rx).await?;
    info!(?reason, "Command loop finished");

    repl.terminal_mut().print_info("Goodbye.")?;
    Ok(())
}
