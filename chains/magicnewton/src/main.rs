use newton_project::batch::{run_batch_until, run_daily_schedule, Script};
use newton_project::config::NewtonConfig;
use newton_project::menu::run_menu;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use core_logic::setup_logger;
use dotenv::dotenv;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Interactive menu
    Menu,
    /// Scheduled daily roll, no prompt
    Roll,
    /// One social quest batch, then exit
    Social,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "NEWTON_CONFIG", default_value = "config.json")]
    config: String,
    #[arg(short, long, value_enum, default_value_t = Mode::Menu)]
    mode: Mode,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    let config = NewtonConfig::load(&args.config)
        .with_context(|| format!("❌ Failed to load config {}", args.config))?;
    let config = Arc::new(config);

    // Keep guard alive for file logging
    let _log_guard = setup_logger(&config.logging.level, &config.logging.file)?;
    info!("Configuration loaded from {}", args.config);

    let token = CancellationToken::new();
    let cloned_token = token.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("🛑 Received Ctrl+C. Shutting down...");
                cloned_token.cancel();
            }
            Err(err) => {
                error!("Unable to listen for shutdown signal: {}", err);
            }
        }
    });

    match args.mode {
        Mode::Menu => run_menu(config, token).await?,
        Mode::Roll => {
            run_daily_schedule(config, token).await;
        }
        Mode::Social => {
            if let Some(report) = run_batch_until(config, Script::SocialQuests, &token).await {
                info!("Social batch covered {} accounts", report.accounts);
            }
        }
    }

    Ok(())
}
