//! omnivate - activate OmniStudio scripts and cards through their compiler pages
//!
//! Usage:
//!   omnivate [--headed] [--debug] [--namespace <prefix>]
//!
//! Credentials come from the environment: SF_INSTANCE_URL, SF_ACCESS_TOKEN
//! and optionally SF_SCOPES. Exits non-zero on the first artifact that fails
//! to compile or times out.

use anyhow::{Context, Result};
use clap::Parser;
use omni_activator::{preflight, Activator, ActivatorConfig, DEFAULT_NAMESPACE};
use omni_browser::{ChromeConfig, ChromeDriver};
use omni_session::{RestClient, Session};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "omnivate")]
#[command(about = "Activate OmniStudio scripts and cards", long_about = None)]
struct Cli {
    /// Run the browser with a visible window (env: HEADLESS=false)
    #[arg(long)]
    headed: bool,

    /// Verbose diagnostics; also relaxes certificate validation for local
    /// debugging proxies (env: DEBUG=true)
    #[arg(short, long)]
    debug: bool,

    /// Managed-package namespace prefix for the compiler pages
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,
}

/// Env toggles keep parity with the original deployment scripts; flags win.
fn env_flag(name: &str) -> Option<bool> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let headless = if cli.headed {
        false
    } else {
        env_flag("HEADLESS").unwrap_or(true)
    };
    let debug = cli.debug || env_flag("DEBUG").unwrap_or(false);

    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let session = Session::from_env().context("No usable session")?;
    let client = RestClient::new(session.clone());

    let (scripts, cards) = preflight(&client)
        .await
        .context("Preflight checks failed")?;

    if scripts.is_empty() && cards.is_empty() {
        info!("Nothing to activate");
        return Ok(());
    }

    let config = ActivatorConfig {
        namespace: cli.namespace,
        ..ActivatorConfig::default()
    };

    let chrome = ChromeConfig {
        headless,
        debug,
        ..ChromeConfig::default()
    };
    let driver = ChromeDriver::launch(chrome)
        .await
        .context("Failed to launch browser")?;
    let idle = driver
        .watch_network(config.idle_window)
        .context("Failed to watch network activity")?;

    let activator = Activator::new(driver, config);
    let report = activator
        .run(&session, idle, scripts, cards)
        .await
        .context("Activation run failed")?;

    info!(
        "Activated {} scripts{}",
        report.scripts.len(),
        if report.cards.is_some() {
            " and the card batch"
        } else {
            ""
        }
    );
    Ok(())
}
