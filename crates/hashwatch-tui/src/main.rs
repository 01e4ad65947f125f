//! `hashwatch` — Terminal dashboard for monitoring a mining proxy.
//!
//! Built on [ratatui](https://ratatui.rs) with data polled by
//! `hashwatch-core`'s [`Monitor`](hashwatch_core::Monitor). Screens are
//! navigable via number keys (1-5): Overview, Workers, Hashrate, Log,
//! and Settings.
//!
//! Logs are written to a file (default `/tmp/hashwatch.log`) to avoid
//! corrupting the terminal UI. A background data bridge task forwards
//! every published dashboard snapshot into the TUI action loop.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app
//! launch.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use hashwatch_core::{Monitor, ProxyConfig, RefreshInterval};

use crate::app::App;

/// Terminal dashboard for monitoring a cryptocurrency mining proxy.
#[derive(Parser, Debug)]
#[command(name = "hashwatch", version, about)]
struct Cli {
    /// Proxy API URL
    #[arg(short = 'u', long, default_value = "http://localhost:4333", env = "HASHWATCH_URL")]
    url: String,

    /// Bearer token for the API
    #[arg(short = 't', long, env = "HASHWATCH_TOKEN")]
    token: Option<String>,

    /// Auto-refresh interval in seconds (10, 30, 60, or 300)
    #[arg(short = 'i', long, default_value = "30")]
    interval: RefreshInterval,

    /// Disable the auto-refresh timer (manual refresh with `r` only)
    #[arg(long)]
    no_auto_refresh: bool,

    /// Log file path (defaults to /tmp/hashwatch.log)
    #[arg(long, default_value = "/tmp/hashwatch.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that would
/// corrupt the TUI output. Returns a guard that must be held for the
/// lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "hashwatch={log_level},hashwatch_core={log_level},hashwatch_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("hashwatch.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

fn build_config(cli: &Cli) -> ProxyConfig {
    ProxyConfig {
        api_url: cli.url.clone(),
        access_token: cli
            .token
            .as_ref()
            .filter(|t| !t.is_empty())
            .map(|t| SecretString::from(t.clone())),
        auto_refresh: !cli.no_auto_refresh,
        refresh_interval: cli.interval,
        ..ProxyConfig::default()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    info!(url = %cli.url, interval = cli.interval.as_secs(), "starting hashwatch");

    let monitor = Monitor::new(build_config(&cli));
    let mut app = App::new(monitor);
    app.run().await?;

    Ok(())
}
