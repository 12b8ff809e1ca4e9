//! `logwatch`: terminal dashboard for the logwatch Docker error-log monitor.
//!
//! Built on [ratatui](https://ratatui.rs). Talks to the monitor's REST API
//! through `logwatch-api` and shows four screens, navigable via number
//! keys (1-4): Dashboard, Errors, Containers, and Config. The error list
//! refreshes in the background on a fixed interval.
//!
//! Logs are written to a file (default `/tmp/logwatch.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, config resolution, tracing setup,
//! panic hooks, and app launch.

mod action;
mod app;
mod component;
mod event;
mod modal;
mod refresh;
mod screen;
mod screens;
mod state;
#[cfg(test)]
mod test_util;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use logwatch_api::ApiClient;
use logwatch_config::Config;

use crate::app::{App, Settings};

/// Terminal dashboard for a Docker error-log monitor.
#[derive(Parser, Debug)]
#[command(name = "logwatch", version, about)]
struct Cli {
    /// Monitor base URL (e.g., http://localhost:5000)
    #[arg(short = 'u', long, env = "LOGWATCH_URL")]
    url: Option<String>,

    /// Seconds between background refreshes of the error list
    #[arg(long)]
    refresh_secs: Option<u64>,

    /// Errors per page on the error list
    #[arg(long)]
    page_size: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Accept invalid TLS certificates
    #[arg(long)]
    insecure: bool,

    /// Config file path (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the resolved configuration to the config file and exit
    #[arg(long)]
    init_config: bool,

    /// Log file path (defaults to /tmp/logwatch.log)
    #[arg(long, default_value = "/tmp/logwatch.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Lay CLI flags over the file/env configuration.
    fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(url) = &self.url {
            cfg.backend.url.clone_from(url);
        }
        if let Some(secs) = self.timeout_secs {
            cfg.backend.timeout = secs;
        }
        if self.insecure {
            cfg.backend.insecure = true;
        }
        if let Some(secs) = self.refresh_secs {
            cfg.dashboard.refresh_interval = secs;
        }
        if let Some(size) = self.page_size {
            cfg.dashboard.page_size = size;
        }
    }
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr, that would
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
        EnvFilter::new(format!("logwatch={log_level},logwatch_api={log_level}"))
    });

    let log_dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("logwatch.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file; hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    // Priority: CLI flags > env > config file > defaults
    let config_path = cli.config.clone().unwrap_or_else(logwatch_config::config_path);
    let mut cfg = logwatch_config::load_config_from(&config_path)
        .wrap_err_with(|| format!("failed to load {}", config_path.display()))?;
    cli.apply_overrides(&mut cfg);
    cfg.validate()?;

    if cli.init_config {
        logwatch_config::save_config_to(&cfg, &config_path)?;
        println!("Wrote {}", config_path.display());
        return Ok(());
    }

    info!(
        url = %cfg.backend.url,
        refresh_secs = cfg.dashboard.refresh_interval,
        page_size = cfg.dashboard.page_size,
        "starting logwatch"
    );

    let client = ApiClient::new(&cfg.backend.url, &cfg.transport())?;
    let mut app = App::new(client, Settings::from(&cfg));
    app.run().await?;

    Ok(())
}
