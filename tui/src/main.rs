//! pongterm Entry Point
//!
//! Launches the terminal client for the pong service.
//!
//! Usage:
//!   pongterm [OPTIONS]
//!
//! Options:
//!   --config <PATH>       Configuration file (default: ~/.config/pongterm/config.toml)
//!   --api-url <URL>       REST base URL
//!   --ws-url <URL>        Socket URL
//!   --timeout-ms <MS>     Bound on each socket operation and HTTP call

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use crossterm::event::EventStream;

use pongterm_core::config::{self, ClientConfig, ConfigOverrides};
use pongterm_core::transport::{HttpApi, WsSocket};
use pongterm_tui::terminal::{measure_cell_aspect, TerminalGuard};
use pongterm_tui::{logging, App};

#[derive(Debug, Parser)]
#[command(name = "pongterm", version, about = "Terminal client for the pong service")]
struct Cli {
    /// Configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// REST base URL
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Socket URL (ws:// or wss://)
    #[arg(long, value_name = "URL")]
    ws_url: Option<String>,

    /// Bound on each socket operation and HTTP call, in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(ref url) = self.api_url {
            overrides = overrides.with_api_url(url.clone());
        }
        if let Some(ref url) = self.ws_url {
            overrides = overrides.with_ws_url(url.clone());
        }
        if let Some(ms) = self.timeout_ms {
            overrides = overrides.with_timeout_ms(ms);
        }
        overrides
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("pongterm: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let log_guard = logging::init(config.log_path().as_deref(), config.log_filter.as_deref());
    tracing::info!(
        source = %config.source(),
        config_file = ?config.config_file_path,
        api_url = %config.server.api_url,
        ws_url = %config.server.ws_url,
        "Starting pongterm"
    );
    for (name, value) in &config.ignored_env {
        tracing::warn!(%value, "Ignoring unparsable {name}");
    }

    let result = run(&config).await;
    if let Err(ref e) = result {
        tracing::error!(error = %format!("{e:#}"), "Fatal error");
    }
    drop(log_guard);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pongterm: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn resolve_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let path = cli.config.clone().or_else(config::default_config_path);
    let mut config = config::load_config_from_path(path).context("loading configuration")?;
    cli.overrides().apply(&mut config);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

async fn run(config: &ClientConfig) -> anyhow::Result<()> {
    // Check if we have a TTY before attempting initialization
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        bail!("pongterm requires an interactive terminal (TTY) on stdin and stdout");
    }

    let api = HttpApi::new(&config.server, config.transport).context("building HTTP client")?;
    let socket = WsSocket::new(&config.server, config.transport);

    let guard = TerminalGuard::enter().context("initializing terminal")?;
    let size = crossterm::terminal::size().context("reading terminal size")?;
    let cell_aspect = config.cell_aspect_ratio.unwrap_or_else(measure_cell_aspect);
    tracing::debug!(
        cols = size.0,
        rows = size.1,
        cell_aspect,
        releases = guard.reports_releases(),
        "Terminal geometry"
    );

    let mut app = App::new(api, socket, io::stdout(), size, cell_aspect);
    let result = app.run(EventStream::new()).await;

    // Restore the terminal before the error is printed
    drop(guard);
    result
}
