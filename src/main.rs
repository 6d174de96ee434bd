//! Crawler intelligence dashboard
//!
//! Renders the classification backend's bot analytics in the terminal.

use anyhow::Result;
use clap::Parser;
use crawler_intel_dashboard::render::{ConsoleView, TerminalRenderer};
use crawler_intel_dashboard::{Dashboard, DashboardConfig, HttpBackend, LogUpload, Trigger};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "crawler-intel-dashboard")]
#[command(author, version, about = "Analytics dashboard for classified AI crawler traffic")]
struct Args {
    /// Path to configuration file (JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the classification backend, overrides the config file
    #[arg(long)]
    api_base: Option<String>,

    /// Access log to upload before the first refresh
    #[arg(short, long)]
    upload: Option<PathBuf>,

    /// Refresh every N seconds until interrupted
    #[arg(short, long)]
    watch: Option<u64>,

    /// Show a single bot by backend id and exit
    #[arg(long)]
    bot: Option<String>,

    /// Enable JSON logging format
    #[arg(long)]
    json_logs: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(json: bool, level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    // Charts go to stdout, logs to stderr
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.json_logs, &args.log_level);

    let mut config = match &args.config {
        Some(path) => DashboardConfig::from_file(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(base) = args.api_base {
        config.api.base_url = base;
    }
    if let Some(secs) = args.watch {
        config.refresh.interval_seconds = secs;
    }
    config.validate()?;

    let backend = Arc::new(HttpBackend::new(&config.api)?);
    info!(api = %backend.base_url(), "Using classification backend");

    let interval = config.refresh.interval();
    let mut dashboard = Dashboard::new(
        config,
        backend.clone(),
        TerminalRenderer::stdout(),
        ConsoleView::stdout(),
    )
    .with_ingestion(backend);

    if let Some(id) = args.bot {
        match dashboard.bot_detail(&id).await? {
            Some(bot) => println!("{}", serde_json::to_string_pretty(&bot)?),
            None => println!("Bot {} not found", id),
        }
        return Ok(());
    }

    let upload = match &args.upload {
        Some(path) => Some(LogUpload::from_path(path).await?),
        None => None,
    };

    let Some(interval) = interval else {
        match upload {
            Some(upload) => dashboard.refresh_with_upload(upload).await?,
            None => dashboard.refresh().await?,
        };
        dashboard.shutdown();
        return Ok(());
    };

    let (tx, rx) = mpsc::channel(16);
    tx.send(upload.map_or(Trigger::Refresh, Trigger::Upload)).await?;

    let ticker = tokio::spawn(async move {
        let mut ticks = tokio::time::interval(interval);
        ticks.tick().await;
        loop {
            ticks.tick().await;
            if tx.send(Trigger::Refresh).await.is_err() {
                break;
            }
        }
    });

    // Closing the trigger channel ends the refresh loop after the current pass
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, stopping refresh loop");
                ticker.abort();
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for interrupt, refreshing until killed");
            }
        }
    });

    info!(interval_seconds = interval.as_secs(), "Watching classification backend");
    dashboard.run(rx).await;
    dashboard.shutdown();

    Ok(())
}
