//! Highlight watcher: binary entrypoint.
//! Runs one scan pass (default) or a recurring pass every `--interval-secs`.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use highlight_watcher::config::{AppConfig, TargetDate};
use highlight_watcher::{build_scanner, metrics, GameScanner, WatchRegistry};

#[derive(Parser)]
#[command(name = "highlight-watcher", about = "Live MLB highlight detector")]
struct Args {
    /// Config file (TOML); falls back to $HIGHLIGHT_CONFIG_PATH, then config/highlight.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target date, YYYY-MM-DD or "today" (US/Eastern)
    #[arg(long)]
    date: Option<String>,

    /// Repeat the pass every N seconds; 0 runs once
    #[arg(long)]
    interval_secs: Option<u64>,

    /// Log moments instead of sending them
    #[arg(long)]
    dry_run: bool,
}

/// JSON logs when LOG_FORMAT=json, compact otherwise.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("highlight_watcher=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_tracing();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let mut cfg = AppConfig::load_default(args.config.as_deref())?;
    if let Some(d) = args.date {
        cfg.scan.date = d;
    }
    if let Some(n) = args.interval_secs {
        cfg.scan.interval_secs = n;
    }
    let target: TargetDate = cfg.scan.target_date()?;

    if let Some(listen) = &cfg.metrics.listen {
        metrics::install_exporter(listen)?;
    }

    let registry = WatchRegistry::load_default(cfg.scan.watch_list_path.as_deref())?;
    tracing::info!(
        players = registry.len(),
        date = %target,
        mode = ?cfg.admin.mode,
        dry_run = args.dry_run,
        "highlight watcher starting"
    );

    let mut scanner = build_scanner(&cfg, registry, args.dry_run).await?;
    let deadline = Duration::from_secs(cfg.scan.pass_deadline_secs.max(1));

    if cfg.scan.interval_secs == 0 {
        let date = target.resolve(Utc::now());
        scanner.run_pass(date, deadline).await?;
        return Ok(());
    }

    run_recurring(&mut scanner, target, cfg.scan.interval_secs, deadline).await
}

/// Never returns on its own; each tick re-resolves "today".
async fn run_recurring(
    scanner: &mut GameScanner,
    target: TargetDate,
    interval_secs: u64,
    deadline: Duration,
) -> Result<()> {
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    tracing::info!(interval_secs, "recurring scan enabled");

    loop {
        ticker.tick().await;
        let date = target.resolve(Utc::now());
        if let Err(e) = scanner.run_pass(date, deadline).await {
            tracing::warn!("scan pass failed, retrying next tick: {e:#}");
        }
    }
}
