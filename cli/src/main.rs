//! SpreadScope terminal client
//!
//! Currency converter and cross-exchange spread watcher on top of the
//! SpreadScope backend.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spreadscope_client::{ApiConnection, ClientConfig, SpreadScopeClient};
use spreadscope_common::{from_unix_ms, NumberLocale};

mod terminal;

use terminal::{format_converter, format_selectors, TerminalSink};

/// SpreadScope CLI
#[derive(Parser, Debug)]
#[command(name = "spreadscope")]
#[command(about = "Currency converter and cross-exchange spread watcher")]
struct Args {
    /// Backend base URL (overrides SPREADSCOPE_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Number locale: ru or en (overrides SPREADSCOPE_LOCALE)
    #[arg(long, global = true)]
    locale: Option<NumberLocale>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll spreads and print the table on every update
    Watch {
        /// Symbol filter, case-insensitive substring
        #[arg(short, long, default_value = "")]
        filter: String,

        /// Run duration in seconds (0 = until Ctrl+C)
        #[arg(long, default_value = "0")]
        duration: u64,
    },
    /// Convert an amount between two assets
    Convert {
        /// Amount as typed, e.g. 100 or 2,5
        amount: String,

        /// Source asset (defaults to USD when listed)
        #[arg(long)]
        from: Option<String>,

        /// Target asset (defaults to RUB when listed)
        #[arg(long)]
        to: Option<String>,
    },
    /// List converter assets and the default pair
    Assets,
    /// Show the backend health document
    Health,
}

fn init_logging(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string()),
    );
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ClientConfig::from_env();
    if let Some(base) = &args.api_base {
        config.api_base = base.trim_end_matches('/').to_string();
    }
    if let Some(locale) = args.locale {
        config.locale = locale;
    }

    init_logging(&config.log_level, args.json_logs);

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    info!(api_base = %config.api_base, locale = %config.locale, "Starting SpreadScope");

    match args.command {
        Command::Watch { filter, duration } => run_watch(config, filter, duration).await,
        Command::Convert { amount, from, to } => run_convert(config, amount, from, to).await,
        Command::Assets => run_assets(config).await,
        Command::Health => run_health(config).await,
    }
}

async fn run_watch(config: ClientConfig, filter: String, duration: u64) -> anyhow::Result<()> {
    let sink = Arc::new(TerminalSink);
    let client = SpreadScopeClient::connect(config, sink)?;

    if !filter.is_empty() {
        client.set_filter(filter);
    }
    client.start().await;

    if duration > 0 {
        tokio::time::sleep(Duration::from_secs(duration)).await;
    } else {
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl+C")?;
        info!("Shutdown signal received");
    }
    client.stop();

    let metrics = client.metrics();
    let freshest = client
        .spread_records()
        .iter()
        .filter_map(|r| r.ts_max)
        .max()
        .and_then(from_unix_ms);
    info!(
        fetches = metrics.spreads.issued,
        applied = metrics.spreads.applied,
        failed = metrics.spreads.failed,
        stale = metrics.spreads.stale,
        freshest_quote = ?freshest,
        "Watch complete"
    );
    if let Some(ts) = freshest {
        println!("Freshest quote: {}", ts.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    Ok(())
}

async fn run_convert(
    config: ClientConfig,
    amount: String,
    from: Option<String>,
    to: Option<String>,
) -> anyhow::Result<()> {
    let sink = Arc::new(TerminalSink);
    let client = SpreadScopeClient::connect(config, sink)?;

    if !client.load_rates().await {
        anyhow::bail!("Failed to load local quotes");
    }
    if let Some(from) = from {
        client.select_from(from.to_uppercase());
    }
    if let Some(to) = to {
        client.select_to(to.to_uppercase());
    }
    client.set_amount(amount);

    let view = client.convert();
    println!("{}", format_converter(&view));
    match view.error {
        Some(error) => Err(anyhow::anyhow!(error)),
        None => Ok(()),
    }
}

async fn run_assets(config: ClientConfig) -> anyhow::Result<()> {
    let sink = Arc::new(TerminalSink);
    let client = SpreadScopeClient::connect(config, sink)?;

    if !client.load_rates().await {
        anyhow::bail!("Failed to load local quotes");
    }
    println!("{}", format_selectors(&client.selectors()));
    let (_, label) = client.converter().pair_label();
    println!("{}", label);
    Ok(())
}

async fn run_health(config: ClientConfig) -> anyhow::Result<()> {
    let connection = ApiConnection::new(&config)?;
    let health = connection.health().await?;

    println!("{}", serde_json::to_string_pretty(&health)?);
    if !health.is_ok() {
        anyhow::bail!("Backend status: {}", health.status);
    }
    Ok(())
}
