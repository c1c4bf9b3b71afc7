use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::{ArgGroup, Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod derive;
mod error;
mod estimates;
mod export;
mod filter;
mod merge;
mod models;
mod report;
mod source;

use crate::config::AppConfig;
use crate::filter::DigitalChannel;
use crate::models::{AggregateReport, LoadState};
use crate::report::OutputFormat;

#[derive(Parser)]
#[command(name = "complaints-dashboard")]
#[command(about = "Digital-channel complaint analytics for the bank dashboard", long_about = None)]
struct Cli {
    /// Base URL of the reporting API (overrides DASHBOARD_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Static analytics snapshot (overrides DASHBOARD_STATIC_SNAPSHOT)
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,
    /// Remote request timeout in seconds (overrides DASHBOARD_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Output {
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    format: OutputFormat,
    /// Write to this file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// KPIs, channel shares, complaint types and severity breakdown
    Overview {
        #[command(flatten)]
        output: Output,
    },
    /// One card per digital channel
    Channels {
        #[command(flatten)]
        output: Output,
    },
    /// Complaint rows of a single channel
    #[command(group(
        ArgGroup::new("target")
            .args(["channel", "label"])
            .required(true)
            .multiple(false)
    ))]
    Channel {
        #[arg(value_enum)]
        channel: Option<DigitalChannel>,
        /// Free-form channel label
        #[arg(long)]
        label: Option<String>,
        /// Also export the matching rows as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        #[command(flatten)]
        output: Output,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = AppConfig::from_env();
    if let Some(api_url) = cli.api_url {
        config.api_base_url = api_url;
    }
    if let Some(snapshot) = cli.snapshot {
        config.static_snapshot = snapshot;
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }

    let client = source::build_client(&config).context("failed to build HTTP client")?;

    match cli.command {
        Commands::Overview { output } => {
            let analytics = load_report(&client, &config).await?;
            let overview = report::build_overview(&analytics, Utc::now());
            let rendered = match output.format {
                OutputFormat::Markdown => report::render_overview(&overview),
                OutputFormat::Json => report::render_json(&overview)?,
            };
            emit(&rendered, output.out.as_deref())?;
        }
        Commands::Channels { output } => {
            let analytics = load_report(&client, &config).await?;
            let channels = derive::derive_channel_shares(&analytics);
            let rendered = match output.format {
                OutputFormat::Markdown => report::render_channels(&channels),
                OutputFormat::Json => report::render_json(&channels)?,
            };
            emit(&rendered, output.out.as_deref())?;
        }
        Commands::Channel {
            channel,
            label,
            csv,
            output,
        } => {
            let target = match (channel, label) {
                (Some(channel), _) => channel.label().to_string(),
                (None, Some(label)) => label,
                (None, None) => anyhow::bail!("a channel or --label is required"),
            };

            let records = match source::load_records(&client, &config).await {
                Ok(records) => records,
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        kind = ?err.kind(),
                        "{}",
                        err.kind().user_message()
                    );
                    Vec::new()
                }
            };
            let matching = filter::filter_by_channel(&records, &target);
            tracing::info!(channel = %target, matched = matching.len(), "channel filtered");

            if let Some(path) = csv {
                let written = export::write_records_csv(&path, &matching)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                eprintln!("Exported {written} rows to {}.", path.display());
            }

            let rendered = match output.format {
                OutputFormat::Markdown => report::render_channel_records(&target, &matching),
                OutputFormat::Json => report::render_json(&report::ChannelView {
                    channel: &target,
                    records: &matching,
                })?,
            };
            emit(&rendered, output.out.as_deref())?;
        }
    }

    Ok(())
}

async fn load_report(
    client: &reqwest::Client,
    config: &AppConfig,
) -> anyhow::Result<AggregateReport> {
    let state = LoadState::Loading;
    tracing::debug!(?state, snapshot = %config.static_snapshot.display(), "loading analytics");

    let result = source::load(client, config).await;
    if let Err(err) = &result {
        tracing::error!(error = %err, "analytics load failed");
    }

    LoadState::from_result(result)
        .into_view()
        .map_err(anyhow::Error::msg)
}

fn emit(rendered: &str, out: Option<&Path>) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Report written to {}.", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "complaints_dashboard=info".into());
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
