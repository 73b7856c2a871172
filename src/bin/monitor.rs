use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use system_monitor::{
    actors::MonitorLoop,
    config::{Config, read_config_file},
    notifier,
    provider::SystemProvider,
    storage::CsvSampleLog,
};
use tracing::{info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file (JSON)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Seconds between two samples
    #[arg(short, long)]
    interval: Option<u64>,

    /// Minimum seconds between two alerts of the same kind
    #[arg(short, long)]
    cooldown: Option<u64>,

    /// CSV file the samples are appended to
    #[arg(short, long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(interval) = self.interval {
            config.interval = interval;
        }
        if let Some(cooldown) = self.cooldown {
            config.cooldown = cooldown;
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = log_file.clone();
        }
    }
}

fn init(level: &str) {
    let level = LevelFilter::from_str(level).unwrap_or(LevelFilter::INFO);
    let filter = filter::Targets::new().with_target("system_monitor", level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.file {
        Some(path) => read_config_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    config.apply_env();
    args.apply(&mut config);
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let config = load_config(&args)?;
    init(&config.log_level);
    trace!("started with args: {args:?}");

    let notifier = notifier::from_config(&config).context("failed to set up alert channel")?;
    let provider = Arc::new(SystemProvider::new());
    let log = Arc::new(CsvSampleLog::new(&config.log_file));

    let handle = MonitorLoop::new(config, provider, notifier, log)
        .start()
        .await?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for interrupt")?;

    let report = handle.shutdown().await?;
    info!(
        ticks = report.ticks,
        rows = report.rows_written,
        alerts = report.notifications_sent,
        "monitor stopped"
    );

    Ok(())
}
