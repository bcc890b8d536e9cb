use aggreport::config::{CliOverrides, Config};
use aggreport::render::OutputFormat;
use aggreport::runner::{self, ReportKind};
use aggreport::source::MongoSource;
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

/// Run the fixed aggregation reports against a MongoDB deployment.
#[derive(Parser, Debug)]
#[command(name = "aggreport", version, about)]
struct Cli {
    /// Config file (defaults to ./config.toml when present)
    #[arg(long, env = "AGGREPORT_CONFIG")]
    config: Option<PathBuf>,

    /// MongoDB connection string
    #[arg(long)]
    uri: Option<String>,

    /// Database holding the report collections
    #[arg(long)]
    database: Option<String>,

    /// Report to run; repeat for several. Runs all when omitted
    #[arg(long = "report", short = 'r', value_enum)]
    reports: Vec<ReportKind>,

    /// Only count entries written by this author
    #[arg(long)]
    author: Option<String>,

    /// Minimum daily total kept by the daily-sales-over report
    #[arg(long)]
    min_total: Option<i64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print the pipelines as JSON instead of running them
    #[arg(long)]
    explain: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize logging with env filter, e.g.: RUST_LOG=info,aggreport=debug
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let mut cfg = Config::load(cli.config.as_deref()).context("loading configuration")?;
    cfg.apply_cli(CliOverrides {
        uri: cli.uri,
        database: cli.database,
        author: cli.author,
        min_total: cli.min_total,
    })?;

    let kinds = runner::select(&cli.reports);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if cli.explain {
        runner::explain(&cfg, &kinds, &mut out)?;
        return Ok(());
    }

    let source = MongoSource::connect(&cfg)
        .await
        .context("connecting to mongodb")?;
    let result = runner::run_reports(&source, &cfg, &kinds, cli.format, &mut out).await;
    source.shutdown().await;

    // anyhow reports the failure and sets the exit status
    result.context("running reports")
}
