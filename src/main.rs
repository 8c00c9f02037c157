use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use appstore_reviews::{Config, CsvSink, FeedClient, Harvester};

#[derive(Parser)]
#[command(name = "appstore-reviews")]
#[command(about = "Collect App Store customer reviews into a CSV file")]
struct Cli {
    /// Application identifier to collect reviews for
    #[arg(long, env = "APPSTORE_APP_ID")]
    app_id: String,

    /// First feed page to request
    #[arg(long, default_value_t = 1)]
    start_page: u32,

    /// Store region override (e.g. ca, us)
    #[arg(long)]
    region: Option<String>,

    /// Directory for the CSV export
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Path to config file
    #[arg(long, default_value = "reviews.yml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("appstore_reviews=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?;
    if let Some(region) = cli.region {
        config.feed.region = region;
    }
    if let Some(dir) = cli.output_dir {
        config.output.dir = dir;
    }

    let sink = CsvSink::new(&config.output.dir)?;
    let client = FeedClient::new(config.feed, config.retry)?;
    let harvester = Harvester::new(client, sink);

    let report = harvester.run(&cli.app_id, cli.start_page).await?;

    for record in &report.records {
        println!("{}", record.as_row().join(" | "));
    }
    println!(
        "Collected {} reviews ({} entries skipped) -> {}",
        report.records.len(),
        report.skipped,
        report.output.display()
    );

    Ok(())
}
