//! paperstats CLI
//!
//! Adds citation metrics from CrossRef and Google Scholar (SerpAPI) to a CSV
//! produced by bib2csv.

use anyhow::Result;
use bibmetrics::enrich::{run_enrich, EnrichArgs};
use bibmetrics::logging::init_tracing;
use clap::Parser;

#[derive(Parser)]
#[command(name = "paperstats")]
#[command(author = "RoyalBit Inc.")]
#[command(version)]
#[command(about = "Enrich a converted bibliography CSV with citation metrics")]
#[command(long_about = "Queries CrossRef and Google Scholar (via SerpAPI) for every row.\n\nRequires SERPAPI_KEY in the environment or a .env file.")]
struct Cli {
    #[command(flatten)]
    args: EnrichArgs,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    run_enrich(cli.args).await
}
