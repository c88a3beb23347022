//! bib2csv CLI
//!
//! Converts a BibTeX bibliography to CSV.

use anyhow::Result;
use bibmetrics::convert::{run_convert, ConvertArgs};
use bibmetrics::logging::init_tracing;
use clap::Parser;

#[derive(Parser)]
#[command(name = "bib2csv")]
#[command(author = "RoyalBit Inc.")]
#[command(version)]
#[command(about = "Convert a BibTeX bibliography to CSV")]
#[command(long_about = "Writes one row per entry with title, first author, publication, year, publisher,\nand doi/arxiv_id when present.")]
struct Cli {
    #[command(flatten)]
    args: ConvertArgs,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    run_convert(cli.args).await
}
