//! paperstats: Enrich converted rows with CrossRef and Google Scholar metrics
//!
//! The two lookups for a row are independent: a failure in one never stops
//! the other, later rows, or the final write. Compact JSON summary on stdout.

use crate::crossref::{self, CrossrefClient};
use crate::error::{Error, Result};
use crate::http::build_client;
use crate::scholar::{self, ScholarClient};
use crate::schema::{CrossrefLookup, EnrichedRow, InputRow, ScholarMetrics};
use anyhow::Context;
use chrono::Utc;
use clap::Args;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Args)]
pub struct EnrichArgs {
    /// CSV file produced by bib2csv
    #[arg(value_name = "INPUT_FILE")]
    pub input: PathBuf,

    /// Enriched CSV file to write
    #[arg(value_name = "OUTPUT_FILE")]
    pub output: PathBuf,

    /// SerpAPI key for Google Scholar searches
    #[arg(long, env = "SERPAPI_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// CrossRef API base URL
    #[arg(long, env = "CROSSREF_URL", default_value = crossref::DEFAULT_URL)]
    pub crossref_url: Url,

    /// SerpAPI base URL
    #[arg(long, env = "SERPAPI_URL", default_value = scholar::DEFAULT_URL)]
    pub serpapi_url: Url,

    /// Timeout per request in milliseconds
    #[arg(long, default_value = "10000")]
    pub timeout: u64,

    /// Rows processed at once (output order is always input order)
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=16))]
    pub concurrency: u8,
}

/// Configuration for the enricher
#[derive(Debug, Clone)]
pub struct EnrichConfig {
    pub api_key: String,
    pub crossref_url: Url,
    pub serpapi_url: Url,
    pub timeout_ms: u64,
    pub concurrency: usize,
}

impl EnrichConfig {
    /// Resolve the API key; a missing or empty key is fatal.
    pub fn from_args(args: &EnrichArgs) -> Result<Self> {
        let api_key = args
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(Error::MissingApiKey)?;

        Ok(Self {
            api_key,
            crossref_url: args.crossref_url.clone(),
            serpapi_url: args.serpapi_url.clone(),
            timeout_ms: args.timeout,
            concurrency: args.concurrency as usize,
        })
    }
}

/// Both lookups for one input row
#[derive(Debug, Clone)]
pub struct Enrichment {
    pub original: InputRow,
    pub scholar: Option<ScholarMetrics>,
    pub crossref: CrossrefLookup,
}

impl Enrichment {
    pub fn to_row(&self) -> EnrichedRow {
        EnrichedRow::merge(&self.original, self.scholar.as_ref(), &self.crossref)
    }
}

/// Summary (compact)
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct EnrichReport {
    pub rows: usize,
    pub crossref_found: usize,
    pub crossref_fetch_failed: usize,
    pub scholar_found: usize,
}

impl EnrichReport {
    pub fn from_enrichments(enrichments: &[Enrichment]) -> Self {
        let mut report = EnrichReport {
            rows: enrichments.len(),
            ..Default::default()
        };
        for e in enrichments {
            match e.crossref {
                CrossrefLookup::Found(_) => report.crossref_found += 1,
                CrossrefLookup::FetchFailed { .. } => report.crossref_fetch_failed += 1,
                CrossrefLookup::NoMatch => {}
            }
            if e.scholar.is_some() {
                report.scholar_found += 1;
            }
        }
        report
    }
}

#[derive(Debug, Serialize)]
struct EnrichOutput {
    #[serde(flatten)]
    report: EnrichReport,
    output: String,
    timestamp: String,
}

pub struct Enricher {
    crossref: CrossrefClient,
    scholar: ScholarClient,
    concurrency: usize,
}

impl Enricher {
    pub fn new(config: &EnrichConfig) -> Result<Self> {
        let client = build_client(config.timeout_ms)?;
        Ok(Self {
            crossref: CrossrefClient::new(client.clone(), config.crossref_url.clone()),
            scholar: ScholarClient::new(
                client,
                config.serpapi_url.clone(),
                config.api_key.clone(),
            ),
            concurrency: config.concurrency.max(1),
        })
    }

    /// CrossRef first, then Google Scholar
    pub async fn enrich_row(&self, row: &InputRow) -> Enrichment {
        eprintln!("  -> {}", truncate(&row.title, 60));

        let crossref = self.crossref.lookup(row).await;
        let scholar = self.scholar.lookup(row).await;

        Enrichment {
            original: row.clone(),
            scholar,
            crossref,
        }
    }

    /// Enrich every row; the result is in input order
    pub async fn enrich(&self, rows: &[InputRow]) -> Vec<Enrichment> {
        stream::iter(rows)
            .map(|row| self.enrich_row(row))
            .buffered(self.concurrency)
            .collect()
            .await
    }
}

/// Run the paperstats command
pub async fn run_enrich(args: EnrichArgs) -> anyhow::Result<()> {
    let config = EnrichConfig::from_args(&args)?;

    let rows = read_input(&args.input)
        .with_context(|| format!("Failed to read file: {}", args.input.display()))?;

    eprintln!(
        "Enriching {} rows ({} parallel)...",
        rows.len(),
        config.concurrency
    );

    let enricher = Enricher::new(&config)?;
    let enrichments = enricher.enrich(&rows).await;

    let enriched: Vec<EnrichedRow> = enrichments.iter().map(Enrichment::to_row).collect();
    write_enriched(&args.output, &enriched)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    let report = EnrichReport::from_enrichments(&enrichments);
    eprintln!(
        "Done: {} rows, {} CrossRef, {} Scholar",
        report.rows, report.crossref_found, report.scholar_found
    );

    let output = EnrichOutput {
        report,
        output: args.output.display().to_string(),
        timestamp: Utc::now().to_rfc3339(),
    };
    println!("{}", serde_json::to_string(&output)?);

    Ok(())
}

/// Read a converted CSV file
pub fn read_input(path: &Path) -> Result<Vec<InputRow>> {
    let file = std::fs::File::open(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    read_input_from(file)
}

pub fn read_input_from<R: std::io::Read>(reader: R) -> Result<Vec<InputRow>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let rows = rdr.deserialize().collect::<std::result::Result<Vec<InputRow>, _>>()?;
    Ok(rows)
}

pub fn write_enriched(path: &Path, rows: &[EnrichedRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    if rows.is_empty() {
        wtr.write_record(EnrichedRow::COLUMNS)?;
    }
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    }
}
