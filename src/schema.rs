//! Row types for the converted and enriched CSV files

use serde::{Deserialize, Serialize};

/// Columns always written by the converter, in order
pub const CONVERTED_COLUMNS: [&str; 5] = ["title", "author", "publication", "year", "publisher"];

/// One converted bibliography entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertedRow {
    pub title: String,
    /// First listed author only
    pub author: String,
    pub publication: String,
    pub year: String,
    pub publisher: String,
    pub doi: Option<String>,
    pub arxiv_id: Option<String>,
}

/// The part of a converted row the enricher reads.
///
/// Missing columns and empty cells both read as `""`; other columns are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InputRow {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub publication: String,
}

/// Metrics for one DOI from CrossRef
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossrefMetrics {
    pub doi: String,
    pub title: String,
    pub cited_by_count: u64,
    /// Only set from a `published-print` date
    pub published_year: Option<i32>,
    pub journal: String,
    pub authors: String,
    pub publisher: String,
}

/// Outcome of the CrossRef path for one row.
///
/// `FetchFailed` keeps the DOI and nulls every metric; `NoMatch` nulls the DOI
/// too. The Scholar path has no equivalent of `FetchFailed`: its failures are
/// an absent block (`None`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrossrefLookup {
    NoMatch,
    Found(CrossrefMetrics),
    FetchFailed { doi: String },
}

impl CrossrefLookup {
    pub fn doi(&self) -> Option<&str> {
        match self {
            CrossrefLookup::NoMatch => None,
            CrossrefLookup::Found(metrics) => Some(metrics.doi.as_str()),
            CrossrefLookup::FetchFailed { doi } => Some(doi.as_str()),
        }
    }
}

/// First organic Google Scholar result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScholarMetrics {
    pub title: Option<String>,
    pub authors: String,
    pub journal: Option<String>,
    pub cited_by_count: u64,
    pub publisher: Option<String>,
    pub published_year: Option<i32>,
}

/// One output row of the enricher. Field order is the CSV column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichedRow {
    pub original_title: String,
    pub original_author: String,
    pub original_publication: String,
    pub scholar_title: Option<String>,
    pub scholar_authors: Option<String>,
    pub scholar_journal: Option<String>,
    pub scholar_cited_by_count: Option<u64>,
    pub scholar_publisher: Option<String>,
    pub scholar_published_year: Option<i32>,
    pub doi: Option<String>,
    pub crossref_title: Option<String>,
    pub crossref_cited_by_count: Option<u64>,
    pub crossref_published_year: Option<i32>,
    pub crossref_journal: Option<String>,
    pub crossref_authors: Option<String>,
    pub crossref_publisher: Option<String>,
}

impl EnrichedRow {
    pub const COLUMNS: [&'static str; 16] = [
        "original_title",
        "original_author",
        "original_publication",
        "scholar_title",
        "scholar_authors",
        "scholar_journal",
        "scholar_cited_by_count",
        "scholar_publisher",
        "scholar_published_year",
        "doi",
        "crossref_title",
        "crossref_cited_by_count",
        "crossref_published_year",
        "crossref_journal",
        "crossref_authors",
        "crossref_publisher",
    ];

    /// Merge both lookups into the fixed column layout.
    pub fn merge(
        original: &InputRow,
        scholar: Option<&ScholarMetrics>,
        crossref: &CrossrefLookup,
    ) -> Self {
        let mut row = EnrichedRow {
            original_title: original.title.clone(),
            original_author: original.author.clone(),
            original_publication: original.publication.clone(),
            doi: crossref.doi().map(String::from),
            ..Default::default()
        };

        if let Some(s) = scholar {
            row.scholar_title = s.title.clone();
            row.scholar_authors = Some(s.authors.clone());
            row.scholar_journal = s.journal.clone();
            row.scholar_cited_by_count = Some(s.cited_by_count);
            row.scholar_publisher = s.publisher.clone();
            row.scholar_published_year = s.published_year;
        }

        if let CrossrefLookup::Found(c) = crossref {
            row.crossref_title = Some(c.title.clone());
            row.crossref_cited_by_count = Some(c.cited_by_count);
            row.crossref_published_year = c.published_year;
            row.crossref_journal = Some(c.journal.clone());
            row.crossref_authors = Some(c.authors.clone());
            row.crossref_publisher = Some(c.publisher.clone());
        }

        row
    }
}
