//! bibmetrics: BibTeX to CSV conversion and citation metrics enrichment
//!
//! Commands:
//! - bib2csv: Convert a BibTeX file to CSV
//! - paperstats: Add CrossRef and Google Scholar metrics to a converted CSV

pub mod bib;
pub mod convert;
pub mod crossref;
pub mod enrich;
pub mod error;
pub mod http;
pub mod logging;
pub mod scholar;
pub mod schema;

pub use convert::{convert, convert_entry, ConvertArgs};
pub use enrich::{EnrichArgs, EnrichConfig, Enricher, Enrichment};
pub use error::{Error, Result};
pub use schema::{ConvertedRow, CrossrefLookup, EnrichedRow, InputRow, ScholarMetrics};
