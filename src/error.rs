//! Error types shared by the converter and the enricher

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read file: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed BibTeX input
    #[error("Failed to parse bibliography: {0}")]
    Bib(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No API key found. Set SERPAPI_KEY or pass --api-key.")]
    MissingApiKey,

    #[error("Cannot append a path to {0}")]
    BaseUrl(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Error reported inside a 2xx response body
    #[error("API error: {0}")]
    Api(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}
