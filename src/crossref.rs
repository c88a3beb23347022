//! CrossRef client: DOI search and per-DOI metrics

use crate::error::{Error, Result};
use crate::http::{base, get_json};
use crate::schema::{CrossrefLookup, CrossrefMetrics, InputRow};
use serde_json::Value;
use url::Url;

pub const DEFAULT_URL: &str = "https://api.crossref.org";

pub struct CrossrefClient {
    client: reqwest::Client,
    base_url: Url,
}

impl CrossrefClient {
    pub fn new(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Best-ranked DOI for a title/author/venue query, if any
    pub async fn search_doi(&self, row: &InputRow) -> Result<Option<String>> {
        let url = format!("{}/works", base(&self.base_url));
        let body = get_json(
            &self.client,
            &url,
            &[
                ("query.bibliographic", row.title.as_str()),
                ("query.author", row.author.as_str()),
                ("query.container-title", row.publication.as_str()),
                ("rows", "1"),
            ],
        )
        .await?;

        Ok(body["message"]["items"]
            .get(0)
            .and_then(|item| item["DOI"].as_str())
            .map(String::from))
    }

    pub async fn fetch_metrics(&self, doi: &str) -> Result<CrossrefMetrics> {
        let url = self.work_url(doi)?;
        let body = get_json(&self.client, url.as_str(), &[]).await?;
        Ok(metrics_from_message(doi, &body["message"]))
    }

    /// `/works/{doi}` with each part of the DOI percent-encoded. The `/`
    /// between prefix and suffix stays literal; `#`, `?` and `<>` do not.
    pub fn work_url(&self, doi: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::BaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("works")
            .extend(doi.split('/'));
        Ok(url)
    }

    /// Search then fetch. Failures are logged and folded into the result:
    /// a failed search is `NoMatch`, a failed fetch is `FetchFailed`.
    pub async fn lookup(&self, row: &InputRow) -> CrossrefLookup {
        let doi = match self.search_doi(row).await {
            Ok(Some(doi)) => doi,
            Ok(None) => {
                tracing::debug!(title = %row.title, "no CrossRef match");
                return CrossrefLookup::NoMatch;
            }
            Err(e) => {
                tracing::warn!(title = %row.title, error = %e, "Error searching DOI");
                return CrossrefLookup::NoMatch;
            }
        };

        match self.fetch_metrics(&doi).await {
            Ok(metrics) => CrossrefLookup::Found(metrics),
            Err(e) => {
                tracing::warn!(%doi, error = %e, "Error getting metrics from CrossRef");
                CrossrefLookup::FetchFailed { doi }
            }
        }
    }
}

/// Build metrics from the `message` object of a `/works/{doi}` response
pub fn metrics_from_message(doi: &str, message: &Value) -> CrossrefMetrics {
    let authors = message["author"]
        .as_array()
        .map(|list| {
            list.iter()
                .map(|a| {
                    let given = a["given"].as_str().unwrap_or_default();
                    let family = a["family"].as_str().unwrap_or_default();
                    format!("{} {}", given, family).trim().to_string()
                })
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();

    CrossrefMetrics {
        doi: doi.to_string(),
        title: message["title"][0].as_str().unwrap_or_default().to_string(),
        cited_by_count: message["is-referenced-by-count"].as_u64().unwrap_or(0),
        published_year: message["published-print"]["date-parts"][0][0]
            .as_i64()
            .and_then(|y| i32::try_from(y).ok()),
        journal: one_line(message["container-title"][0].as_str().unwrap_or_default()),
        authors,
        publisher: one_line(message["publisher"].as_str().unwrap_or_default()),
    }
}

fn one_line(s: &str) -> String {
    s.replace('\n', " ")
}
