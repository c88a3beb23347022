//! Google Scholar lookup through SerpAPI

use crate::error::{Error, Result};
use crate::http::{base, get_json};
use crate::schema::{InputRow, ScholarMetrics};
use serde_json::Value;
use url::Url;

pub const DEFAULT_URL: &str = "https://serpapi.com";

pub struct ScholarClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl ScholarClient {
    pub fn new(client: reqwest::Client, base_url: Url, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    /// Metrics from the first organic result for the row's free-text query
    pub async fn search(&self, row: &InputRow) -> Result<Option<ScholarMetrics>> {
        let url = format!("{}/search.json", base(&self.base_url));
        let q = format!("{} {} {}", row.title, row.author, row.publication);
        let body = get_json(
            &self.client,
            &url,
            &[
                ("engine", "google_scholar"),
                ("q", q.as_str()),
                ("api_key", self.api_key.as_str()),
            ],
        )
        .await?;

        if let Some(message) = body["error"].as_str() {
            return Err(Error::Api(message.to_string()));
        }

        Ok(body["organic_results"].get(0).map(metrics_from_result))
    }

    /// Like `search`, but any failure is logged and becomes an absent block
    pub async fn lookup(&self, row: &InputRow) -> Option<ScholarMetrics> {
        match self.search(row).await {
            Ok(found) => {
                if found.is_none() {
                    tracing::debug!(title = %row.title, "no Google Scholar results");
                }
                found
            }
            Err(e) => {
                tracing::warn!(title = %row.title, error = %e, "Error searching Google Scholar");
                None
            }
        }
    }
}

/// Build metrics from one entry of `organic_results`
pub fn metrics_from_result(article: &Value) -> ScholarMetrics {
    let info = &article["publication_info"];

    let authors = info["authors"]
        .as_array()
        .map(|list| {
            list.iter()
                .filter_map(|a| a["name"].as_str())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();

    ScholarMetrics {
        title: text(&article["title"]),
        authors,
        journal: text(&info["journal"]),
        cited_by_count: integer(&article["inline_links"]["cited_by"]["total"])
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or(0),
        publisher: text(&info["publisher"]),
        published_year: integer(&info["year"]).and_then(|y| i32::try_from(y).ok()),
    }
}

fn text(v: &Value) -> Option<String> {
    v.as_str().map(String::from)
}

/// Integer from a JSON number or a numeric string
fn integer(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
