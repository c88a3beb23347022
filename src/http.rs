//! Shared HTTP plumbing for the metadata clients

use crate::error::{Error, Result};
use serde_json::Value;
use std::time::Duration;

const USER_AGENT: &str = concat!("bibmetrics/", env!("CARGO_PKG_VERSION"));

/// Build the client used for every external call (one timeout per request)
pub fn build_client(timeout_ms: u64) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_millis(timeout_ms))
        .build()?;
    Ok(client)
}

/// GET `url` with query parameters and decode the body as JSON.
///
/// Non-2xx responses are errors. No retry.
pub async fn get_json(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<Value> {
    let response = client.get(url).query(query).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| Error::Decode(e.to_string()))
}

/// Base URL without a trailing slash, so paths can be appended with `format!`
pub fn base(url: &url::Url) -> &str {
    url.as_str().trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_trims_trailing_slash() {
        let url = url::Url::parse("https://api.crossref.org").unwrap();
        assert_eq!(base(&url), "https://api.crossref.org");

        let url = url::Url::parse("http://127.0.0.1:8080/mock/").unwrap();
        assert_eq!(base(&url), "http://127.0.0.1:8080/mock");
    }
}
