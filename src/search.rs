use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tracing::{debug, warn};

const SEARCH_ENDPOINT: &str = "https://google.serper.dev/search";
const MAX_RETRIES: u32 = 3;
const BASE_BACKOFF_MS: u64 = 2000;

/// One organic search result from the discovery service.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<SearchHit>,
}

/// Query the discovery service for one phrase. Rate limits and server
/// errors back off and retry a bounded number of times; anything that still
/// fails is an error the caller treats as zero results for this query.
pub async fn search(
    client: &reqwest::Client,
    api_key: &str,
    query: &str,
    num: u32,
) -> Result<Vec<SearchHit>> {
    let payload = serde_json::json!({ "q": query, "num": num });

    for attempt in 0..=MAX_RETRIES {
        let response = client
            .post(SEARCH_ENDPOINT)
            .header("X-API-KEY", api_key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .timeout(Duration::from_secs(20))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let parsed: SearchResponse = response.json().await?;
            for hit in &parsed.organic {
                debug!("Hit: {} — {} — {}", hit.title, hit.link, hit.snippet);
            }
            return Ok(parsed.organic);
        }

        let retryable = status.as_u16() == 429 || status.is_server_error();
        if !retryable || attempt == MAX_RETRIES {
            return Err(anyhow!("Search API error for '{}': {}", query, status));
        }

        let backoff = Duration::from_millis(BASE_BACKOFF_MS * 2u64.pow(attempt));
        warn!(
            "Search API {} for '{}' (attempt {}/{}), backing off {:.1}s",
            status,
            query,
            attempt + 1,
            MAX_RETRIES,
            backoff.as_secs_f64()
        );
        tokio::time::sleep(backoff).await;
    }

    Err(anyhow!("Search retries exhausted for '{}'", query))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_organic_results() {
        let raw = r#"{
            "organic": [
                {"title": "Saree Store", "link": "https://shop.example.in", "snippet": "Handloom"},
                {"link": "https://other.example.com"}
            ],
            "searchParameters": {"q": "ignored"}
        }"#;
        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.organic.len(), 2);
        assert_eq!(parsed.organic[0].link, "https://shop.example.in");
        assert_eq!(parsed.organic[1].title, "");
    }

    #[test]
    fn missing_organic_is_empty() {
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.organic.is_empty());
    }
}
