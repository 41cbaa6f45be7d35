use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::debug;
use url::Url;

use crate::analyze::markup::Anchor;
use crate::config::ScoutConfig;

const FALLBACK_UA: &str = "Mozilla/5.0";

/// One fetched page. Owned by a single pipeline invocation, never persisted.
pub struct FetchedPage {
    pub url: String,
    pub html: String,
    /// Lowercased raw content, the scoring corpus.
    pub text: String,
    pub fetched_at: DateTime<Utc>,
}

pub fn client(cfg: &ScoutConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(cfg.fetch_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .context("Failed to build HTTP client")
}

/// Bounded GET with a rotating identity and a polite randomized delay.
/// Non-2xx responses and transport errors surface as fetch failures.
pub async fn fetch_page(
    client: &reqwest::Client,
    cfg: &ScoutConfig,
    url: &str,
) -> Result<FetchedPage> {
    polite_delay(cfg).await;

    let response = client
        .get(url)
        .header("User-Agent", pick_user_agent(cfg))
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .header("Accept-Language", "en-US,en;q=0.9")
        .timeout(Duration::from_secs(cfg.fetch_timeout_secs))
        .send()
        .await
        .with_context(|| format!("Request failed: {}", url))?
        .error_for_status()
        .with_context(|| format!("Bad status: {}", url))?;

    let html = response
        .text()
        .await
        .with_context(|| format!("Failed to read body: {}", url))?;
    let text = html.to_lowercase();

    let page = FetchedPage {
        url: url.to_string(),
        html,
        text,
        fetched_at: Utc::now(),
    };
    debug!(
        "Fetched {} ({} bytes) at {}",
        page.url,
        page.html.len(),
        page.fetched_at
    );
    Ok(page)
}

/// Best-effort secondary fetch of the first anchor that looks like a
/// contact/about/policy page. Returns lowercased text to append to the
/// scoring corpus; any failure quietly yields `None`.
pub async fn fetch_policy_page(
    client: &reqwest::Client,
    cfg: &ScoutConfig,
    base_url: &str,
    anchors: &[Anchor],
) -> Option<String> {
    let target = policy_link(cfg, base_url, anchors)?;
    debug!("Checking policy page {}", target);

    let response = client
        .get(target.as_str())
        .header("User-Agent", pick_user_agent(cfg))
        .timeout(Duration::from_secs(cfg.policy_timeout_secs))
        .send()
        .await
        .ok()?
        .error_for_status()
        .ok()?;

    let html = response.text().await.ok()?;
    Some(html.to_lowercase())
}

/// First anchor whose href or text matches a policy-page hint, resolved
/// against the page URL.
fn policy_link(cfg: &ScoutConfig, base_url: &str, anchors: &[Anchor]) -> Option<Url> {
    let base = Url::parse(base_url).ok()?;

    for anchor in anchors {
        let href = anchor.href.trim();
        if href.starts_with("mailto:")
            || href.starts_with("tel:")
            || href.starts_with("javascript:")
            || href.starts_with('#')
        {
            continue;
        }
        let href_l = href.to_lowercase();
        let text_l = anchor.text.to_lowercase();
        let hinted = cfg
            .policy_page_hints
            .iter()
            .any(|h| href_l.contains(h.as_str()) || text_l.contains(h.as_str()));
        if hinted {
            if let Ok(resolved) = base.join(href) {
                return Some(resolved);
            }
        }
    }

    None
}

fn pick_user_agent(cfg: &ScoutConfig) -> &str {
    if cfg.user_agents.is_empty() {
        return FALLBACK_UA;
    }
    let idx = rand::random::<usize>() % cfg.user_agents.len();
    &cfg.user_agents[idx]
}

async fn polite_delay(cfg: &ScoutConfig) {
    let jitter = match cfg.delay_jitter_ms {
        0 => 0,
        n => rand::random::<u64>() % n,
    };
    tokio::time::sleep(Duration::from_millis(cfg.delay_base_ms + jitter)).await;
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(text: &str, href: &str) -> Anchor {
        Anchor {
            text: text.to_string(),
            href: href.to_string(),
        }
    }

    fn cfg() -> ScoutConfig {
        ScoutConfig::default()
    }

    #[test]
    fn policy_link_matches_href_hint() {
        let anchors = vec![
            anchor("Home", "/"),
            anchor("", "/pages/contact-us"),
        ];
        let link = policy_link(&cfg(), "https://shop.example.in", &anchors).unwrap();
        assert_eq!(link.as_str(), "https://shop.example.in/pages/contact-us");
    }

    #[test]
    fn policy_link_matches_anchor_text_hint() {
        let anchors = vec![anchor("About the brand", "/pages/story")];
        let link = policy_link(&cfg(), "https://shop.example.in", &anchors).unwrap();
        assert_eq!(link.as_str(), "https://shop.example.in/pages/story");
    }

    #[test]
    fn policy_link_first_hint_wins() {
        let anchors = vec![
            anchor("Shipping", "/policies/shipping"),
            anchor("Contact", "/contact"),
        ];
        let link = policy_link(&cfg(), "https://shop.example.in", &anchors).unwrap();
        assert_eq!(link.as_str(), "https://shop.example.in/policies/shipping");
    }

    #[test]
    fn policy_link_skips_non_navigable_schemes() {
        let anchors = vec![
            anchor("Contact", "mailto:contact@shop.in"),
            anchor("Contact", "tel:+919876543210"),
        ];
        assert!(policy_link(&cfg(), "https://shop.example.in", &anchors).is_none());
    }

    #[test]
    fn policy_link_absent_without_hints() {
        let anchors = vec![anchor("Collections", "/collections/all")];
        assert!(policy_link(&cfg(), "https://shop.example.in", &anchors).is_none());
    }

    #[test]
    fn absolute_policy_href_kept() {
        let anchors = vec![anchor("Terms", "https://cdn.example.com/terms.html")];
        let link = policy_link(&cfg(), "https://shop.example.in", &anchors).unwrap();
        assert_eq!(link.as_str(), "https://cdn.example.com/terms.html");
    }

    #[test]
    fn user_agent_pool_never_empty_choice() {
        let c = cfg();
        let ua = pick_user_agent(&c);
        assert!(c.user_agents.iter().any(|u| u == ua));
    }
}
