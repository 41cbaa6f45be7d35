use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Scoring weights and the acceptance threshold.
///
/// Kept as data rather than constants so a run can tighten the policy
/// (e.g. threshold 2.0 requires a high-confidence regional signal).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScorePolicy {
    pub commerce: f64,
    pub high_confidence: f64,
    pub mention: f64,
    pub threshold: f64,
}

impl Default for ScorePolicy {
    fn default() -> Self {
        Self {
            commerce: 1.0,
            high_confidence: 1.0,
            mention: 0.5,
            threshold: 1.5,
        }
    }
}

/// Immutable configuration for one discovery run.
///
/// Every keyword list the pipeline consults lives here so tests can inject
/// tiny fixtures instead of patching process-wide state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    /// Marketplaces, social platforms and known non-leads. Matched by
    /// substring against the www-stripped host.
    pub blacklisted_domains: Vec<String>,
    /// URL substrings that mark non-storefront sections.
    pub negative_path_keywords: Vec<String>,
    /// Page content that disqualifies a site regardless of commerce signals.
    pub negative_content_keywords: Vec<String>,
    /// Indian payment/logistics vendors whose presence is strong regional
    /// evidence.
    pub regional_tech_keywords: Vec<String>,
    /// Commerce platform fingerprints looked up in raw page text.
    pub commerce_platform_markers: Vec<String>,
    /// Anchor hints for the secondary policy-page fetch.
    pub policy_page_hints: Vec<String>,
    /// Social platform domains recognized by the social link extractor.
    pub social_domains: Vec<String>,
    /// Bare regional mention worth partial credit.
    pub region_mention: String,
    /// Host suffix that counts as high-confidence regional evidence.
    pub region_tld: String,

    pub user_agents: Vec<String>,
    pub fetch_timeout_secs: u64,
    pub policy_timeout_secs: u64,
    /// Polite pre-request delay: base + uniform jitter.
    pub delay_base_ms: u64,
    pub delay_jitter_ms: u64,
    pub workers: usize,

    pub score: ScorePolicy,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            blacklisted_domains: to_strings(&[
                "amazon.com", "flipkart.com", "myntra.com", "ajio.com",
                "meesho.com", "nykaa.com", "snapdeal.com", "tatacliq.com",
                "jiomart.com", "pepperfry.com", "limeroad.com", "walmart.com",
                "ebay.com", "etsy.com", "pinterest.com", "facebook.com",
                "instagram.com", "linkedin.com", "twitter.com", "youtube.com",
                "marketresearch.com", "dataintelo.com",
            ]),
            negative_path_keywords: to_strings(&[
                "blog", "news", "docs", "forum", "support", "publication",
            ]),
            negative_content_keywords: to_strings(&[
                "whiskey", "liquor", "wine", "beer", "alcohol",
                "market research", "consulting firm", "business intelligence",
            ]),
            regional_tech_keywords: to_strings(&[
                "razorpay", "payu", "instamojo", "shiprocket", "delhivery",
                "blue dart",
            ]),
            commerce_platform_markers: to_strings(&[
                "shopify", "woocommerce", "cdn.shopify.com",
            ]),
            policy_page_hints: to_strings(&[
                "contact", "about", "legal", "policy", "shipping", "terms",
            ]),
            social_domains: to_strings(&[
                "facebook.com", "instagram.com", "twitter.com", "x.com",
                "linkedin.com", "youtube.com", "youtu.be",
            ]),
            region_mention: "india".to_string(),
            region_tld: ".in".to_string(),
            user_agents: to_strings(&[
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
                "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:124.0) Gecko/20100101 Firefox/124.0",
            ]),
            fetch_timeout_secs: 15,
            policy_timeout_secs: 10,
            delay_base_ms: 500,
            delay_jitter_ms: 2000,
            workers: 8,
            score: ScorePolicy::default(),
        }
    }
}

impl ScoutConfig {
    /// Load overrides from a JSON file, or the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p)
                    .with_context(|| format!("Failed to read config {}", p.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("Invalid config {}", p.display()))
            }
            None => Ok(Self::default()),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ── Tests ──
