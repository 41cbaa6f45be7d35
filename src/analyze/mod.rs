pub mod extract;
pub mod markup;
pub mod normalize;
pub mod signals;

use std::collections::BTreeMap;

use anyhow::Result;
use url::Url;

use crate::config::ScoutConfig;
use crate::fetch::{self, FetchedPage};
use markup::Markup;

/// The scoring corpus for one candidate: primary page plus (optionally) the
/// appended text of one policy page, ready for the pure signal extractors.
pub struct Corpus {
    pub url: String,
    pub host: String,
    /// Lowercased primary content with any policy-page content appended.
    pub text: String,
    /// Original-case primary HTML, for extractors that need casing.
    pub html: String,
}

impl Corpus {
    pub fn from_page(page: FetchedPage, policy_text: Option<String>) -> Self {
        let host = Url::parse(&page.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
            .unwrap_or_default();
        let mut text = page.text;
        if let Some(extra) = policy_text {
            text.push('\n');
            text.push_str(&extra);
        }
        Self {
            url: page.url,
            host,
            text,
            html: page.html,
        }
    }
}

/// Contact and social data for one accepted storefront. Immutable once
/// assembled; ownership passes to the persistence sink.
#[derive(Debug, Clone)]
pub struct LeadRecord {
    pub url: String,
    /// All unique addresses found, newline-joined.
    pub email: Option<String>,
    /// E.164 when recognizable as an Indian number.
    pub phone: Option<String>,
    /// platform → profile URL, at most one per platform.
    pub social_links: BTreeMap<String, String>,
    pub founder: Option<String>,
}

impl LeadRecord {
    pub fn social(&self, platform: &str) -> Option<&str> {
        self.social_links.get(platform).map(String::as_str)
    }
}

/// Terminal outcome for one candidate URL, carrying the score where one was
/// computed so rejections stay observable.
#[derive(Debug, Clone)]
pub enum Verdict {
    Accepted { score: f64, lead: LeadRecord },
    RejectedNotCommerce,
    RejectedNegativeContent { keyword: String },
    RejectedLowConfidence { score: f64 },
}

/// Pure qualification pass: structural commerce gate, then the negative
/// content filter, then the additive regional score against the policy
/// threshold. Field extraction only runs for accepted candidates.
pub fn evaluate(corpus: &Corpus, markup: &Markup, cfg: &ScoutConfig) -> Verdict {
    if !signals::commerce_gate(markup, &corpus.text, cfg) {
        return Verdict::RejectedNotCommerce;
    }

    if let Some(keyword) = signals::negative_content(&corpus.text, cfg) {
        return Verdict::RejectedNegativeContent {
            keyword: keyword.to_string(),
        };
    }

    let confidence = signals::regional_confidence(&corpus.text, &corpus.host, cfg);
    let score = cfg.score.commerce + confidence.points(&cfg.score);
    if score < cfg.score.threshold {
        return Verdict::RejectedLowConfidence { score };
    }

    Verdict::Accepted {
        score,
        lead: assemble(corpus, markup, cfg),
    }
}

/// Package the accepted URL and extracted fields into a LeadRecord.
/// No I/O; every field is independent and absent on extraction miss.
pub fn assemble(corpus: &Corpus, markup: &Markup, cfg: &ScoutConfig) -> LeadRecord {
    LeadRecord {
        url: corpus.url.clone(),
        email: extract::contact::extract_emails(&corpus.text),
        phone: extract::contact::extract_phone(&markup.anchors, &corpus.text),
        social_links: extract::social::extract(&markup.anchors, cfg),
        founder: extract::founder::extract(&corpus.html),
    }
}

/// Full per-URL pipeline: fetch, scan, gate, optional policy-page
/// enrichment, qualify. Fetch failures surface as errors; qualification
/// failures are ordinary verdicts.
pub async fn analyze_url(
    client: &reqwest::Client,
    cfg: &ScoutConfig,
    url: &str,
) -> Result<Verdict> {
    let page = fetch::fetch_page(client, cfg, url).await?;
    let markup = markup::scan(&page.html);

    // Gate on the primary page alone before spending a second fetch.
    if !signals::commerce_gate(&markup, &page.text, cfg) {
        return Ok(Verdict::RejectedNotCommerce);
    }

    let policy_text = fetch::fetch_policy_page(client, cfg, &page.url, &markup.anchors).await;
    let corpus = Corpus::from_page(page, policy_text);
    Ok(evaluate(&corpus, &markup, cfg))
}

// ── Tests ──
