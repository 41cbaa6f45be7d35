use std::sync::LazyLock;

use regex::Regex;

use super::markup::Markup;
use crate::config::{ScorePolicy, ScoutConfig};

static PRODUCT_SCHEMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""@type"\s*:\s*"product""#).unwrap());
// 15-character GST registration number, matched over the lowercased corpus.
static GSTIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"gstin\s*[:\-]?\s*[0-9a-z]{15}").unwrap());
// 6-digit postal code only counts with a contextual label next to it.
static PIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:pincode|pin code|pin)[\s:-]*\d{6}\b").unwrap());

/// Structural storefront check. Must pass before any scoring continues.
pub fn commerce_gate(markup: &Markup, text: &str, cfg: &ScoutConfig) -> bool {
    markup.cart_action
        || markup.listing_class_count >= 3
        || PRODUCT_SCHEMA_RE.is_match(text)
        || cfg
            .commerce_platform_markers
            .iter()
            .any(|m| text.contains(m.as_str()))
}

/// First disqualifying content keyword found in the corpus, if any.
pub fn negative_content<'a>(text: &str, cfg: &'a ScoutConfig) -> Option<&'a str> {
    cfg.negative_content_keywords
        .iter()
        .map(String::as_str)
        .find(|kw| text.contains(*kw))
}

/// Graded regional signal. Structural evidence (tax ID, labelled postal
/// code, known regional vendors, region TLD) outweighs a bare text mention,
/// which could be a page merely discussing the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionalConfidence {
    High(&'static str),
    Mention,
    None,
}

impl RegionalConfidence {
    pub fn points(&self, policy: &ScorePolicy) -> f64 {
        match self {
            Self::High(_) => policy.high_confidence,
            Self::Mention => policy.mention,
            Self::None => 0.0,
        }
    }
}

pub fn regional_confidence(text: &str, host: &str, cfg: &ScoutConfig) -> RegionalConfidence {
    if GSTIN_RE.is_match(text) {
        return RegionalConfidence::High("tax id");
    }
    if PIN_RE.is_match(text) {
        return RegionalConfidence::High("postal code");
    }
    if cfg
        .regional_tech_keywords
        .iter()
        .any(|kw| text.contains(kw.as_str()))
    {
        return RegionalConfidence::High("regional vendor");
    }
    if host.ends_with(cfg.region_tld.as_str()) {
        return RegionalConfidence::High("region tld");
    }
    if text.contains(cfg.region_mention.as_str()) {
        return RegionalConfidence::Mention;
    }
    RegionalConfidence::None
}

// ── Tests ──
