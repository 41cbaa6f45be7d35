use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};

/// Category → seed keywords for phrase generation.
const CATEGORIES: &[(&str, &[&str])] = &[
    ("womens_fashion", &["sarees", "kurti", "lehenga", "fusion wear"]),
    ("mens_fashion", &["oversized tshirt", "hoodie for men"]),
    ("kids_products", &["organic baby clothes", "crochet toys"]),
    ("accessories_jewelry", &["handmade jewelry", "leather wallet"]),
    ("home_kitchen", &["wall shelf", "planters"]),
    ("beauty_personal_care", &["skincare brand india", "herbal shampoo"]),
    ("gifts_and_other", &["eco friendly gifts", "custom gift box"]),
    ("brand_philosophy", &["sustainable fashion", "zero waste store"]),
];

/// Search templates biased toward independent storefronts.
const TEMPLATES: &[&str] = &[
    "\"{kw}\" inurl:shop -amazon -flipkart",
    "\"{kw}\" online india inurl:store site:.in -amazon",
    "\"{kw}\" buy online site:.in -flipkart -amazon",
];

/// Generate the built-in phrase set: every keyword crossed with every
/// template, grouped by category.
pub fn generated() -> BTreeMap<String, Vec<String>> {
    let mut out = BTreeMap::new();
    for (category, keywords) in CATEGORIES {
        let phrases: Vec<String> = keywords
            .iter()
            .flat_map(|kw| TEMPLATES.iter().map(move |t| t.replace("{kw}", kw)))
            .collect();
        out.insert(category.to_string(), phrases);
    }
    out
}

/// Load hand-curated phrases from a JSON file of `{category: [phrase, ..]}`.
pub fn load_manual(path: &Path) -> Result<BTreeMap<String, Vec<String>>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read phrases file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid phrases file {}", path.display()))
}

/// Merge manual and generated phrases per category, dropping duplicates and
/// anything already issued in a previous run.
pub fn fresh(
    manual: BTreeMap<String, Vec<String>>,
    used: &HashSet<String>,
) -> BTreeMap<String, Vec<String>> {
    let mut combined = generated();
    for (category, phrases) in manual {
        combined.entry(category).or_default().extend(phrases);
    }

    let mut out = BTreeMap::new();
    for (category, phrases) in combined {
        let mut seen = HashSet::new();
        let filtered: Vec<String> = phrases
            .into_iter()
            .filter(|p| !used.contains(p) && seen.insert(p.clone()))
            .collect();
        if !filtered.is_empty() {
            out.insert(category, filtered);
        }
    }
    out
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_crosses_keywords_with_templates() {
        let phrases = generated();
        let womens = &phrases["womens_fashion"];
        assert_eq!(womens.len(), 4 * TEMPLATES.len());
        assert!(womens.iter().any(|p| p.contains("\"sarees\"")));
    }

    #[test]
    fn fresh_filters_used_phrases() {
        let all = generated();
        let first = all["womens_fashion"][0].clone();
        let used: HashSet<String> = [first.clone()].into();

        let remaining = fresh(BTreeMap::new(), &used);
        assert!(!remaining["womens_fashion"].contains(&first));
    }

    #[test]
    fn manual_phrases_merged_and_deduped() {
        let mut manual = BTreeMap::new();
        manual.insert(
            "womens_fashion".to_string(),
            vec![
                "block print sarees jaipur".to_string(),
                "block print sarees jaipur".to_string(),
            ],
        );
        let out = fresh(manual, &HashSet::new());
        let count = out["womens_fashion"]
            .iter()
            .filter(|p| *p == "block print sarees jaipur")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn empty_categories_dropped() {
        let all: HashSet<String> = generated().into_values().flatten().collect();
        let out = fresh(BTreeMap::new(), &all);
        assert!(out.is_empty());
    }
}
