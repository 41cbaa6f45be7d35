use std::collections::BTreeMap;

use crate::analyze::markup::Anchor;
use crate::config::ScoutConfig;

/// Map of social platform → profile URL, at most one entry per platform.
/// First occurrence in document order wins.
pub fn extract(anchors: &[Anchor], cfg: &ScoutConfig) -> BTreeMap<String, String> {
    let mut links = BTreeMap::new();

    for anchor in anchors {
        let host = link_host(&anchor.href);
        if host.is_empty() {
            continue;
        }
        for domain in &cfg.social_domains {
            if host == *domain || host.ends_with(&format!(".{}", domain)) {
                let platform = platform_name(domain);
                links.entry(platform).or_insert_with(|| anchor.href.clone());
            }
        }
    }

    links
}

fn link_host(url: &str) -> String {
    url.split("//")
        .nth(1)
        .unwrap_or("")
        .split('/')
        .next()
        .unwrap_or("")
        .trim_start_matches("www.")
        .to_lowercase()
}

/// Platform key from the domain's first label, folding aliases onto their
/// parent platform.
fn platform_name(domain: &str) -> String {
    let label = domain.split('.').next().unwrap_or(domain);
    match label {
        "x" => "twitter".to_string(),
        "youtu" | "googleusercontent" => "youtube".to_string(),
        _ => label.to_string(),
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn anchors(hrefs: &[&str]) -> Vec<Anchor> {
        hrefs
            .iter()
            .map(|h| Anchor {
                text: String::new(),
                href: h.to_string(),
            })
            .collect()
    }

    fn cfg() -> ScoutConfig {
        ScoutConfig::default()
    }

    #[test]
    fn one_entry_per_platform_first_wins() {
        let a = anchors(&[
            "https://www.instagram.com/first_store",
            "https://instagram.com/second_store",
            "https://facebook.com/thestore",
        ]);
        let links = extract(&a, &cfg());
        assert_eq!(links.len(), 2);
        assert_eq!(
            links.get("instagram").map(String::as_str),
            Some("https://www.instagram.com/first_store")
        );
        assert_eq!(
            links.get("facebook").map(String::as_str),
            Some("https://facebook.com/thestore")
        );
    }

    #[test]
    fn x_dot_com_maps_to_twitter() {
        let a = anchors(&["https://x.com/thestore"]);
        let links = extract(&a, &cfg());
        assert_eq!(
            links.get("twitter").map(String::as_str),
            Some("https://x.com/thestore")
        );
    }

    #[test]
    fn short_video_domain_maps_to_youtube() {
        let a = anchors(&["https://youtu.be/dQw4w9WgXcQ"]);
        let links = extract(&a, &cfg());
        assert_eq!(
            links.get("youtube").map(String::as_str),
            Some("https://youtu.be/dQw4w9WgXcQ")
        );
    }

    #[test]
    fn youtube_channel_and_short_link_share_one_slot() {
        let a = anchors(&[
            "https://www.youtube.com/@thestore",
            "https://youtu.be/dQw4w9WgXcQ",
        ]);
        let links = extract(&a, &cfg());
        assert_eq!(
            links.get("youtube").map(String::as_str),
            Some("https://www.youtube.com/@thestore")
        );
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn subdomains_match_platform() {
        let a = anchors(&["https://m.facebook.com/thestore"]);
        let links = extract(&a, &cfg());
        assert!(links.contains_key("facebook"));
    }

    #[test]
    fn unrelated_host_does_not_match_x() {
        // box.com must not register as x.com/twitter
        let a = anchors(&["https://box.com/share/catalog"]);
        assert!(extract(&a, &cfg()).is_empty());
    }

    #[test]
    fn relative_and_plain_links_ignored() {
        let a = anchors(&["/pages/contact", "mailto:hi@shop.in"]);
        assert!(extract(&a, &cfg()).is_empty());
    }
}
