use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::config::ScoutConfig;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://[^\s?#]+").unwrap());

/// Reduce a raw discovered link to a canonical `scheme://host` candidate.
///
/// Returns `None` for anything that should never reach the fetcher:
/// malformed input, non-storefront path keywords, blacklisted hosts.
/// Idempotent: feeding the output back in returns it unchanged.
pub fn normalize(raw: &str, cfg: &ScoutConfig) -> Option<String> {
    // First well-formed http(s) substring; defends against surrounding text.
    let candidate = URL_RE.find(raw)?.as_str();

    if cfg
        .negative_path_keywords
        .iter()
        .any(|kw| candidate.contains(kw.as_str()))
    {
        return None;
    }

    let parsed = Url::parse(candidate).ok()?;
    let host = parsed.host_str()?;

    // www. stripped for comparison only; the canonical URL keeps the host
    // exactly as parsed.
    let bare = host.strip_prefix("www.").unwrap_or(host);
    if cfg
        .blacklisted_domains
        .iter()
        .any(|d| bare.contains(d.as_str()))
    {
        return None;
    }

    Some(format!("{}://{}", parsed.scheme(), host))
}

// ── Tests ──
