use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::analyze::markup::Anchor;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b").unwrap());
// Phone-shaped runs of digits with common separators; validity is decided
// separately, this only proposes candidates.
static PHONE_CANDIDATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\d[\d\s().-]{6,18}\d").unwrap());

// Asset filenames produce email-shaped tokens like image@2x.png.
const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".webp", ".svg"];

/// All unique address-shaped tokens in the corpus, newline-joined.
pub fn extract_emails(text: &str) -> Option<String> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    for m in EMAIL_RE.find_iter(text) {
        let email = m.as_str();
        if IMAGE_EXTENSIONS.iter().any(|ext| email.ends_with(ext)) {
            continue;
        }
        if seen.insert(email.to_string()) {
            found.push(email.to_string());
        }
    }

    if found.is_empty() {
        None
    } else {
        Some(found.join("\n"))
    }
}

/// First phone number that survives validation, E.164-formatted when
/// recognizable as Indian. An explicit tel: anchor is preferred over any
/// number scraped out of page text.
pub fn extract_phone(anchors: &[Anchor], text: &str) -> Option<String> {
    for anchor in anchors {
        if let Some(phone) = from_tel_href(&anchor.href) {
            return Some(phone);
        }
    }

    for m in PHONE_CANDIDATE_RE.find_iter(text) {
        let digits: String = m.as_str().chars().filter(|c| c.is_ascii_digit()).collect();
        if let Some(e164) = india_e164(&digits) {
            return Some(e164);
        }
    }

    None
}

/// tel: links are declared phone numbers; accept 8-15 digits after
/// stripping separators, still refusing degenerate repeated-digit strings.
fn from_tel_href(href: &str) -> Option<String> {
    let raw = href.trim();
    if !raw.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("tel:")) {
        return None;
    }
    let raw = &raw[4..];
    let has_plus = raw.trim_start().starts_with('+');
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() < 8 || digits.len() > 15 || is_degenerate(&digits) {
        return None;
    }
    if let Some(e164) = india_e164(&digits) {
        return Some(e164);
    }
    Some(if has_plus {
        format!("+{}", digits)
    } else {
        digits
    })
}

/// Indian mobile validity ruleset: ten digits starting 6-9, optionally
/// prefixed with a trunk 0 or country code 91. Anything else is rejected
/// rather than passed through phone-shaped.
fn india_e164(digits: &str) -> Option<String> {
    let national = match digits.len() {
        10 => digits,
        11 if digits.starts_with('0') => &digits[1..],
        12 if digits.starts_with("91") => &digits[2..],
        _ => return None,
    };
    if !matches!(national.as_bytes()[0], b'6'..=b'9') {
        return None;
    }
    if is_degenerate(national) {
        return None;
    }
    Some(format!("+91{}", national))
}

fn is_degenerate(digits: &str) -> bool {
    let mut chars = digits.chars();
    let first = chars.next();
    chars.all(|c| Some(c) == first)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn tel(href: &str) -> Vec<Anchor> {
        vec![Anchor {
            text: String::new(),
            href: href.to_string(),
        }]
    }

    #[test]
    fn finds_single_email() {
        assert_eq!(
            extract_emails("write to hello@shop.in for orders").as_deref(),
            Some("hello@shop.in")
        );
    }

    #[test]
    fn joins_all_unique_emails() {
        let text = "hello@shop.in support@shop.in hello@shop.in";
        assert_eq!(
            extract_emails(text).as_deref(),
            Some("hello@shop.in\nsupport@shop.in")
        );
    }

    #[test]
    fn rejects_image_asset_tokens() {
        assert_eq!(extract_emails("srcset=logo@2x.png"), None);
        assert_eq!(extract_emails("banner@large.jpg icon@small.gif"), None);
        // A real address next to an asset token still comes through
        assert_eq!(
            extract_emails("logo@2x.png orders@store.in").as_deref(),
            Some("orders@store.in")
        );
    }

    #[test]
    fn no_email_is_absent() {
        assert_eq!(extract_emails("no contact details here"), None);
    }

    #[test]
    fn tel_link_preferred_over_text() {
        let anchors = tel("tel:+919876543210");
        let phone = extract_phone(&anchors, "call 9123456780 today");
        assert_eq!(phone.as_deref(), Some("+919876543210"));
    }

    #[test]
    fn tel_link_too_short_falls_through() {
        let anchors = tel("tel:12345");
        assert_eq!(extract_phone(&anchors, ""), None);
    }

    #[test]
    fn text_number_formatted_e164() {
        assert_eq!(
            extract_phone(&[], "customer care: +91 98765 43210").as_deref(),
            Some("+919876543210")
        );
        assert_eq!(
            extract_phone(&[], "call 09876543210 now").as_deref(),
            Some("+919876543210")
        );
        assert_eq!(
            extract_phone(&[], "whatsapp 9876543210").as_deref(),
            Some("+919876543210")
        );
    }

    #[test]
    fn invalid_numbers_absent() {
        assert_eq!(extract_phone(&[], "12345"), None);
        // Wrong leading digit for an Indian mobile
        assert_eq!(extract_phone(&[], "call 1234567890"), None);
        // Repeated digits are phone-shaped but not real
        assert_eq!(extract_phone(&[], "9999999999"), None);
        assert_eq!(extract_phone(&[], "order id 4711088123456789"), None);
    }

    #[test]
    fn tel_with_separators() {
        let anchors = tel("tel:+91-98765-43210");
        assert_eq!(
            extract_phone(&anchors, "").as_deref(),
            Some("+919876543210")
        );
    }

    #[test]
    fn foreign_tel_kept_verbatim() {
        let anchors = tel("tel:+442071234567");
        assert_eq!(
            extract_phone(&anchors, "").as_deref(),
            Some("+442071234567")
        );
    }
}
