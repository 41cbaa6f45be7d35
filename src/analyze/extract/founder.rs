use std::sync::LazyLock;

use regex::Regex;

// One to three capitalized words after a founder phrase. Low-precision by
// design; the field is informational and never affects qualification.
static FOUNDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?i:founded\s+by|founder|by)[:\s]+([A-Z][a-z]+(?:\s+[A-Z][a-z]+){0,2})")
        .unwrap()
});

/// Best-effort founder name from original-case page content.
pub fn extract(html: &str) -> Option<String> {
    FOUNDER_RE
        .captures(html)
        .map(|caps| caps[1].trim().to_string())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn founded_by_two_words() {
        assert_eq!(
            extract("Our brand was founded by Asha Gupta in 2019.").as_deref(),
            Some("Asha Gupta")
        );
    }

    #[test]
    fn founder_label() {
        assert_eq!(
            extract("Founder: Ravi Menon").as_deref(),
            Some("Ravi Menon")
        );
    }

    #[test]
    fn caps_at_three_words() {
        assert_eq!(
            extract("founded by Anil Kumar Sharma Textiles").as_deref(),
            Some("Anil Kumar Sharma")
        );
    }

    #[test]
    fn lowercase_names_not_matched() {
        assert_eq!(extract("founded by the community"), None);
    }

    #[test]
    fn absent_when_no_phrase() {
        assert_eq!(extract("A store for handmade goods."), None);
    }
}
