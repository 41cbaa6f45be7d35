use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

static CART_ACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)add\s+to\s+cart|buy\s+now|shop\s+now").unwrap());
static LISTING_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)product|item|grid|listing").unwrap());

static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static ACTION_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("button, a, input").unwrap());
static CLASSED_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("[class]").unwrap());

#[derive(Debug, Clone)]
pub struct Anchor {
    pub text: String,
    pub href: String,
}

/// Everything the signal and field extractors need from the DOM, scanned in
/// one pass and returned as owned data. The `Html` tree never leaves this
/// module, so downstream stages stay pure and pipeline futures stay `Send`.
#[derive(Debug, Clone, Default)]
pub struct Markup {
    pub anchors: Vec<Anchor>,
    /// An interactive element labelled "add to cart" / "buy now" / "shop now".
    pub cart_action: bool,
    /// Elements whose class attribute matches the product/listing vocabulary.
    pub listing_class_count: usize,
}

pub fn scan(html: &str) -> Markup {
    let doc = Html::parse_document(html);

    let anchors = doc
        .select(&ANCHOR_SEL)
        .filter_map(|el| {
            let href = el.value().attr("href")?.trim();
            if href.is_empty() {
                return None;
            }
            Some(Anchor {
                text: el.text().collect::<String>().trim().to_string(),
                href: href.to_string(),
            })
        })
        .collect();

    let cart_action = doc.select(&ACTION_SEL).any(|el| {
        let label = match el.value().name() {
            "input" => el.value().attr("value").unwrap_or("").to_string(),
            _ => el.text().collect::<String>(),
        };
        CART_ACTION_RE.is_match(&label)
    });

    let listing_class_count = doc
        .select(&CLASSED_SEL)
        .filter(|el| {
            el.value()
                .attr("class")
                .is_some_and(|c| LISTING_CLASS_RE.is_match(c))
        })
        .count();

    Markup {
        anchors,
        cart_action,
        listing_class_count,
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_cart_button() {
        let m = scan("<html><body><button>Add to Cart</button></body></html>");
        assert!(m.cart_action);
    }

    #[test]
    fn detects_buy_now_anchor_and_input() {
        let m = scan(r#"<a href="/checkout">BUY NOW</a>"#);
        assert!(m.cart_action);
        let m = scan(r#"<input type="submit" value="Shop Now">"#);
        assert!(m.cart_action);
    }

    #[test]
    fn plain_page_has_no_cart_action() {
        let m = scan("<html><body><p>Welcome to our consultancy.</p></body></html>");
        assert!(!m.cart_action);
        assert_eq!(m.listing_class_count, 0);
    }

    #[test]
    fn counts_listing_classes() {
        let html = r#"
            <div class="product-card"></div>
            <div class="product-card"></div>
            <ul class="items-grid"><li class="listing"></li></ul>
            <div class="hero-banner"></div>
        "#;
        let m = scan(html);
        assert_eq!(m.listing_class_count, 4);
    }

    #[test]
    fn collects_anchors_with_text() {
        let html = r#"<a href="/contact-us">Contact Us</a><a href="">empty</a>"#;
        let m = scan(html);
        assert_eq!(m.anchors.len(), 1);
        assert_eq!(m.anchors[0].href, "/contact-us");
        assert_eq!(m.anchors[0].text, "Contact Us");
    }
}
